//! CPU-side vertex and index buffers
//!
//! A buffer created without shadow data mirrors a GPU-only resource: its
//! layout is known but nothing can be read back on the CPU.

use crate::foundation::math::Vec3;

/// Interleaved vertex data with the position (3 x f32) at offset 0
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    data: Option<Vec<u8>>,
    vertex_size: usize,
    vertex_count: usize,
}

impl VertexBuffer {
    /// Create from raw bytes with the given per-vertex stride
    pub fn from_bytes(data: Vec<u8>, vertex_size: usize) -> Self {
        let vertex_count = if vertex_size == 0 { 0 } else { data.len() / vertex_size };
        Self {
            data: Some(data),
            vertex_size,
            vertex_count,
        }
    }

    /// Create a tightly packed position-only buffer
    pub fn from_positions(positions: &[Vec3]) -> Self {
        let packed: Vec<[f32; 3]> = positions.iter().map(|p| [p.x, p.y, p.z]).collect();
        Self::from_bytes(bytemuck::cast_slice::<_, u8>(&packed).to_vec(), std::mem::size_of::<[f32; 3]>())
    }

    /// Create from interleaved floats, `floats_per_vertex` per vertex
    pub fn from_interleaved(floats: &[f32], floats_per_vertex: usize) -> Self {
        Self::from_bytes(
            bytemuck::cast_slice::<_, u8>(floats).to_vec(),
            floats_per_vertex * std::mem::size_of::<f32>(),
        )
    }

    /// Create a buffer without a CPU-side copy
    pub fn without_shadow_data(vertex_size: usize, vertex_count: usize) -> Self {
        Self {
            data: None,
            vertex_size,
            vertex_count,
        }
    }

    /// Raw bytes, if a CPU-side copy exists
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Per-vertex stride in bytes
    pub fn vertex_size(&self) -> usize {
        self.vertex_size
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}

/// Index data with 16 or 32 bit elements
#[derive(Debug, Clone)]
pub struct IndexBuffer {
    data: Option<Vec<u8>>,
    index_size: usize,
}

impl IndexBuffer {
    /// Create from raw bytes with the given element size
    pub fn from_bytes(data: Vec<u8>, index_size: usize) -> Self {
        Self {
            data: Some(data),
            index_size,
        }
    }

    /// Create a 16-bit index buffer
    pub fn from_u16(indices: &[u16]) -> Self {
        Self::from_bytes(bytemuck::cast_slice::<_, u8>(indices).to_vec(), std::mem::size_of::<u16>())
    }

    /// Create a 32-bit index buffer
    pub fn from_u32(indices: &[u32]) -> Self {
        Self::from_bytes(bytemuck::cast_slice::<_, u8>(indices).to_vec(), std::mem::size_of::<u32>())
    }

    /// Create a buffer without a CPU-side copy
    pub fn without_shadow_data(index_size: usize) -> Self {
        Self {
            data: None,
            index_size,
        }
    }

    /// Raw bytes, if a CPU-side copy exists
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Element size in bytes
    pub fn index_size(&self) -> usize {
        self.index_size
    }

    /// Number of elements
    pub fn index_count(&self) -> usize {
        match (&self.data, self.index_size) {
            (Some(data), size) if size > 0 => data.len() / size,
            _ => 0,
        }
    }
}
