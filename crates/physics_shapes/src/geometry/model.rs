//! Models and their sub-geometries
//!
//! A [`Model`] holds a two-level table of [`Geometry`]: one entry per
//! sub-geometry, each with one or more levels of detail. Sub-geometries
//! share vertex and index buffers and address them through draw ranges.
//! Index values stored in the shared index buffer are absolute into the
//! vertex buffer, not relative to the draw range's vertex start.

use std::sync::Arc;

use super::buffer::{IndexBuffer, VertexBuffer};
use crate::foundation::math::{BoundingBox, Vec3};
use crate::physics::GeometryError;

/// Size of a vertex position in bytes
pub const POSITION_SIZE: usize = std::mem::size_of::<[f32; 3]>();

/// Borrowed view of a geometry's CPU-side vertex and index data
#[derive(Debug, Clone, Copy)]
pub struct RawGeometryData<'a> {
    /// Raw vertex bytes
    pub vertex_data: &'a [u8],
    /// Per-vertex stride in bytes
    pub vertex_size: usize,
    /// Raw index bytes
    pub index_data: &'a [u8],
    /// Index element size in bytes
    pub index_size: usize,
}

impl RawGeometryData<'_> {
    /// Check stride and index width before reading
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.vertex_size < POSITION_SIZE {
            return Err(GeometryError::InvalidVertexStride {
                stride: self.vertex_size,
            });
        }
        match self.index_size {
            2 | 4 => Ok(()),
            size => Err(GeometryError::UnsupportedIndexSize { size }),
        }
    }

    /// Read the position of an absolute vertex
    pub fn position(&self, vertex: usize) -> Result<Vec3, GeometryError> {
        if self.vertex_size < POSITION_SIZE {
            return Err(GeometryError::InvalidVertexStride {
                stride: self.vertex_size,
            });
        }
        let offset = vertex.saturating_mul(self.vertex_size);
        let bytes = read_range(self.vertex_data, offset, POSITION_SIZE, "Vertex")?;
        let [x, y, z]: [f32; 3] = bytemuck::pod_read_unaligned(bytes);
        Ok(Vec3::new(x, y, z))
    }

    /// Read an absolute index value
    pub fn index(&self, index: usize) -> Result<u32, GeometryError> {
        let offset = index.saturating_mul(self.index_size);
        match self.index_size {
            2 => {
                let bytes = read_range(self.index_data, offset, 2, "Index")?;
                Ok(u32::from(bytemuck::pod_read_unaligned::<u16>(bytes)))
            }
            4 => {
                let bytes = read_range(self.index_data, offset, 4, "Index")?;
                Ok(bytemuck::pod_read_unaligned::<u32>(bytes))
            }
            size => Err(GeometryError::UnsupportedIndexSize { size }),
        }
    }
}

fn read_range<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    buffer: &'static str,
) -> Result<&'a [u8], GeometryError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(GeometryError::BufferOverrun {
            buffer,
            offset,
            len: data.len(),
        })
}

/// One drawable piece of a model at one level of detail
#[derive(Debug, Clone)]
pub struct Geometry {
    vertex_buffer: Option<Arc<VertexBuffer>>,
    index_buffer: Option<Arc<IndexBuffer>>,
    index_start: u32,
    index_count: u32,
    vertex_start: u32,
    vertex_count: u32,
}

impl Geometry {
    /// Create a geometry over shared buffers with an empty draw range
    pub fn new(vertex_buffer: Option<Arc<VertexBuffer>>, index_buffer: Option<Arc<IndexBuffer>>) -> Self {
        Self {
            vertex_buffer,
            index_buffer,
            index_start: 0,
            index_count: 0,
            vertex_start: 0,
            vertex_count: 0,
        }
    }

    /// Create a geometry drawing the whole of both buffers
    pub fn whole(vertex_buffer: Arc<VertexBuffer>, index_buffer: Arc<IndexBuffer>) -> Self {
        let vertex_count = vertex_buffer.vertex_count() as u32;
        let index_count = index_buffer.index_count() as u32;
        Self::new(Some(vertex_buffer), Some(index_buffer)).with_draw_range(0, index_count, 0, vertex_count)
    }

    /// Set the index and vertex ranges this geometry draws
    pub fn set_draw_range(&mut self, index_start: u32, index_count: u32, vertex_start: u32, vertex_count: u32) {
        self.index_start = index_start;
        self.index_count = index_count;
        self.vertex_start = vertex_start;
        self.vertex_count = vertex_count;
    }

    /// Builder form of [`Geometry::set_draw_range`]
    #[must_use]
    pub fn with_draw_range(mut self, index_start: u32, index_count: u32, vertex_start: u32, vertex_count: u32) -> Self {
        self.set_draw_range(index_start, index_count, vertex_start, vertex_count);
        self
    }

    /// First index of the draw range
    pub fn index_start(&self) -> u32 {
        self.index_start
    }

    /// Number of indices in the draw range
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// First vertex of the draw range
    pub fn vertex_start(&self) -> u32 {
        self.vertex_start
    }

    /// Number of vertices in the draw range
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// CPU-side data, or `None` if either buffer is missing or GPU-only
    pub fn raw_data(&self) -> Option<RawGeometryData<'_>> {
        let vertex_buffer = self.vertex_buffer.as_deref()?;
        let index_buffer = self.index_buffer.as_deref()?;
        Some(RawGeometryData {
            vertex_data: vertex_buffer.data()?,
            vertex_size: vertex_buffer.vertex_size(),
            index_data: index_buffer.data()?,
            index_size: index_buffer.index_size(),
        })
    }
}

/// Level-of-detail table of one sub-geometry
pub type GeometryLods = Vec<Option<Arc<Geometry>>>;

/// A renderable model: named, bounded, made of sub-geometries
#[derive(Debug, Clone, Default)]
pub struct Model {
    name: String,
    bounding_box: BoundingBox,
    geometries: Vec<GeometryLods>,
}

impl Model {
    /// Create an empty model
    pub fn new(name: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            name: name.into(),
            bounding_box,
            geometries: Vec::new(),
        }
    }

    /// Append a sub-geometry with its LOD levels, returning its index
    pub fn add_geometry(&mut self, lods: GeometryLods) -> usize {
        self.geometries.push(lods);
        self.geometries.len() - 1
    }

    /// Builder form of [`Model::add_geometry`]
    #[must_use]
    pub fn with_geometry(mut self, lods: GeometryLods) -> Self {
        self.add_geometry(lods);
        self
    }

    /// Replace the model-space bounding box
    pub fn set_bounding_box(&mut self, bounding_box: BoundingBox) {
        self.bounding_box = bounding_box;
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Model-space bounding box
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Per-sub-geometry LOD tables
    pub fn geometries(&self) -> &[GeometryLods] {
        &self.geometries
    }

    /// Number of sub-geometries
    pub fn num_geometries(&self) -> usize {
        self.geometries.len()
    }

    /// Geometry at a sub-geometry index and exact LOD level
    pub fn geometry(&self, index: usize, lod_level: usize) -> Option<&Geometry> {
        self.geometries.get(index)?.get(lod_level)?.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle_geometry(index_buffer: IndexBuffer) -> Geometry {
        let vertices = Arc::new(VertexBuffer::from_positions(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]));
        Geometry::whole(vertices, Arc::new(index_buffer))
    }

    #[test]
    fn test_whole_geometry_draw_range() {
        let geometry = triangle_geometry(IndexBuffer::from_u16(&[0, 1, 2]));

        assert_eq!(geometry.vertex_start(), 0);
        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.index_start(), 0);
        assert_eq!(geometry.index_count(), 3);
    }

    #[test]
    fn test_raw_data_reads_positions_and_indices() {
        let geometry = triangle_geometry(IndexBuffer::from_u32(&[2, 1, 0]));
        let raw = geometry.raw_data().unwrap();

        assert!(raw.validate().is_ok());
        assert_relative_eq!(raw.position(1).unwrap(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(raw.index(0).unwrap(), 2);
        assert_eq!(raw.index(2).unwrap(), 0);
    }

    #[test]
    fn test_raw_data_reports_overrun() {
        let geometry = triangle_geometry(IndexBuffer::from_u16(&[0, 1, 2]));
        let raw = geometry.raw_data().unwrap();

        assert!(matches!(raw.position(3), Err(GeometryError::BufferOverrun { buffer: "Vertex", .. })));
        assert!(matches!(raw.index(3), Err(GeometryError::BufferOverrun { buffer: "Index", .. })));
    }

    #[test]
    fn test_raw_data_rejects_odd_index_size() {
        let geometry = triangle_geometry(IndexBuffer::from_bytes(vec![0, 1, 2], 1));
        let raw = geometry.raw_data().unwrap();

        assert_eq!(raw.validate(), Err(GeometryError::UnsupportedIndexSize { size: 1 }));
        assert_eq!(raw.index(0), Err(GeometryError::UnsupportedIndexSize { size: 1 }));
    }

    #[test]
    fn test_raw_data_missing_without_shadow() {
        let geometry = Geometry::new(
            Some(Arc::new(VertexBuffer::without_shadow_data(12, 3))),
            Some(Arc::new(IndexBuffer::from_u16(&[0, 1, 2]))),
        );
        assert!(geometry.raw_data().is_none());
        assert!(Geometry::new(None, None).raw_data().is_none());
    }

    #[test]
    fn test_model_geometry_lookup() {
        let geometry = Arc::new(triangle_geometry(IndexBuffer::from_u16(&[0, 1, 2])));
        let model = Model::new("tri", BoundingBox::default())
            .with_geometry(vec![Some(geometry), None]);

        assert_eq!(model.name(), "tri");
        assert_eq!(model.num_geometries(), 1);
        assert!(model.geometry(0, 0).is_some());
        assert!(model.geometry(0, 1).is_none());
        assert!(model.geometry(1, 0).is_none());
    }
}
