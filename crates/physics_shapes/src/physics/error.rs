//! Error types for collision geometry construction

use thiserror::Error;

use super::collision::hull::HullFlags;

/// Corrupt or inconsistent render geometry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Index elements are neither 16 nor 32 bits wide
    #[error("Unsupported index size: {size} bytes (expected 2 or 4)")]
    UnsupportedIndexSize {
        /// Element size in bytes
        size: usize,
    },

    /// Vertex stride too small to hold a position
    #[error("Invalid vertex stride: {stride} bytes (position needs 12)")]
    InvalidVertexStride {
        /// Per-vertex stride in bytes
        stride: usize,
    },

    /// A draw range reaches past the end of a raw buffer
    #[error("{buffer} buffer overrun: offset {offset} past length {len}")]
    BufferOverrun {
        /// Which buffer was read
        buffer: &'static str,
        /// Byte offset of the failed read
        offset: usize,
        /// Buffer length in bytes
        len: usize,
    },

    /// An index does not reference its sub-geometry's vertex range
    #[error("Index {index} outside vertex range {vertex_start}..{vertex_start}+{vertex_count}")]
    IndexOutOfRange {
        /// The index value read from the buffer
        index: u32,
        /// First vertex of the sub-geometry
        vertex_start: u32,
        /// Vertex count of the sub-geometry
        vertex_count: u32,
    },

    /// Index count is not a whole number of triangles
    #[error("Index count {index_count} is not a multiple of 3")]
    IncompleteTriangle {
        /// Offending index count
        index_count: u32,
    },

    /// Heightfield grid cannot be allocated
    #[error("Heightfield grid {width}x{depth} is too large")]
    GridTooLarge {
        /// Grid points along X
        width: usize,
        /// Grid points along Z
        depth: usize,
    },

    /// Combined geometry does not fit 32-bit indices
    #[error("Too many vertices for 32-bit indices: {count}")]
    TooManyVertices {
        /// Total vertex count
        count: usize,
    },
}

/// Convex hull generation failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HullError {
    /// Fewer than four non-coplanar points
    #[error("Degenerate hull input: {point_count} points span no volume")]
    DegenerateInput {
        /// Number of input points
        point_count: usize,
    },

    /// Skin width negative or not finite
    #[error("Invalid skin width: {0}")]
    InvalidSkinWidth(f32),

    /// Vertex stride does not describe packed f32 positions
    #[error("Invalid hull vertex stride: {stride} bytes")]
    InvalidStride {
        /// Stride in bytes
        stride: usize,
    },

    /// Vertex slice shorter than count * stride
    #[error("Hull vertex data holds fewer than {vertex_count} vertices")]
    TruncatedVertexData {
        /// Requested vertex count
        vertex_count: usize,
    },

    /// Requested output format is not supported
    #[error("Unsupported hull flags: {0:?}")]
    UnsupportedFlags(HullFlags),

    /// Generator returned indices that do not form triangles over its vertices
    #[error("Invalid hull output: {index_count} indices over {vertex_count} vertices")]
    InvalidOutput {
        /// Returned vertex count
        vertex_count: usize,
        /// Returned index count
        index_count: usize,
    },
}

/// Collision asset construction failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// Source geometry is corrupt
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Convex hull could not be built
    #[error("Convex hull error: {0}")]
    Hull(#[from] HullError),
}
