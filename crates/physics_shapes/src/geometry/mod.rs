//! Render-side geometry sources
//!
//! Collision assets are extracted from the same vertex and index buffers the
//! renderer draws. This module holds the CPU-side view of that data.

pub mod buffer;
pub mod model;

#[cfg(test)]
pub(crate) mod test_models;

pub use buffer::{IndexBuffer, VertexBuffer};
pub use model::{Geometry, GeometryLods, Model, RawGeometryData, POSITION_SIZE};
