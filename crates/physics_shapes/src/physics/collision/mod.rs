//! Collision geometry built from render models
//!
//! # Architecture
//!
//! Geometry is read from the renderer's own buffers and stored in MODEL
//! SPACE with the node's world scale applied at build time. Assets are
//! built once and never mutated; a scale or attribute change builds new
//! ones.
//!
//! # Module Organization
//!
//! - [`extract`] - Flattens a model's sub-geometries into one triangle list
//! - [`hull`] - Convex hull generation behind a swappable generator
//! - [`triangle_mesh`] - Raw or convex triangle mesh assets
//! - [`heightfield`] - Height grids sampled from a model
//! - [`shape`] - Shape attributes and the geometry built from them

pub mod extract;
pub mod heightfield;
pub mod hull;
pub mod shape;
pub mod triangle_mesh;

// Re-export commonly used types
pub use extract::{ExtractedMesh, GeometryExtractor};
pub use heightfield::{GridSize, HeightfieldAsset};
pub use hull::{build_convex_hull, HullDesc, HullFlags, HullGenerator, HullResult, QuickHullGenerator};
pub use shape::{CollisionGeometry, CollisionShapeAttributes, ShapeType};
pub use triangle_mesh::{MeshKind, TriangleMeshAsset};
