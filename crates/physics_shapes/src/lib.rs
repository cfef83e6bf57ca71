//! # Physics Shapes
//!
//! Collision geometry for the engine's physics layer, built from the same
//! models the renderer draws.
//!
//! ## Features
//!
//! - **Mesh Extraction**: Flattens every sub-geometry of a model at one LOD
//!   into a single scaled, rebased triangle list
//! - **Convex Hulls**: Reduces a model to its convex hull with a skin width
//! - **Heightfields**: Samples terrain models into regular height grids
//! - **Shape Component**: Rebuilds shapes on attribute or scale changes and
//!   keeps the physics world and rigid body informed
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use physics_shapes::prelude::*;
//!
//! fn build(model: Arc<Model>) -> Result<(), ShapeError> {
//!     let hull = TriangleMeshAsset::new(
//!         &model,
//!         MeshKind::ConvexHull { skin_width: 0.01 },
//!         0,
//!         &Vec3::new(1.0, 1.0, 1.0),
//!     )?;
//!     println!("{} hull indices", hull.index_count());
//!
//!     let mut shape = CollisionShapeComponent::new("body");
//!     shape.set_shape_type(ShapeType::TriangleMesh);
//!     shape.set_model(Some(model));
//!     shape.apply_attributes()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod geometry;
pub mod physics;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::Config,
        foundation::math::{BoundingBox, Quat, Vec3},
        geometry::{Geometry, IndexBuffer, Model, VertexBuffer},
        physics::{
            CollisionGeometry, CollisionShapeAttributes, CollisionShapeComponent, GeometryError, GridSize,
            HeightfieldAsset, MeshKind, PhysicsWorld, ShapeError, ShapeType, TriangleMeshAsset,
        },
    };
}
