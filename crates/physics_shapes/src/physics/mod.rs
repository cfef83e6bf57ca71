//! Physics module for collision shapes
//!
//! Turns render models into collision data (triangle meshes, convex hulls
//! and heightfields) and manages the shape component that keeps that data
//! in step with its scene node.

pub mod collision;
pub mod collision_shape;
pub mod error;
pub mod world;

pub use collision::{
    CollisionGeometry,
    CollisionShapeAttributes,
    ExtractedMesh,
    GeometryExtractor,
    GridSize,
    HeightfieldAsset,
    MeshKind,
    ShapeType,
    TriangleMeshAsset,
};
pub use collision_shape::CollisionShapeComponent;
pub use error::{GeometryError, HullError, ShapeError};
pub use world::{CollisionShapeKey, CollisionShapeRegistry, PhysicsWorld, RigidBodyListener, SceneNode};
