//! Collision shape definitions
//!
//! [`CollisionShapeAttributes`] is the serialized configuration of a shape;
//! [`CollisionGeometry`] is what a build of those attributes produces for
//! the physics layer. Primitive dimensions are scaled by the node's world
//! scale at build time, mesh assets are extracted at that scale.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::heightfield::{GridSize, HeightfieldAsset};
use super::hull::HullGenerator;
use super::triangle_mesh::{MeshKind, TriangleMeshAsset};
use crate::config::Config;
use crate::foundation::math::Vec3;
use crate::geometry::Model;
use crate::physics::ShapeError;

/// Kind of collision shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShapeType {
    /// Box with `size` as full extents
    #[default]
    Box,
    /// Sphere with `size.x` as diameter
    Sphere,
    /// Y-aligned cylinder, `size.x` diameter and `size.y` height
    Cylinder,
    /// Y-aligned capsule, `size.x` diameter and `size.y` total height
    Capsule,
    /// Y-aligned cone, `size.x` base diameter and `size.y` height
    Cone,
    /// The model's triangles
    TriangleMesh,
    /// Convex hull of the model's vertices
    ConvexHull,
    /// Heightfield sampled from the model
    Heightfield,
}

impl ShapeType {
    /// True for shapes built from a model
    pub fn uses_model(self) -> bool {
        matches!(self, Self::TriangleMesh | Self::ConvexHull | Self::Heightfield)
    }
}

/// Serialized configuration of a collision shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionShapeAttributes {
    /// Shape kind
    pub shape_type: ShapeType,
    /// Unscaled primitive dimensions
    pub size: Vec3,
    /// Model LOD used for mesh shapes
    pub lod_level: u32,
    /// Convex hull skin width
    pub skin_width: f32,
    /// Heightfield grid size, derived from the model when absent
    pub heightfield_size: Option<GridSize>,
}

impl Default for CollisionShapeAttributes {
    fn default() -> Self {
        Self {
            shape_type: ShapeType::Box,
            size: Vec3::new(1.0, 1.0, 1.0),
            lod_level: 0,
            skin_width: 0.0,
            heightfield_size: None,
        }
    }
}

impl Config for CollisionShapeAttributes {}

/// Built collision geometry, ready for the physics layer
#[derive(Debug, Clone, Default)]
pub enum CollisionGeometry {
    /// Nothing to collide with
    #[default]
    None,
    /// Box half extents
    Box {
        /// Half extents along each axis
        half_extents: Vec3,
    },
    /// Sphere
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Y-aligned cylinder
    Cylinder {
        /// Radius
        radius: f32,
        /// Total height
        height: f32,
    },
    /// Y-aligned capsule
    Capsule {
        /// Radius
        radius: f32,
        /// Total height including caps
        height: f32,
    },
    /// Y-aligned cone
    Cone {
        /// Base radius
        radius: f32,
        /// Height
        height: f32,
    },
    /// Raw or convex triangle mesh
    TriangleMesh(Arc<TriangleMeshAsset>),
    /// Height grid
    Heightfield(Arc<HeightfieldAsset>),
}

impl CollisionGeometry {
    /// Build geometry for `attributes` at `world_scale`
    ///
    /// Model-based shapes without a model produce [`CollisionGeometry::None`].
    pub fn build(
        attributes: &CollisionShapeAttributes,
        model: Option<&Model>,
        world_scale: &Vec3,
        generator: &dyn HullGenerator,
    ) -> Result<Self, ShapeError> {
        let size = attributes.size.component_mul(world_scale);
        let lod_level = attributes.lod_level as usize;

        let geometry = match (attributes.shape_type, model) {
            (ShapeType::Box, _) => Self::Box {
                half_extents: size * 0.5,
            },
            (ShapeType::Sphere, _) => Self::Sphere { radius: size.x * 0.5 },
            (ShapeType::Cylinder, _) => Self::Cylinder {
                radius: size.x * 0.5,
                height: size.y,
            },
            (ShapeType::Capsule, _) => Self::Capsule {
                radius: size.x * 0.5,
                height: size.y,
            },
            (ShapeType::Cone, _) => Self::Cone {
                radius: size.x * 0.5,
                height: size.y,
            },
            (ShapeType::TriangleMesh, Some(model)) => Self::TriangleMesh(Arc::new(TriangleMeshAsset::with_generator(
                model,
                MeshKind::Triangles,
                lod_level,
                world_scale,
                generator,
            )?)),
            (ShapeType::ConvexHull, Some(model)) => Self::TriangleMesh(Arc::new(TriangleMeshAsset::with_generator(
                model,
                MeshKind::ConvexHull {
                    skin_width: attributes.skin_width,
                },
                lod_level,
                world_scale,
                generator,
            )?)),
            (ShapeType::Heightfield, Some(model)) => Self::Heightfield(Arc::new(HeightfieldAsset::new(
                model,
                attributes.heightfield_size,
                world_scale,
            )?)),
            (ShapeType::TriangleMesh | ShapeType::ConvexHull | ShapeType::Heightfield, None) => Self::None,
        };

        Ok(geometry)
    }

    /// True when there is nothing to collide with
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The mesh asset, for mesh shapes
    pub fn triangle_mesh(&self) -> Option<&Arc<TriangleMeshAsset>> {
        match self {
            Self::TriangleMesh(asset) => Some(asset),
            _ => None,
        }
    }

    /// The heightfield asset, for heightfield shapes
    pub fn heightfield(&self) -> Option<&Arc<HeightfieldAsset>> {
        match self {
            Self::Heightfield(asset) => Some(asset),
            _ => None,
        }
    }
}
