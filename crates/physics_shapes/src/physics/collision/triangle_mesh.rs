//! Triangle mesh collision assets
//!
//! A [`TriangleMeshAsset`] is built once from a model and never changes.
//! It stores either the model's own triangles or their convex hull, in
//! MODEL SPACE with the node scale already applied.

use log::debug;
use serde::{Deserialize, Serialize};

use super::extract::{ExtractedMesh, GeometryExtractor};
use super::hull::{build_convex_hull, HullGenerator, QuickHullGenerator};
use crate::foundation::math::Vec3;
use crate::geometry::Model;
use crate::physics::ShapeError;

/// Which triangles a mesh asset holds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MeshKind {
    /// The model's triangles as drawn
    Triangles,
    /// Convex hull of the model's vertices
    ConvexHull {
        /// Hull inflation margin
        skin_width: f32,
    },
}

/// Collision triangle mesh built from a model
#[derive(Debug, Clone)]
pub struct TriangleMeshAsset {
    model_name: String,
    kind: MeshKind,
    mesh: ExtractedMesh,
    index_count: usize,
    local_bounding_radius: f32,
}

impl TriangleMeshAsset {
    /// Build from `model` at `lod_level`, scaled by `scale`
    pub fn new(model: &Model, kind: MeshKind, lod_level: usize, scale: &Vec3) -> Result<Self, ShapeError> {
        Self::with_generator(model, kind, lod_level, scale, &QuickHullGenerator)
    }

    /// Build with a specific hull generator for the convex case
    pub fn with_generator(
        model: &Model,
        kind: MeshKind,
        lod_level: usize,
        scale: &Vec3,
        generator: &dyn HullGenerator,
    ) -> Result<Self, ShapeError> {
        let extracted = GeometryExtractor::extract(model, lod_level, scale)?;

        let mesh = match kind {
            MeshKind::Triangles => extracted,
            MeshKind::ConvexHull { skin_width } => build_convex_hull(generator, extracted.vertices(), skin_width)?,
        };

        // Furthest vertex from the model origin
        let local_bounding_radius = mesh
            .vertices()
            .iter()
            .map(|v| v.magnitude_squared())
            .fold(0.0f32, f32::max)
            .sqrt();

        debug!(
            "Built {:?} mesh for model '{}': {} vertices, {} indices",
            kind,
            model.name(),
            mesh.vertex_count(),
            mesh.index_count()
        );

        Ok(Self {
            model_name: model.name().to_string(),
            kind,
            index_count: mesh.index_count(),
            mesh,
            local_bounding_radius,
        })
    }

    /// Name of the source model
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Raw or convex
    pub fn kind(&self) -> MeshKind {
        self.kind
    }

    /// The stored triangles
    pub fn mesh(&self) -> &ExtractedMesh {
        &self.mesh
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[Vec3] {
        self.mesh.vertices()
    }

    /// Triangle indices
    pub fn indices(&self) -> &[u32] {
        self.mesh.indices()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    /// Number of indices in the final mesh
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Radius of the origin-centred sphere enclosing every vertex
    pub fn local_bounding_radius(&self) -> f32 {
        self.local_bounding_radius
    }

    /// True when the asset has no triangles
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}
