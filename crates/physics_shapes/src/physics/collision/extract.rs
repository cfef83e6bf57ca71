//! Collision geometry extraction from render models
//!
//! Collects the triangles of every sub-geometry of a model at one level of
//! detail into a single vertex list and a single index list. Positions are
//! scaled; index values are rebased from the shared render buffers into the
//! new contiguous vertex numbering.

use log::{debug, trace};

use crate::foundation::math::Vec3;
use crate::geometry::{Geometry, Model, RawGeometryData};
use crate::physics::GeometryError;

/// Flat triangle list produced by extraction
///
/// Every index is below [`ExtractedMesh::vertex_count`] and the index count
/// is a multiple of 3.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedMesh {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
}

impl ExtractedMesh {
    /// Mesh with no vertices or indices
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Triangle indices
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when there is nothing to collide with
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Iterate triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }
}

/// Reads collision geometry out of render models
pub struct GeometryExtractor;

impl GeometryExtractor {
    /// LOD level used for a sub-geometry with `lod_count` levels
    ///
    /// An out-of-range request falls back to the middle level, `lod_count / 2`.
    pub fn resolve_lod(lod_count: usize, requested: usize) -> usize {
        if requested >= lod_count {
            lod_count / 2
        } else {
            requested
        }
    }

    /// Extract all sub-geometries of `model` at `lod_level`, scaled by `scale`
    ///
    /// Sub-geometries without CPU-side data contribute nothing. A model with
    /// no usable triangles yields an empty mesh.
    pub fn extract(model: &Model, lod_level: usize, scale: &Vec3) -> Result<ExtractedMesh, GeometryError> {
        // Sizing pass
        let mut total_vertices = 0usize;
        let mut total_indices = 0usize;
        for (geometry, raw) in Self::selected_geometries(model, lod_level) {
            raw.validate()?;
            if geometry.index_count() % 3 != 0 {
                return Err(GeometryError::IncompleteTriangle {
                    index_count: geometry.index_count(),
                });
            }
            total_vertices += geometry.vertex_count() as usize;
            total_indices += geometry.index_count() as usize;
        }

        if total_vertices == 0 || total_indices == 0 {
            trace!("Model '{}' has no collision geometry at LOD {}", model.name(), lod_level);
            return Ok(ExtractedMesh::empty());
        }
        if u32::try_from(total_vertices).is_err() {
            return Err(GeometryError::TooManyVertices { count: total_vertices });
        }

        let mut vertices = Vec::with_capacity(total_vertices);
        let mut indices = Vec::with_capacity(total_indices);

        // Copy pass
        for (geometry, raw) in Self::selected_geometries(model, lod_level) {
            let first_vertex = vertices.len() as u32;
            let vertex_start = geometry.vertex_start();
            let vertex_count = geometry.vertex_count();

            for j in 0..vertex_count as usize {
                let position = raw.position(vertex_start as usize + j)?;
                vertices.push(position.component_mul(scale));
            }

            let index_start = geometry.index_start() as usize;
            for triangle in (0..geometry.index_count() as usize).step_by(3) {
                for corner in 0..3 {
                    let index = raw.index(index_start + triangle + corner)?;
                    indices.push(rebase(index, vertex_start, vertex_count, first_vertex)?);
                }
            }
        }

        debug!(
            "Extracted {} vertices, {} indices from model '{}' at LOD {}",
            vertices.len(),
            indices.len(),
            model.name(),
            lod_level
        );

        Ok(ExtractedMesh { vertices, indices })
    }

    /// Sub-geometries at their resolved LOD that have CPU-side data
    fn selected_geometries(
        model: &Model,
        lod_level: usize,
    ) -> impl Iterator<Item = (&Geometry, RawGeometryData<'_>)> + '_ {
        model.geometries().iter().enumerate().filter_map(move |(i, lods)| {
            let lod = Self::resolve_lod(lods.len(), lod_level);
            let geometry = lods.get(lod)?.as_deref()?;
            match geometry.raw_data() {
                Some(raw) => Some((geometry, raw)),
                None => {
                    trace!("Skipping geometry {} of model '{}': no CPU-side data", i, model.name());
                    None
                }
            }
        })
    }
}

/// Map an absolute render index into the extracted vertex numbering
fn rebase(index: u32, vertex_start: u32, vertex_count: u32, first_vertex: u32) -> Result<u32, GeometryError> {
    match index.checked_sub(vertex_start) {
        Some(local) if local < vertex_count => Ok(local + first_vertex),
        _ => Err(GeometryError::IndexOutOfRange {
            index,
            vertex_start,
            vertex_count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::BoundingBox;
    use crate::geometry::test_models::{cube_model, shared_buffer_model, single_geometry_model, triangle_geometry};
    use crate::geometry::{IndexBuffer, VertexBuffer};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn unit_scale() -> Vec3 {
        Vec3::new(1.0, 1.0, 1.0)
    }

    fn assert_well_formed(mesh: &ExtractedMesh) {
        assert_eq!(mesh.index_count() % 3, 0);
        for &index in mesh.indices() {
            assert!((index as usize) < mesh.vertex_count(), "index {index} out of range");
        }
    }

    #[test]
    fn test_resolve_lod_in_range() {
        assert_eq!(GeometryExtractor::resolve_lod(4, 0), 0);
        assert_eq!(GeometryExtractor::resolve_lod(4, 3), 3);
    }

    #[test]
    fn test_resolve_lod_falls_back_to_middle() {
        assert_eq!(GeometryExtractor::resolve_lod(2, 5), 1);
        // Not clamped to the last level
        assert_eq!(GeometryExtractor::resolve_lod(4, 10), 2);
        assert_eq!(GeometryExtractor::resolve_lod(1, 1), 0);
    }

    #[test]
    fn test_extract_cube() {
        let mesh = GeometryExtractor::extract(&cube_model("cube"), 0, &unit_scale()).unwrap();

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.index_count(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        assert_well_formed(&mesh);
    }

    #[test]
    fn test_extract_applies_scale() {
        let model = single_geometry_model(
            "scaled",
            &[Vec3::new(1.0, 2.0, 3.0), Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0)],
            IndexBuffer::from_u16(&[0, 1, 2]),
        );
        let mesh = GeometryExtractor::extract(&model, 0, &Vec3::new(2.0, 1.0, 0.5)).unwrap();

        assert_relative_eq!(mesh.vertices()[0], Vec3::new(2.0, 2.0, 1.5));
    }

    #[test]
    fn test_rebase_offsets_second_geometry() {
        let model = Model::new("pair", BoundingBox::default())
            .with_geometry(vec![Some(triangle_geometry(0.0))])
            .with_geometry(vec![Some(triangle_geometry(2.0))]);
        let mesh = GeometryExtractor::extract(&model, 0, &unit_scale()).unwrap();

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.indices(), &[0, 1, 2, 3, 4, 5]);
        assert_relative_eq!(mesh.vertices()[3], Vec3::new(2.0, 0.0, 0.0));
        assert_well_formed(&mesh);
    }

    #[test]
    fn test_rebase_shared_buffer_ranges() {
        let model = shared_buffer_model("shared");
        let mesh = GeometryExtractor::extract(&model, 0, &unit_scale()).unwrap();

        assert_eq!(mesh.vertex_count(), 7);
        assert_eq!(mesh.indices(), &[0, 1, 2, 3, 4, 5, 5, 4, 6]);
        assert_well_formed(&mesh);

        // Drawing only the second range renumbers it from zero
        let second = model.geometries()[1].clone();
        let model = Model::new("second", BoundingBox::default()).with_geometry(second);
        let mesh = GeometryExtractor::extract(&model, 0, &unit_scale()).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), &[0, 1, 2, 2, 1, 3]);
        assert_relative_eq!(mesh.vertices()[0], Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_extract_uses_lod_fallback_per_geometry() {
        let lods = (0..4).map(|lod| Some(triangle_geometry(lod as f32 * 10.0))).collect();
        let model = Model::new("lods", BoundingBox::default()).with_geometry(lods);

        let mesh = GeometryExtractor::extract(&model, 10, &unit_scale()).unwrap();
        assert_relative_eq!(mesh.vertices()[0], Vec3::new(20.0, 0.0, 0.0));

        let mesh = GeometryExtractor::extract(&model, 3, &unit_scale()).unwrap();
        assert_relative_eq!(mesh.vertices()[0], Vec3::new(30.0, 0.0, 0.0));
    }

    #[test]
    fn test_extract_skips_geometry_without_raw_data() {
        let gpu_only = Geometry::new(
            Some(Arc::new(VertexBuffer::without_shadow_data(12, 3))),
            Some(Arc::new(IndexBuffer::without_shadow_data(2))),
        )
        .with_draw_range(0, 3, 0, 3);
        let model = Model::new("mixed", BoundingBox::default())
            .with_geometry(vec![Some(Arc::new(gpu_only))])
            .with_geometry(vec![None])
            .with_geometry(vec![Some(triangle_geometry(0.0))]);

        let mesh = GeometryExtractor::extract(&model, 0, &unit_scale()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_extract_empty_model() {
        let model = Model::new("empty", BoundingBox::default());
        let mesh = GeometryExtractor::extract(&model, 0, &unit_scale()).unwrap();

        assert!(mesh.is_empty());
        assert_eq!(mesh, ExtractedMesh::empty());
    }

    #[test]
    fn test_extract_interleaved_vertices() {
        // position, normal
        let floats = [
            0.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
            4.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 4.0, 0.0, 1.0, 0.0,
        ];
        let geometry = Geometry::whole(
            Arc::new(VertexBuffer::from_interleaved(&floats, 6)),
            Arc::new(IndexBuffer::from_u32(&[0, 2, 1])),
        );
        let model = Model::new("interleaved", BoundingBox::default()).with_geometry(vec![Some(Arc::new(geometry))]);
        let mesh = GeometryExtractor::extract(&model, 0, &unit_scale()).unwrap();

        assert_relative_eq!(mesh.vertices()[1], Vec3::new(4.0, 0.0, 0.0));
        assert_relative_eq!(mesh.vertices()[2], Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(mesh.indices(), &[0, 2, 1]);
    }

    #[test]
    fn test_extract_rejects_unsupported_index_size() {
        let geometry = Geometry::whole(
            Arc::new(VertexBuffer::from_positions(&[Vec3::zeros(); 3])),
            Arc::new(IndexBuffer::from_bytes(vec![0; 9], 3)),
        );
        let model = Model::new("bad", BoundingBox::default()).with_geometry(vec![Some(Arc::new(geometry))]);

        assert_eq!(
            GeometryExtractor::extract(&model, 0, &unit_scale()),
            Err(GeometryError::UnsupportedIndexSize { size: 3 })
        );
    }

    #[test]
    fn test_extract_rejects_index_outside_range() {
        let model = single_geometry_model("bad", &[Vec3::zeros(); 3], IndexBuffer::from_u16(&[0, 1, 7]));

        assert_eq!(
            GeometryExtractor::extract(&model, 0, &unit_scale()),
            Err(GeometryError::IndexOutOfRange {
                index: 7,
                vertex_start: 0,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn test_extract_rejects_partial_triangle() {
        let model = single_geometry_model("bad", &[Vec3::zeros(); 3], IndexBuffer::from_u16(&[0, 1, 2, 0]));

        assert_eq!(
            GeometryExtractor::extract(&model, 0, &unit_scale()),
            Err(GeometryError::IncompleteTriangle { index_count: 4 })
        );
    }

    #[test]
    fn test_extract_is_deterministic() {
        let model = shared_buffer_model("shared");
        let scale = Vec3::new(0.3, 1.7, 2.1);
        let first = GeometryExtractor::extract(&model, 0, &scale).unwrap();
        let second = GeometryExtractor::extract(&model, 0, &scale).unwrap();

        assert_eq!(first, second);
    }
}
