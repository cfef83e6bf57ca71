//! Fixture models shared by the collision tests

use std::sync::Arc;

use super::{Geometry, IndexBuffer, Model, VertexBuffer};
use crate::foundation::math::{BoundingBox, Vec3};

/// Model with a single sub-geometry and a single LOD
pub fn single_geometry_model(name: &str, positions: &[Vec3], index_buffer: IndexBuffer) -> Model {
    let bounds = BoundingBox::from_points(positions).unwrap_or_default();
    let geometry = Geometry::whole(
        Arc::new(VertexBuffer::from_positions(positions)),
        Arc::new(index_buffer),
    );
    Model::new(name, bounds).with_geometry(vec![Some(Arc::new(geometry))])
}

/// Corners of the cube spanning -1..1 on every axis
pub fn cube_corners() -> Vec<Vec3> {
    let mut corners = Vec::with_capacity(8);
    for &x in &[-1.0, 1.0] {
        for &y in &[-1.0, 1.0] {
            for &z in &[-1.0, 1.0] {
                corners.push(Vec3::new(x, y, z));
            }
        }
    }
    corners
}

/// Closed cube mesh, 8 vertices and 12 triangles with 16-bit indices
pub fn cube_model(name: &str) -> Model {
    // Corner i has x = bit 2, y = bit 1, z = bit 0
    let indices: [u16; 36] = [
        0, 1, 3, 0, 3, 2, // -x
        4, 6, 7, 4, 7, 5, // +x
        0, 4, 5, 0, 5, 1, // -y
        2, 3, 7, 2, 7, 6, // +y
        0, 2, 6, 0, 6, 4, // -z
        1, 5, 7, 1, 7, 3, // +z
    ];
    single_geometry_model(name, &cube_corners(), IndexBuffer::from_u16(&indices))
}

/// Regular `size` x `size` grid on XZ with unit spacing and the given heights
pub fn grid_model<F>(name: &str, size: usize, height: F) -> Model
where
    F: Fn(usize, usize) -> f32,
{
    let mut positions = Vec::with_capacity(size * size);
    for z in 0..size {
        for x in 0..size {
            positions.push(Vec3::new(x as f32, height(x, z), z as f32));
        }
    }

    let mut indices = Vec::new();
    for z in 0..size.saturating_sub(1) {
        for x in 0..size.saturating_sub(1) {
            let i = (z * size + x) as u32;
            let row = size as u32;
            indices.extend_from_slice(&[i, i + row, i + 1, i + 1, i + row, i + row + 1]);
        }
    }

    single_geometry_model(name, &positions, IndexBuffer::from_u32(&indices))
}

/// Two sub-geometries drawing separate ranges of one shared buffer pair
///
/// Sub-geometry 0 draws vertices 0..3 with indices 0..3, sub-geometry 1
/// draws vertices 3..7 with indices 3..9. Index values are absolute.
pub fn shared_buffer_model(name: &str) -> Model {
    let positions = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(5.0, 0.0, 0.0),
        Vec3::new(6.0, 0.0, 0.0),
        Vec3::new(5.0, 1.0, 0.0),
        Vec3::new(6.0, 1.0, 0.0),
    ];
    let vertices = Arc::new(VertexBuffer::from_positions(&positions));
    let indices = Arc::new(IndexBuffer::from_u16(&[0, 1, 2, 3, 4, 5, 5, 4, 6]));

    let first = Geometry::new(Some(vertices.clone()), Some(indices.clone())).with_draw_range(0, 3, 0, 3);
    let second = Geometry::new(Some(vertices), Some(indices)).with_draw_range(3, 6, 3, 4);

    Model::new(name, BoundingBox::from_points(&positions).unwrap_or_default())
        .with_geometry(vec![Some(Arc::new(first))])
        .with_geometry(vec![Some(Arc::new(second))])
}

/// A single triangle offset by `x` with 16-bit indices
pub fn triangle_geometry(x: f32) -> Arc<Geometry> {
    let vertices = VertexBuffer::from_positions(&[
        Vec3::new(x, 0.0, 0.0),
        Vec3::new(x + 1.0, 0.0, 0.0),
        Vec3::new(x, 1.0, 0.0),
    ]);
    Arc::new(Geometry::whole(Arc::new(vertices), Arc::new(IndexBuffer::from_u16(&[0, 1, 2]))))
}
