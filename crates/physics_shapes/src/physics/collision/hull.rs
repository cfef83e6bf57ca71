//! Convex hull generation
//!
//! The hull algorithm sits behind [`HullGenerator`] so it can be swapped or
//! stubbed. Callers describe the input as packed floats with a byte stride,
//! the way vertex data arrives from the render side, and receive the hull
//! as an owned vertex list plus a triangle index list.

use bitflags::bitflags;
use log::{debug, error};

use super::extract::ExtractedMesh;
use crate::foundation::math::{BoundingBox, Vec3};
use crate::physics::HullError;

bitflags! {
    /// Output options for hull generation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HullFlags: u32 {
        /// Emit the hull as a triangle list
        const TRIANGLES = 1 << 0;
        /// Emit triangles clockwise seen from outside
        const REVERSE_ORDER = 1 << 1;
    }
}

/// Input to a hull generator
#[derive(Debug, Clone, Copy)]
pub struct HullDesc<'a> {
    /// Output options
    pub flags: HullFlags,
    /// Number of input vertices
    pub vertex_count: usize,
    /// Packed vertex floats, position first in each vertex
    pub vertices: &'a [f32],
    /// Distance between vertices in bytes
    pub vertex_stride: usize,
    /// Outward inflation of the hull planes
    pub skin_width: f32,
}

impl<'a> HullDesc<'a> {
    /// Describe tightly packed positions with triangle output
    pub fn triangles(vertices: &'a [f32], skin_width: f32) -> Self {
        Self {
            flags: HullFlags::TRIANGLES,
            vertex_count: vertices.len() / 3,
            vertices,
            vertex_stride: 3 * std::mem::size_of::<f32>(),
            skin_width,
        }
    }

    /// Unpack the input positions
    pub fn points(&self) -> Result<Vec<Vec3>, HullError> {
        let float_size = std::mem::size_of::<f32>();
        if self.vertex_stride < 3 * float_size || self.vertex_stride % float_size != 0 {
            return Err(HullError::InvalidStride {
                stride: self.vertex_stride,
            });
        }
        let floats_per_vertex = self.vertex_stride / float_size;

        (0..self.vertex_count)
            .map(|i| {
                let offset = i * floats_per_vertex;
                match self.vertices.get(offset..offset + 3) {
                    Some(&[x, y, z]) => Ok(Vec3::new(x, y, z)),
                    _ => Err(HullError::TruncatedVertexData {
                        vertex_count: self.vertex_count,
                    }),
                }
            })
            .collect()
    }
}

/// Hull produced by a generator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HullResult {
    /// Hull vertices
    pub output_vertices: Vec<Vec3>,
    /// Triangle indices into `output_vertices`
    pub indices: Vec<u32>,
}

impl HullResult {
    /// Number of hull vertices
    pub fn num_output_vertices(&self) -> usize {
        self.output_vertices.len()
    }

    /// Number of indices
    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles
    pub fn num_faces(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Convex hull algorithm
pub trait HullGenerator {
    /// Build the convex hull of the described points
    fn create_convex_hull(&self, desc: &HullDesc<'_>) -> Result<HullResult, HullError>;
}

/// Quickhull via `parry3d`, with skin width applied as plane offset
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickHullGenerator;

impl HullGenerator for QuickHullGenerator {
    fn create_convex_hull(&self, desc: &HullDesc<'_>) -> Result<HullResult, HullError> {
        if !desc.flags.contains(HullFlags::TRIANGLES) {
            return Err(HullError::UnsupportedFlags(desc.flags));
        }
        if !desc.skin_width.is_finite() || desc.skin_width < 0.0 {
            return Err(HullError::InvalidSkinWidth(desc.skin_width));
        }

        let points = desc.points()?;
        if !spans_volume(&points) {
            return Err(HullError::DegenerateInput {
                point_count: points.len(),
            });
        }

        let input: Vec<parry3d::math::Point<parry3d::math::Real>> = points
            .iter()
            .map(|p| parry3d::math::Point::new(p.x, p.y, p.z))
            .collect();
        let (hull_points, hull_triangles) = parry3d::transformation::convex_hull(&input);
        if hull_triangles.is_empty() {
            return Err(HullError::DegenerateInput {
                point_count: points.len(),
            });
        }

        let mut output_vertices: Vec<Vec3> = hull_points.iter().map(|p| Vec3::new(p.x, p.y, p.z)).collect();
        let mut indices: Vec<u32> = Vec::with_capacity(hull_triangles.len() * 3);
        let centroid = output_vertices.iter().fold(Vec3::zeros(), |acc, v| acc + v) / output_vertices.len() as f32;

        for [a, b, c] in hull_triangles {
            let (va, vb, vc) = (
                output_vertices[a as usize],
                output_vertices[b as usize],
                output_vertices[c as usize],
            );
            let normal = (vb - va).cross(&(vc - va));
            // Counter-clockwise seen from outside
            if normal.dot(&(va - centroid)) < 0.0 {
                indices.extend_from_slice(&[a, c, b]);
            } else {
                indices.extend_from_slice(&[a, b, c]);
            }
        }

        if desc.skin_width > 0.0 {
            inflate(&mut output_vertices, &indices, desc.skin_width);
        }
        if desc.flags.contains(HullFlags::REVERSE_ORDER) {
            for triangle in indices.chunks_exact_mut(3) {
                triangle.swap(1, 2);
            }
        }

        debug!(
            "Convex hull: {} input points -> {} vertices, {} triangles",
            points.len(),
            output_vertices.len(),
            indices.len() / 3
        );

        Ok(HullResult {
            output_vertices,
            indices,
        })
    }
}

/// Build the convex hull of a point cloud as a triangle mesh
///
/// Packs the points the way the generator expects and takes ownership of
/// its output.
pub fn build_convex_hull(
    generator: &dyn HullGenerator,
    points: &[Vec3],
    skin_width: f32,
) -> Result<ExtractedMesh, HullError> {
    let packed: Vec<f32> = points.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
    let desc = HullDesc::triangles(&packed, skin_width);

    let result = generator.create_convex_hull(&desc).map_err(|err| {
        error!("Convex hull generation failed for {} points: {}", points.len(), err);
        err
    })?;

    let vertex_count = result.output_vertices.len();
    let index_count = result.indices.len();
    let in_range = result.indices.iter().all(|&index| (index as usize) < vertex_count);
    if index_count % 3 != 0 || !in_range {
        error!("Hull generator returned {index_count} indices over {vertex_count} vertices");
        return Err(HullError::InvalidOutput {
            vertex_count,
            index_count,
        });
    }

    Ok(ExtractedMesh::from_parts(result.output_vertices, result.indices))
}

/// True if the points contain four that are not coplanar
fn spans_volume(points: &[Vec3]) -> bool {
    let Some(bounds) = BoundingBox::from_points(points) else {
        return false;
    };
    let extent = bounds.size().norm();
    if points.len() < 4 || !extent.is_finite() || extent <= f32::EPSILON {
        return false;
    }
    let tolerance = extent * 1e-5;

    let origin = points[0];
    let (second, length) = farthest(points, origin, |p| (p - origin).norm());
    if length <= tolerance {
        return false;
    }
    let axis = (second - origin) / length;

    let (third, line_distance) = farthest(points, origin, |p| axis.cross(&(p - origin)).norm());
    if line_distance <= tolerance {
        return false;
    }
    let normal = axis.cross(&(third - origin)).normalize();

    let (_, plane_distance) = farthest(points, origin, |p| normal.dot(&(p - origin)).abs());
    plane_distance > tolerance
}

/// Point with the largest `distance`, starting from `origin` at zero
fn farthest(points: &[Vec3], origin: Vec3, distance: impl Fn(&Vec3) -> f32) -> (Vec3, f32) {
    points
        .iter()
        .map(|p| (*p, distance(p)))
        .fold((origin, 0.0), |best, candidate| if candidate.1 > best.1 { candidate } else { best })
}

/// Push every vertex out so each incident hull plane moves by `skin_width`
fn inflate(vertices: &mut [Vec3], indices: &[u32], skin_width: f32) {
    let mut incident: Vec<Vec<Vec3>> = vec![Vec::new(); vertices.len()];

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        let Some(normal) = (vertices[b] - vertices[a])
            .cross(&(vertices[c] - vertices[a]))
            .try_normalize(f32::EPSILON)
        else {
            continue;
        };
        for corner in [a, b, c] {
            let planes = &mut incident[corner];
            // Coplanar triangles of one face share a plane
            if !planes.iter().any(|plane| plane.dot(&normal) > 1.0 - 1e-4) {
                planes.push(normal);
            }
        }
    }

    for (vertex, planes) in vertices.iter_mut().zip(&incident) {
        let Some(direction) = planes
            .iter()
            .fold(Vec3::zeros(), |acc, plane| acc + plane)
            .try_normalize(f32::EPSILON)
        else {
            continue;
        };
        let min_cos = planes.iter().map(|plane| plane.dot(&direction)).fold(f32::INFINITY, f32::min);
        if min_cos > f32::EPSILON {
            *vertex += direction * (skin_width / min_cos);
        }
    }
}
