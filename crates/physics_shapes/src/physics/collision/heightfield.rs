//! Heightfield collision assets
//!
//! Samples the first sub-geometry of a model at LOD 0 into a regular grid of
//! heights. The grid spans the model's bounding box on X and Z; heights are
//! scaled, grid placement is not. Several vertices landing in one cell keep
//! the highest of them.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::foundation::math::{Vec2, Vec3};
use crate::geometry::Model;
use crate::physics::GeometryError;

/// Bias added to a vertex's fractional cell coordinate before truncation
const CELL_BIAS: f32 = 0.25;

/// Number of grid points along X (width) and Z (depth)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    /// Points along X
    pub width: u32,
    /// Points along Z
    pub depth: u32,
}

impl GridSize {
    /// Create a grid size
    pub fn new(width: u32, depth: u32) -> Self {
        Self { width, depth }
    }
}

/// Row-major grid of heights sampled from a model
#[derive(Debug, Clone, Default)]
pub struct HeightfieldAsset {
    model_name: String,
    width: usize,
    depth: usize,
    spacing: Vec2,
    heights: Vec<f32>,
}

impl HeightfieldAsset {
    /// Sample `model` into a grid
    ///
    /// With `size` of `None` the grid is square with `floor(sqrt(vertex_count))`
    /// points per side. A model without sub-geometries or without CPU-side
    /// data gives an empty heightfield.
    pub fn new(model: &Model, size: Option<GridSize>, scale: &Vec3) -> Result<Self, GeometryError> {
        let empty = Self {
            model_name: model.name().to_string(),
            ..Self::default()
        };

        let Some(geometry) = model.geometry(0, 0) else {
            trace!("Model '{}' has no LOD 0 geometry for a heightfield", model.name());
            return Ok(empty);
        };
        let Some(raw) = geometry.raw_data() else {
            trace!("Model '{}' has no CPU-side data for a heightfield", model.name());
            return Ok(empty);
        };

        let (width, depth) = match size {
            Some(size) => (size.width as usize, size.depth as usize),
            None => {
                let side = f64::from(geometry.vertex_count()).sqrt() as usize;
                (side, side)
            }
        };
        if width == 0 || depth == 0 {
            return Ok(empty);
        }

        let bounds = model.bounding_box();
        let spacing = Vec2::new(
            (bounds.max.x - bounds.min.x) / (width - 1) as f32,
            (bounds.max.z - bounds.min.z) / (depth - 1) as f32,
        );

        let too_large = GeometryError::GridTooLarge { width, depth };
        let cells = width.checked_mul(depth).ok_or_else(|| too_large.clone())?;
        let mut heights = Vec::new();
        heights.try_reserve_exact(cells).map_err(|_| too_large)?;
        heights.resize(cells, bounds.min.y * scale.y);

        let vertex_start = geometry.vertex_start() as usize;
        for i in vertex_start..vertex_start + geometry.vertex_count() as usize {
            let vertex = raw.position(i)?;
            // Saturating casts: negative offsets land in cell 0, infinite ones in the last
            let x = (((vertex.x - bounds.min.x) / spacing.x + CELL_BIAS) as usize).min(width - 1);
            let z = (((vertex.z - bounds.min.z) / spacing.y + CELL_BIAS) as usize).min(depth - 1);

            let height = vertex.y * scale.y;
            let cell = &mut heights[z * width + x];
            if height > *cell {
                *cell = height;
            }
        }

        debug!("Built {}x{} heightfield for model '{}'", width, depth, model.name());

        Ok(Self {
            model_name: empty.model_name,
            width,
            depth,
            spacing,
            heights,
        })
    }

    /// Name of the source model
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Grid points along X
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid points along Z
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Distance between grid points along X and Z, in model space
    pub fn spacing(&self) -> Vec2 {
        self.spacing
    }

    /// Heights, row-major with X varying fastest
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Height at a grid point
    pub fn height_at(&self, x: usize, z: usize) -> Option<f32> {
        if x >= self.width || z >= self.depth {
            return None;
        }
        self.heights.get(z * self.width + x).copied()
    }

    /// True when no grid was allocated
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}
