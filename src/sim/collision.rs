//! Circle-vs-wall collision over a flat rect list
//!
//! One axis-aligned rect per wall cell, derived from the grid once at
//! startup. Queries are a linear scan with short-circuit; at prototype
//! dungeon sizes (a few hundred rects) a spatial index is not worth its
//! bookkeeping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PROBE_STEP;
use crate::sim::grid::DungeonGrid;

/// Axis-aligned square footprint of one wall cell, on the XZ plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallRect {
    /// World-space center (x, z)
    pub center: Vec2,
    pub half_size: f32,
}

impl WallRect {
    /// Closest-point test: clamp the query point into the rect and compare
    /// the remaining distance against the circle radius
    #[inline]
    pub fn overlaps_circle(&self, point: Vec2, radius: f32) -> bool {
        let rel = point - self.center;
        let closest = rel.clamp(Vec2::splat(-self.half_size), Vec2::splat(self.half_size));
        rel.distance(closest) < radius
    }
}

/// Probe directions for `resolve_valid_position`: the 4 axis directions,
/// then the 4 normalized diagonals
const PROBE_DIRS: [Vec2; 8] = {
    use std::f32::consts::FRAC_1_SQRT_2;
    [
        Vec2::new(1.0, 0.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(0.0, -1.0),
        Vec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        Vec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        Vec2::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
        Vec2::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    ]
};

/// The dungeon's collision authority: every wall cell as a `WallRect`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionField {
    walls: Vec<WallRect>,
}

impl CollisionField {
    pub fn new(walls: Vec<WallRect>) -> CollisionField {
        CollisionField { walls }
    }

    /// Build the field from a generated layout. Cell (row, col) maps to a
    /// rect centered at (col * tile_size, row * tile_size).
    pub fn from_grid(grid: &DungeonGrid, tile_size: f32) -> CollisionField {
        let walls = grid
            .wall_cells()
            .map(|(row, col)| WallRect {
                center: Vec2::new(col as f32 * tile_size, row as f32 * tile_size),
                half_size: tile_size / 2.0,
            })
            .collect();
        CollisionField { walls }
    }

    #[inline]
    pub fn walls(&self) -> &[WallRect] {
        &self.walls
    }

    /// True when a circle at `point` intersects any wall rect. An empty
    /// field overlaps nothing.
    pub fn overlaps_wall(&self, point: Vec2, radius: f32) -> bool {
        self.walls
            .iter()
            .any(|rect| rect.overlaps_circle(point, radius))
    }

    /// Nearest valid position search, best effort. Probes every direction
    /// at each distance (0.1 steps out to twice the radius) and returns the
    /// first clear candidate; falls back to the input point when all probes
    /// also overlap.
    pub fn resolve_valid_position(&self, point: Vec2, radius: f32) -> Vec2 {
        if !self.overlaps_wall(point, radius) {
            return point;
        }
        let steps = (2.0 * radius / PROBE_STEP + 1e-3).floor() as usize;
        for i in 1..=steps {
            let dist = i as f32 * PROBE_STEP;
            for dir in PROBE_DIRS {
                let candidate = point + dir * dist;
                if !self.overlaps_wall(candidate, radius) {
                    return candidate;
                }
            }
        }
        point
    }
}
