//! Dungeon layout generation
//!
//! A rectangular cell grid: fully walled border, random interior wall
//! scatter, and a guaranteed open cross through the center so the spawn
//! area is never sealed. The grid is immutable once generated; the
//! collision field and renderer both derive from it.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Floor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("dungeon dimensions must be at least 3x3, got {width}x{height}")]
    DimensionsTooSmall { width: usize, height: usize },
}

/// Rectangular dungeon layout, row-major. Row indexes the z axis, column
/// the x axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl DungeonGrid {
    /// Generate a layout. Needs at least 3x3 so an interior exists.
    ///
    /// Walls are scattered with replacement (one draw per ten cells), so
    /// the actual interior wall count may come in under the draw count.
    /// Nothing guarantees every floor pocket is reachable; sealed corners
    /// are an accepted outcome at this density.
    pub fn generate(
        width: usize,
        height: usize,
        rng: &mut impl Rng,
    ) -> Result<DungeonGrid, GridError> {
        if width < 3 || height < 3 {
            return Err(GridError::DimensionsTooSmall { width, height });
        }

        let mut cells = vec![Cell::Floor; width * height];

        // Border ring
        for col in 0..width {
            cells[col] = Cell::Wall;
            cells[(height - 1) * width + col] = Cell::Wall;
        }
        for row in 0..height {
            cells[row * width] = Cell::Wall;
            cells[row * width + width - 1] = Cell::Wall;
        }

        // Interior scatter, one draw per ten cells
        let draws = (width * height) / 10;
        for _ in 0..draws {
            let row = rng.random_range(1..height - 1);
            let col = rng.random_range(1..width - 1);
            cells[row * width + col] = Cell::Wall;
        }

        // Carve the center cross back open, border left intact
        let center_row = height / 2;
        let center_col = width / 2;
        for col in 1..width - 1 {
            cells[center_row * width + col] = Cell::Floor;
        }
        for row in 1..height - 1 {
            cells[row * width + center_col] = Cell::Floor;
        }

        Ok(DungeonGrid {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.width + col]
    }

    #[inline]
    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) == Cell::Wall
    }

    /// (row, col) of every wall cell, row-major order
    pub fn wall_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Wall)
            .map(|(idx, _)| (idx / self.width, idx % self.width))
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Wall).count()
    }

    /// Center cell (row, col); generation guarantees it is open floor
    #[inline]
    pub fn center_cell(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn grid(width: usize, height: usize, seed: u64) -> DungeonGrid {
        let mut rng = Pcg32::seed_from_u64(seed);
        DungeonGrid::generate(width, height, &mut rng).unwrap()
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        let mut rng = Pcg32::seed_from_u64(1);
        for (w, h) in [(2, 10), (10, 2), (0, 0), (1, 1)] {
            assert_eq!(
                DungeonGrid::generate(w, h, &mut rng).unwrap_err(),
                GridError::DimensionsTooSmall {
                    width: w,
                    height: h
                },
                "{}x{} should be rejected",
                w,
                h
            );
        }
    }

    #[test]
    fn test_minimum_grid_is_all_border_plus_center() {
        let g = grid(3, 3, 7);
        // 3x3 leaves a single interior cell, which the cross keeps open
        assert_eq!(g.cell(1, 1), Cell::Floor);
        assert_eq!(g.wall_count(), 8);
    }

    #[test]
    fn test_dimensions_match_request() {
        let g = grid(12, 7, 42);
        assert_eq!(g.width(), 12);
        assert_eq!(g.height(), 7);
    }

    #[test]
    fn test_border_is_fully_walled() {
        let g = grid(10, 10, 3);
        for col in 0..10 {
            assert!(g.is_wall(0, col), "top border open at col {}", col);
            assert!(g.is_wall(9, col), "bottom border open at col {}", col);
        }
        for row in 0..10 {
            assert!(g.is_wall(row, 0), "left border open at row {}", row);
            assert!(g.is_wall(row, 9), "right border open at row {}", row);
        }
    }

    #[test]
    fn test_center_cross_is_open() {
        let g = grid(15, 11, 99);
        let (center_row, center_col) = g.center_cell();
        for col in 1..g.width() - 1 {
            assert_eq!(g.cell(center_row, col), Cell::Floor);
        }
        for row in 1..g.height() - 1 {
            assert_eq!(g.cell(row, center_col), Cell::Floor);
        }
    }

    #[test]
    fn test_scatter_count_is_bounded() {
        let g = grid(20, 20, 5);
        let border = 2 * 20 + 2 * 20 - 4;
        let draws = 20 * 20 / 10;
        assert!(g.wall_count() >= border);
        assert!(
            g.wall_count() <= border + draws,
            "wall count {} exceeds border {} + draws {}",
            g.wall_count(),
            border,
            draws
        );
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = grid(16, 16, 12345);
        let b = grid(16, 16, 12345);
        for row in 0..16 {
            for col in 0..16 {
                assert_eq!(a.cell(row, col), b.cell(row, col));
            }
        }
    }

    #[test]
    fn test_wall_cells_covers_every_wall() {
        let g = grid(9, 9, 8);
        let listed: Vec<_> = g.wall_cells().collect();
        assert_eq!(listed.len(), g.wall_count());
        for (row, col) in listed {
            assert!(g.is_wall(row, col));
        }
    }

    proptest! {
        #[test]
        fn prop_border_walled_and_cross_open(
            width in 3usize..32,
            height in 3usize..32,
            seed in any::<u64>(),
        ) {
            let g = grid(width, height, seed);
            prop_assert_eq!(g.width(), width);
            prop_assert_eq!(g.height(), height);
            for col in 0..width {
                prop_assert!(g.is_wall(0, col));
                prop_assert!(g.is_wall(height - 1, col));
            }
            for row in 0..height {
                prop_assert!(g.is_wall(row, 0));
                prop_assert!(g.is_wall(row, width - 1));
            }
            let (center_row, center_col) = g.center_cell();
            for col in 1..width - 1 {
                prop_assert_eq!(g.cell(center_row, col), Cell::Floor);
            }
            for row in 1..height - 1 {
                prop_assert_eq!(g.cell(row, center_col), Cell::Floor);
            }
        }
    }
}
