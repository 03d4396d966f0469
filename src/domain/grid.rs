//! The level's tile grid.
//!
//! Row-major `u16` cells with a fixed row stride of [`ROW_STRIDE`]. The level
//! subsystem owns the grid; the core only borrows it for the duration of a
//! level.
//!
//! Reads outside the grid never panic: they yield [`TileCode::WALL`], so the
//! level edge behaves as a solid border for collision and as a wall tile for
//! rendering.

use super::tile::TileCode;
use crate::error::GridError;

/// Cells per tile row. All index arithmetic in the crate derives from this.
pub const ROW_STRIDE: usize = 128;

/// Vertical world units per tile row (one unit per cell of row stride).
pub const ROW_UNITS: i32 = ROW_STRIDE as i32;

/// `y >> ROW_SHIFT` converts a vertical world position to a tile row.
pub const ROW_SHIFT: u32 = 7;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    cells: Vec<u16>,
    height: usize,
}

impl TileGrid {
    pub fn new(cells: Vec<u16>) -> Result<Self, GridError> {
        if cells.is_empty() {
            return Err(GridError::Empty);
        }
        if cells.len() % ROW_STRIDE != 0 {
            return Err(GridError::RaggedRows { len: cells.len(), stride: ROW_STRIDE });
        }
        let height = cells.len() / ROW_STRIDE;
        Ok(TileGrid { cells, height })
    }

    /// A grid of `height` rows filled with `fill`.
    pub fn filled(height: usize, fill: TileCode) -> Result<Self, GridError> {
        Self::new(vec![fill.0; height * ROW_STRIDE])
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.height || col >= ROW_STRIDE {
            return None;
        }
        Some(row * ROW_STRIDE + col)
    }

    pub fn get(&self, row: i32, col: i32) -> Option<TileCode> {
        self.index(row, col).map(|i| TileCode(self.cells[i]))
    }

    /// Code at `(row, col)`, or [`TileCode::WALL`] outside the grid.
    #[inline]
    pub fn cell(&self, row: i32, col: i32) -> TileCode {
        match self.get(row, col) {
            Some(code) => code,
            None => {
                tracing::trace!(row, col, "tile read outside grid");
                TileCode::WALL
            }
        }
    }

    /// Overwrite one cell. Returns false if `(row, col)` is outside the grid.
    pub fn set(&mut self, row: i32, col: i32, code: TileCode) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = code.0;
                true
            }
            None => false,
        }
    }
}
