//! The slice of player state the core reads and writes.
//!
//! Position is in world units: `x` in half-tiles, `y` in vertical units with
//! [`ROW_UNITS`](super::grid::ROW_UNITS) per tile row. `y` marks the top of
//! the lower half of the 16x32 body (the feet row); the head row is the one
//! above it.

use super::grid::ROW_SHIFT;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PlayerState {
    pub x: i32,
    pub y: i32,
    /// Nonzero while a climb animation plays; suppresses the ceiling
    /// transition and counts as grounded.
    pub climbing_frames_remaining: u32,
    pub is_falling: bool,
    pub is_hanging_from_ceiling: bool,
    pub has_grappling_hook: bool,
    /// Current animation frame of the player sprite.
    pub anim_frame: u16,
    /// Set when grabbing a ceiling hook; the game loop adjusts the camera
    /// and clears it.
    pub camera_adjust_needed: bool,
}

impl PlayerState {
    pub fn new(x: i32, y: i32) -> Self {
        PlayerState { x, y, ..Default::default() }
    }

    pub fn with_grappling_hook(mut self, enabled: bool) -> Self {
        self.has_grappling_hook = enabled;
        self
    }

    /// Tile row of the feet.
    #[inline]
    pub fn feet_row(&self) -> i32 {
        self.y >> ROW_SHIFT
    }

    /// Tile row of the head.
    #[inline]
    pub fn head_row(&self) -> i32 {
        self.feet_row() - 1
    }

    /// Tile columns covered by the body: one when `x` is even, two when the
    /// body straddles a tile boundary.
    #[inline]
    pub fn body_columns(&self) -> (i32, i32) {
        straddled_columns(self.x)
    }

    pub fn is_climbing(&self) -> bool {
        self.climbing_frames_remaining != 0
    }
}

/// Columns touched by a one-tile-wide body at half-tile `x`.
#[inline]
pub fn straddled_columns(x: i32) -> (i32, i32) {
    let col = x >> 1;
    if x & 1 != 0 {
        (col, col + 1)
    } else {
        (col, col)
    }
}
