//! Camera: the viewport's position in the world.
//!
//! `x` is in half-tile units (8 px), `y` is in vertical world units
//! (`ROW_UNITS` per tile row) and always sits on a whole tile row. The
//! viewport itself is fixed at [`VIEW_COLS`] x [`VIEW_ROWS`] tiles.

use super::grid::{ROW_STRIDE, ROW_UNITS};

/// Visible tile columns.
pub const VIEW_COLS: i32 = 13;
/// Visible tile rows.
pub const VIEW_ROWS: i32 = 10;
/// Visible width in half-tile units.
pub const VIEW_HALF_TILES: i32 = VIEW_COLS * 2;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Camera {
    /// Horizontal position in half-tiles.
    pub x: i32,
    /// Vertical position in world units (tile row * ROW_UNITS).
    pub y: i32,
}

impl Camera {
    pub fn new(x: i32, y: i32) -> Self {
        Camera { x, y }
    }

    /// Camera at half-tile column `x` and tile row `row`.
    pub fn at_row(x: i32, row: i32) -> Self {
        Camera { x, y: row * ROW_UNITS }
    }

    #[inline]
    pub fn row(&self) -> i32 {
        self.y >> super::grid::ROW_SHIFT
    }

    /// Odd camera positions show the right half of the left-edge tile.
    #[inline]
    pub fn is_odd(&self) -> bool {
        self.x & 1 != 0
    }

    /// Keep the viewport inside a grid of `grid_rows` rows.
    pub fn clamp_to(&mut self, grid_rows: usize) {
        let max_x = (ROW_STRIDE as i32 - VIEW_COLS) * 2;
        let max_row = (grid_rows as i32 - VIEW_ROWS).max(0);
        self.x = self.x.clamp(0, max_x);
        self.y = (self.row().clamp(0, max_row)) * ROW_UNITS;
    }

    /// Scroll to keep a target inside the inner part of the viewport.
    /// The dead zone is the viewport minus a fifth on each side; the camera
    /// only moves when the target leaves it, then clamps to the grid.
    pub fn follow(&mut self, target_x: i32, target_y: i32, grid_rows: usize) {
        let margin_x = VIEW_HALF_TILES / 5;
        let left_bound = self.x + margin_x;
        let right_bound = self.x + VIEW_HALF_TILES - margin_x - 1;
        if target_x < left_bound {
            self.x = target_x - margin_x;
        } else if target_x > right_bound {
            self.x = target_x - VIEW_HALF_TILES + margin_x + 1;
        }

        let margin_y = VIEW_ROWS / 5;
        let row = self.row();
        let target_row = target_y >> super::grid::ROW_SHIFT;
        if target_row < row + margin_y {
            self.y = (target_row - margin_y) * ROW_UNITS;
        } else if target_row > row + VIEW_ROWS - margin_y - 1 {
            self.y = (target_row - VIEW_ROWS + margin_y + 1) * ROW_UNITS;
        }

        self.clamp_to(grid_rows);
    }

    /// Snap so the target is centered, used on level load.
    pub fn center_on(&mut self, target_x: i32, target_y: i32, grid_rows: usize) {
        self.x = target_x - VIEW_HALF_TILES / 2;
        self.y = ((target_y >> super::grid::ROW_SHIFT) - VIEW_ROWS / 2) * ROW_UNITS;
        self.clamp_to(grid_rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_viewport_in_grid() {
        let mut cam = Camera::new(-5, -300);
        cam.clamp_to(20);
        assert_eq!(cam, Camera::new(0, 0));

        let mut cam = Camera::at_row(400, 50);
        cam.clamp_to(20);
        assert_eq!(cam.x, 230);
        assert_eq!(cam.row(), 10);
    }

    #[test]
    fn clamp_snaps_to_whole_rows() {
        let mut cam = Camera::new(4, 3 * ROW_UNITS + 40);
        cam.clamp_to(30);
        assert_eq!(cam.y, 3 * ROW_UNITS);
    }

    #[test]
    fn follow_ignores_moves_inside_dead_zone() {
        let mut cam = Camera::at_row(20, 5);
        cam.follow(32, 9 * ROW_UNITS, 40);
        assert_eq!(cam, Camera::at_row(20, 5));
    }

    #[test]
    fn follow_scrolls_when_target_leaves_dead_zone() {
        let mut cam = Camera::at_row(20, 5);
        cam.follow(60, 9 * ROW_UNITS, 40);
        assert_eq!(cam.x, 60 - VIEW_HALF_TILES + 5 + 1);

        cam.follow(cam.x + 10, 20 * ROW_UNITS, 40);
        assert_eq!(cam.row(), 20 - VIEW_ROWS + 2 + 1);
    }

    #[test]
    fn center_on_clamps_near_origin() {
        let mut cam = Camera::default();
        cam.center_on(3, ROW_UNITS, 40);
        assert_eq!(cam, Camera::new(0, 0));
    }
}
