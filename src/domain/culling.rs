//! Screen-space visibility and proximity tests.
//!
//! Used to skip blit work for sprites outside the viewport and to detect
//! contact between the player and world objects.

use super::camera::Camera;
use super::grid::ROW_UNITS;
use super::player::PlayerState;

/// Half-tile columns at or past `camera.x + VISIBLE_X_SPAN` are off screen.
/// Covers the 26-half-tile viewport plus margin for partially visible sprites.
const VISIBLE_X_SPAN: i32 = 30;

/// Sprites whose y lies this far above the camera or less are off screen.
const VISIBLE_Y_ABOVE: i32 = ROW_UNITS / 2;

/// Last visible y below the camera: ten tile rows.
const VISIBLE_Y_BELOW: i32 = 10 * ROW_UNITS;

/// Horizontal contact distance in half-tiles (exclusive).
const TOUCH_X_RANGE: i32 = 2;

/// Added to the vertical delta before the band test.
const TOUCH_Y_BIAS: i32 = 0x20;

/// Exclusive vertical contact band.
const TOUCH_Y_MIN: i32 = 16;
const TOUCH_Y_MAX: i32 = 3 * ROW_UNITS;

/// Is world position `(x, y)` outside the visible region?
/// Visible means `camera.x <= x < camera.x + 30` and
/// `camera.y - 64 < y <= camera.y + 1280`.
pub fn is_off_screen(camera: &Camera, x: i32, y: i32) -> bool {
    let x_visible = x >= camera.x && x < camera.x + VISIBLE_X_SPAN;
    let y_visible = y > camera.y - VISIBLE_Y_ABOVE && y <= camera.y + VISIBLE_Y_BELOW;
    !(x_visible && y_visible)
}

/// Is an object at world `(x, y)` in contact with the player?
pub fn is_touching_player(player: &PlayerState, x: i32, y: i32) -> bool {
    if (x - player.x).abs() >= TOUCH_X_RANGE {
        return false;
    }
    let aligned = player.y & !(ROW_UNITS - 1);
    let delta_y = aligned - y + TOUCH_Y_BIAS;
    TOUCH_Y_MIN < delta_y && delta_y < TOUCH_Y_MAX
}
