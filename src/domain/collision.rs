//! Tile-grid collision queries for player movement.
//!
//! ## Sampling
//!
//! The player body is one tile wide and two rows tall (head row above the
//! feet row). Every query samples a handful of grid cells around it and
//! compares raw tile codes against fixed thresholds:
//!
//!   - solid        = code `> 0x17FF`
//!   - ceiling mark = code `>= 0x2EE0` or `0x1B80..=0x1CA0` (upward check only)
//!
//! When the player's half-tile `x` is odd the body straddles two columns and
//! both are sampled; when even, the single column is sampled twice.
//!
//! ## Commands vs queries
//!
//! All functions are pure except the upward check, which is split in two:
//! [`classify_head_room`] reads the grid, [`apply_head_room`] performs the
//! hanging/camera/sound transition. [`can_move_up`] runs both.

use super::grid::{TileGrid, ROW_SHIFT, ROW_UNITS};
use super::player::{straddled_columns, PlayerState};
use super::tile::TileCode;
use crate::sim::event::CoreEvent;

/// What lies above the player's head.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HeadRoom {
    /// A hook anchor or ladder marker: blocks, may start hanging.
    BlockedByMarker,
    /// A plain solid tile: blocks.
    BlockedBySolid,
    Clear,
}

// ══════════════════════════════════════════════════════════════
// Sideways
// ══════════════════════════════════════════════════════════════

/// Row sampled in addition to the feet and head rows on a sideways move.
/// In the lower half of the feet row the body reaches into the row below;
/// in the upper half the head row is re-sampled.
#[inline]
fn straddle_row(player: &PlayerState) -> i32 {
    let within_row = player.y & (ROW_UNITS - 1);
    if within_row >= ROW_UNITS / 2 {
        player.feet_row() + 1
    } else {
        player.head_row()
    }
}

fn flank_blocked(grid: &TileGrid, player: &PlayerState, col: i32) -> bool {
    [player.feet_row(), player.head_row(), straddle_row(player)]
        .iter()
        .any(|&row| grid.cell(row, col).is_solid())
}

/// Can the player step one half-tile left?
pub fn can_move_left(grid: &TileGrid, player: &PlayerState) -> bool {
    let col = (player.x - 1) >> 1;
    !flank_blocked(grid, player, col)
}

/// Can the player step one half-tile right?
pub fn can_move_right(grid: &TileGrid, player: &PlayerState) -> bool {
    // body covers half-tiles x..=x+1; after the step the right edge is x+2
    let col = (player.x + 2) >> 1;
    !flank_blocked(grid, player, col)
}

// ══════════════════════════════════════════════════════════════
// Upward
// ══════════════════════════════════════════════════════════════

fn head_cells(grid: &TileGrid, player: &PlayerState) -> [TileCode; 2] {
    let row = player.head_row() - 1;
    let (left, right) = player.body_columns();
    [grid.cell(row, left), grid.cell(row, right)]
}

/// Classify the cells directly above the head. Marker tiles win over plain
/// solids: they are solid by code too, but trigger the ceiling transition.
pub fn classify_head_room(grid: &TileGrid, player: &PlayerState) -> HeadRoom {
    let cells = head_cells(grid, player);
    if cells.iter().any(|c| c.is_ceiling_marker()) {
        HeadRoom::BlockedByMarker
    } else if cells.iter().any(|c| c.is_solid()) {
        HeadRoom::BlockedBySolid
    } else {
        HeadRoom::Clear
    }
}

/// Apply the state transition for a classified head room and report whether
/// upward movement is permitted.
///
///   - `BlockedByMarker`: a grounded, non-climbing, non-hanging player resets
///     its animation frame, then either grabs the hook (hanging + camera
///     adjust + cling sound) or bumps its head.
///   - `BlockedBySolid`: hanging ends and the head bumps.
///   - `Clear`: hanging ends.
pub fn apply_head_room(player: &mut PlayerState, room: HeadRoom, events: &mut Vec<CoreEvent>) -> bool {
    match room {
        HeadRoom::BlockedByMarker => {
            if !player.is_climbing() && !player.is_falling && !player.is_hanging_from_ceiling {
                player.anim_frame = 0;
                if player.has_grappling_hook {
                    player.is_hanging_from_ceiling = true;
                    player.camera_adjust_needed = true;
                    tracing::debug!(x = player.x, y = player.y, "player grabbed ceiling hooks");
                    events.push(CoreEvent::ClingToHooks);
                } else {
                    events.push(CoreEvent::HitHead);
                }
            }
            false
        }
        HeadRoom::BlockedBySolid => {
            player.is_hanging_from_ceiling = false;
            events.push(CoreEvent::HitHead);
            false
        }
        HeadRoom::Clear => {
            player.is_hanging_from_ceiling = false;
            true
        }
    }
}

/// Upward movement command: classify, transition, answer.
/// Callers must treat this as a command; it mutates `player`.
pub fn can_move_up(grid: &TileGrid, player: &mut PlayerState, events: &mut Vec<CoreEvent>) -> bool {
    let room = classify_head_room(grid, player);
    apply_head_room(player, room, events)
}

// ══════════════════════════════════════════════════════════════
// Airborne / point
// ══════════════════════════════════════════════════════════════

/// Is there nothing solid under the player's feet?
/// A climb in progress counts as anchored.
pub fn is_player_in_air(grid: &TileGrid, player: &PlayerState) -> bool {
    if player.is_climbing() {
        return false;
    }
    let row = player.feet_row() + 1;
    let (left, right) = player.body_columns();
    !grid.cell(row, left).is_solid() && !grid.cell(row, right).is_solid()
}

/// Does a one-tile-wide probe at world `(x, y)` overlap a solid tile?
/// `x` is in half-tiles, `y` in vertical world units.
pub fn intersects_solid_tile(grid: &TileGrid, x: i32, y: i32) -> bool {
    let row = y >> ROW_SHIFT;
    let (left, right) = straddled_columns(x);
    grid.cell(row, left).is_solid() || grid.cell(row, right).is_solid()
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::ROW_STRIDE;

    const SOLID: u16 = 0x1800;

    fn grid_with(rows: usize, cells: &[(i32, i32, u16)]) -> TileGrid {
        let mut grid = TileGrid::filled(rows, TileCode::BACKGROUND_A).unwrap();
        for &(row, col, code) in cells {
            assert!(grid.set(row, col, TileCode(code)));
        }
        grid
    }

    /// Player standing with feet in `row`, body at half-tile `x`.
    fn player_at(x: i32, row: i32) -> PlayerState {
        PlayerState::new(x, row * ROW_UNITS)
    }

    fn hooked_player(x: i32, row: i32) -> PlayerState {
        player_at(x, row).with_grappling_hook(true)
    }

    // ── sideways ──

    #[test]
    fn open_space_allows_both_directions() {
        let grid = grid_with(10, &[]);
        let p = player_at(10, 5);
        assert!(can_move_left(&grid, &p));
        assert!(can_move_right(&grid, &p));
    }

    #[test]
    fn wall_at_feet_blocks_left() {
        let grid = grid_with(10, &[(5, 4, SOLID)]);
        let p = player_at(10, 5);
        assert!(!can_move_left(&grid, &p));
        assert!(can_move_right(&grid, &p));
    }

    #[test]
    fn wall_at_head_blocks_right() {
        let grid = grid_with(10, &[(4, 6, SOLID)]);
        let p = player_at(10, 5);
        assert!(!can_move_right(&grid, &p));
        assert!(can_move_left(&grid, &p));
    }

    #[test]
    fn odd_x_steps_stay_within_covered_columns() {
        // body at x=11 covers columns 5 and 6; either step lands inside them
        let grid = grid_with(10, &[(5, 4, SOLID), (5, 7, SOLID)]);
        let p = player_at(11, 5);
        assert!(can_move_left(&grid, &p));
        assert!(can_move_right(&grid, &p));

        assert!(!can_move_left(&grid, &player_at(10, 5)));
        assert!(!can_move_right(&grid, &player_at(12, 5)));
    }

    #[test]
    fn lower_half_samples_row_below() {
        let grid = grid_with(10, &[(6, 4, SOLID)]);
        let upper = PlayerState::new(10, 5 * ROW_UNITS + 0x20);
        let lower = PlayerState::new(10, 5 * ROW_UNITS + 0x40);
        assert!(can_move_left(&grid, &upper));
        assert!(!can_move_left(&grid, &lower));
    }

    #[test]
    fn lower_half_samples_row_below_on_the_right() {
        let grid = grid_with(10, &[(6, 6, SOLID)]);
        let upper = PlayerState::new(10, 5 * ROW_UNITS + 0x20);
        let lower = PlayerState::new(10, 5 * ROW_UNITS + 0x40);
        assert!(can_move_right(&grid, &upper));
        assert!(!can_move_right(&grid, &lower));
    }

    #[test]
    fn straddle_switches_at_half_row() {
        let grid = grid_with(10, &[(6, 4, SOLID), (6, 6, SOLID)]);
        let last_upper = PlayerState::new(10, 5 * ROW_UNITS + 63);
        let first_lower = PlayerState::new(10, 5 * ROW_UNITS + 64);
        assert!(can_move_left(&grid, &last_upper));
        assert!(can_move_right(&grid, &last_upper));
        assert!(!can_move_left(&grid, &first_lower));
        assert!(!can_move_right(&grid, &first_lower));
    }

    #[test]
    fn passable_boundary_code_does_not_block() {
        let grid = grid_with(10, &[(5, 4, 0x17FF)]);
        assert!(can_move_left(&grid, &player_at(10, 5)));
    }

    #[test]
    fn grid_edge_blocks() {
        let grid = grid_with(10, &[]);
        assert!(!can_move_left(&grid, &player_at(0, 5)));
        assert!(!can_move_right(&grid, &player_at((ROW_STRIDE as i32 - 1) * 2, 5)));
    }

    // ── head room ──

    #[test]
    fn ladder_marker_with_hook_starts_hanging() {
        let grid = grid_with(10, &[(3, 5, 0x1C00)]);
        let mut p = hooked_player(10, 5);
        p.anim_frame = 7;
        let mut events = vec![];

        assert!(!can_move_up(&grid, &mut p, &mut events));
        assert!(p.is_hanging_from_ceiling);
        assert!(p.camera_adjust_needed);
        assert_eq!(p.anim_frame, 0);
        assert_eq!(events, vec![CoreEvent::ClingToHooks]);
    }

    #[test]
    fn hook_anchor_without_hook_bumps_head() {
        let grid = grid_with(10, &[(3, 5, 0x2EE0)]);
        let mut p = player_at(10, 5);
        let mut events = vec![];

        assert!(!can_move_up(&grid, &mut p, &mut events));
        assert!(!p.is_hanging_from_ceiling);
        assert!(!p.camera_adjust_needed);
        assert_eq!(events, vec![CoreEvent::HitHead]);
    }

    #[test]
    fn marker_while_falling_blocks_silently() {
        let grid = grid_with(10, &[(3, 5, 0x1B80)]);
        let mut p = hooked_player(10, 5);
        p.is_falling = true;
        p.anim_frame = 3;
        let mut events = vec![];

        assert!(!can_move_up(&grid, &mut p, &mut events));
        assert!(!p.is_hanging_from_ceiling);
        assert_eq!(p.anim_frame, 3);
        assert!(events.is_empty());
    }

    #[test]
    fn marker_while_already_hanging_keeps_hanging() {
        let grid = grid_with(10, &[(3, 5, 0x1CA0)]);
        let mut p = hooked_player(10, 5);
        p.is_hanging_from_ceiling = true;
        let mut events = vec![];

        assert!(!can_move_up(&grid, &mut p, &mut events));
        assert!(p.is_hanging_from_ceiling);
        assert!(!p.camera_adjust_needed);
        assert!(events.is_empty());
    }

    #[test]
    fn marker_during_climb_blocks_silently() {
        let grid = grid_with(10, &[(3, 5, 0x1C00)]);
        let mut p = hooked_player(10, 5);
        p.climbing_frames_remaining = 2;
        let mut events = vec![];

        assert!(!can_move_up(&grid, &mut p, &mut events));
        assert!(!p.is_hanging_from_ceiling);
        assert!(events.is_empty());
    }

    #[test]
    fn solid_ceiling_ends_hanging_and_bumps() {
        let grid = grid_with(10, &[(3, 5, 0x1800)]);
        let mut p = hooked_player(10, 5);
        p.is_hanging_from_ceiling = true;
        let mut events = vec![];

        assert!(!can_move_up(&grid, &mut p, &mut events));
        assert!(!p.is_hanging_from_ceiling);
        assert_eq!(events, vec![CoreEvent::HitHead]);
    }

    #[test]
    fn clear_ceiling_permits_and_ends_hanging() {
        let grid = grid_with(10, &[(3, 5, 0x17FF)]);
        let mut p = hooked_player(10, 5);
        p.is_hanging_from_ceiling = true;
        let mut events = vec![];

        assert!(can_move_up(&grid, &mut p, &mut events));
        assert!(!p.is_hanging_from_ceiling);
        assert!(events.is_empty());
    }

    #[test]
    fn codes_between_ladder_and_hook_are_plain_solid() {
        let grid = grid_with(10, &[(3, 5, 0x1CA1)]);
        assert_eq!(classify_head_room(&grid, &player_at(10, 5)), HeadRoom::BlockedBySolid);
        let grid = grid_with(10, &[(3, 5, 0x2EDF)]);
        assert_eq!(classify_head_room(&grid, &player_at(10, 5)), HeadRoom::BlockedBySolid);
    }

    #[test]
    fn head_room_checks_second_column_only_when_straddling() {
        let grid = grid_with(10, &[(3, 6, 0x1800)]);
        assert_eq!(classify_head_room(&grid, &player_at(10, 5)), HeadRoom::Clear);
        assert_eq!(classify_head_room(&grid, &player_at(11, 5)), HeadRoom::BlockedBySolid);
    }

    #[test]
    fn marker_in_either_cell_wins_over_solid() {
        let grid = grid_with(10, &[(3, 5, 0x1800), (3, 6, 0x3000)]);
        assert_eq!(classify_head_room(&grid, &player_at(11, 5)), HeadRoom::BlockedByMarker);
    }

    // ── airborne ──

    #[test]
    fn standing_on_solid_is_grounded() {
        let grid = grid_with(10, &[(6, 5, 0x1800)]);
        assert!(!is_player_in_air(&grid, &player_at(10, 5)));
        assert!(is_player_in_air(&grid, &player_at(10, 4)));
    }

    #[test]
    fn straddling_needs_only_one_solid_below() {
        let grid = grid_with(10, &[(6, 6, 0x1800)]);
        assert!(!is_player_in_air(&grid, &player_at(11, 5)));
        assert!(is_player_in_air(&grid, &player_at(10, 5)));
    }

    #[test]
    fn climbing_counts_as_grounded() {
        let grid = grid_with(10, &[]);
        let mut p = player_at(10, 5);
        assert!(is_player_in_air(&grid, &p));
        p.climbing_frames_remaining = 1;
        assert!(!is_player_in_air(&grid, &p));
    }

    // ── point ──

    #[test]
    fn point_query_solid_boundary() {
        let grid = grid_with(10, &[(2, 3, 0x17FF), (4, 3, 0x1800)]);
        assert!(!intersects_solid_tile(&grid, 6, 2 * ROW_UNITS));
        assert!(intersects_solid_tile(&grid, 6, 4 * ROW_UNITS));
        // any y inside the row maps to the same cell
        assert!(intersects_solid_tile(&grid, 6, 4 * ROW_UNITS + 127));
    }

    #[test]
    fn point_query_straddles_on_odd_x() {
        let grid = grid_with(10, &[(2, 4, 0x2000)]);
        assert!(!intersects_solid_tile(&grid, 6, 2 * ROW_UNITS));
        assert!(intersects_solid_tile(&grid, 7, 2 * ROW_UNITS));
        assert!(intersects_solid_tile(&grid, 8, 2 * ROW_UNITS));
    }
}
