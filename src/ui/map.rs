//! Tile map renderer.
//!
//! Walks the 13x10-tile viewport once per frame and turns the tile grid into
//! solid-tile blits: a backdrop tile wherever the map shows background, and a
//! foreground tile for everything above background B.
//!
//! ## Half-tile scroll
//!
//! The camera moves in 8-pixel steps but tiles are 16 pixels wide. At an
//! odd camera position the whole pass is shifted 8 pixels left (one address
//! byte) and 14 columns are drawn instead of 13 so the right edge has no gap.
//! The extra strip on the left is covered by the HUD border afterwards.
//! Backdrop tiles are not part of the scrolled layer, so in odd mode they are
//! drawn one byte further right, and a backdrop is drawn if either of the two
//! map cells overlapping that backdrop position is background.
//!
//! ## Addressing
//!
//! The walk advances a screen address rather than (row, col) pairs: two bytes
//! per tile, plus [`ROW_ADVANCE`] after each 14th tile. It stops as soon as
//! the address reaches [`MAP_DRAW_END`], which in even mode drops the 14th
//! column of the last row (it lies wholly outside the viewport anyway).

use tracing::trace;

use super::blit::{BlitBackend, BlitCommand, LatchCopyGuard, ScreenAddr};
use crate::domain::anim::AnimationClock;
use crate::domain::camera::Camera;
use crate::domain::grid::TileGrid;
use crate::domain::tile::TileCode;

/// Screen position (16, 16): top-left of the viewport.
pub const MAP_DRAW_START: ScreenAddr = ScreenAddr::from_xy(2, 16);

/// Screen position (224, 160): where the tile after the last viewport tile
/// would start. Reaching it ends the walk.
pub const MAP_DRAW_END: ScreenAddr = ScreenAddr::from_xy(28, 160);

/// Atlas offset of the first backdrop tile.
pub const BACKDROP_SRC_START: u16 = 0x4000;

/// Backdrop B lives this far after backdrop A in the atlas.
pub const BACKDROP_B_DELTA: u16 = 0x4100;

/// Tiles drawn per row: 13 visible plus one for the half-tile shift.
pub const COLUMNS_PER_ROW: u32 = 14;

/// Address bytes per 16-pixel tile.
const TILE_BYTES: u16 = 2;

/// Atlas bytes per 16x16 backdrop tile.
const TILE_SRC_BYTES: u16 = 0x20;

/// From just past the 14th tile of a row to the start of the next tile row:
/// 15 pixel rows down and 96 pixels back.
pub const ROW_ADVANCE: u16 = 612;

/// Build the blit list for one frame and advance the animation clock.
pub fn render_frame(grid: &TileGrid, camera: &Camera, anim: &mut AnimationClock) -> Vec<BlitCommand> {
    let phase = anim.advance();
    let odd = camera.is_odd();

    let mut commands = Vec::with_capacity((COLUMNS_PER_ROW * 10 * 2) as usize);
    let mut dest = MAP_DRAW_START.0 - u16::from(odd);
    let mut backdrop = BACKDROP_SRC_START;
    let mut tiles_drawn = 0;

    let first_col = camera.x >> 1;
    let mut row = camera.row();
    let mut col = first_col;

    trace!(x = camera.x, y = camera.y, phase, "rendering tile map");

    loop {
        let code = grid.cell(row, col);

        if odd {
            let next = grid.cell(row, col + 1);
            if let Some(src) = backdrop_source(backdrop, code, next) {
                commands.push(BlitCommand::Solid { src, dest: ScreenAddr(dest + 1) });
            }
        } else if let Some(src) = backdrop_source(backdrop, code, code) {
            commands.push(BlitCommand::Solid { src, dest: ScreenAddr(dest) });
        }

        if code.has_foreground() {
            commands.push(BlitCommand::Solid {
                src: code.foreground_source(phase),
                dest: ScreenAddr(dest),
            });
        }

        col += 1;
        dest += TILE_BYTES;

        tiles_drawn += 1;
        if tiles_drawn == COLUMNS_PER_ROW {
            dest += ROW_ADVANCE;
            row += 1;
            col = first_col;
            tiles_drawn = 0;
        } else {
            backdrop += TILE_SRC_BYTES;
        }

        if dest >= MAP_DRAW_END.0 {
            break;
        }
    }

    commands
}

/// Backdrop A if either cell is background A, else backdrop B if either is
/// background B. Even mode passes the same cell twice.
#[inline]
fn backdrop_source(backdrop: u16, code: TileCode, next: TileCode) -> Option<u16> {
    if code.is_background_a() || next.is_background_a() {
        Some(backdrop)
    } else if code.is_background_b() || next.is_background_b() {
        Some(backdrop + BACKDROP_B_DELTA)
    } else {
        None
    }
}

/// Render one frame into `backend` inside latch-copy mode.
pub fn draw_map<B: BlitBackend + ?Sized>(
    backend: &mut B,
    grid: &TileGrid,
    camera: &Camera,
    anim: &mut AnimationClock,
) {
    let commands = render_frame(grid, camera, anim);
    let mut latched = LatchCopyGuard::enter(backend);
    for cmd in &commands {
        latched.submit(cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::ROW_STRIDE;
    use crate::ui::blit::{RecordingBackend, WriteMode};

    fn uniform(code: u16) -> TileGrid {
        TileGrid::filled(12, TileCode(code)).unwrap()
    }

    fn solids(commands: &[BlitCommand]) -> Vec<(u16, u16)> {
        commands
            .iter()
            .map(|c| match *c {
                BlitCommand::Solid { src, dest } => (src, dest.0),
                BlitCommand::Masked { .. } => panic!("renderer emitted a masked blit"),
            })
            .collect()
    }

    /// Commands targeting exactly `dest`.
    fn at(commands: &[BlitCommand], dest: u16) -> Vec<u16> {
        solids(commands).into_iter().filter(|&(_, d)| d == dest).map(|(s, _)| s).collect()
    }

    #[test]
    fn animation_phase_cycles_per_frame() {
        let grid = uniform(0x100);
        let mut anim = AnimationClock::new();
        let cam = Camera::default();
        let phases: Vec<u16> = (0..8)
            .map(|_| at(&render_frame(&grid, &cam, &mut anim), 642)[0] - 0x100)
            .collect();
        assert_eq!(phases, vec![0x20, 0x40, 0x60, 0x00, 0x20, 0x40, 0x60, 0x00]);
    }

    #[test]
    fn background_codes_select_backdrops() {
        let mut anim = AnimationClock::new();
        let cam = Camera::default();

        let a = render_frame(&uniform(0x00), &cam, &mut anim);
        assert_eq!(at(&a, 642), vec![BACKDROP_SRC_START]);

        let b = render_frame(&uniform(0x20), &cam, &mut anim);
        assert_eq!(at(&b, 642), vec![BACKDROP_SRC_START + BACKDROP_B_DELTA]);

        let blank = render_frame(&uniform(0x10), &cam, &mut anim);
        assert!(blank.is_empty());
    }

    #[test]
    fn foreground_thresholds() {
        let mut anim = AnimationClock::new();
        let cam = Camera::default();

        // phase after one advance is 0x20
        let animated = render_frame(&uniform(0x21), &cam, &mut anim);
        assert_eq!(at(&animated, 642), vec![0x21 + 0x20]);

        let mut anim = AnimationClock::new();
        let last_animated = render_frame(&uniform(0x5DF), &cam, &mut anim);
        assert_eq!(at(&last_animated, 642), vec![0x5DF + 0x20]);

        let stat = render_frame(&uniform(0x5E0), &cam, &mut anim);
        assert_eq!(at(&stat, 642), vec![0x5E0]);

        let solid = render_frame(&uniform(0x3000), &cam, &mut anim);
        assert_eq!(at(&solid, 642), vec![0x3000]);
    }

    #[test]
    fn even_camera_draws_fourteen_columns_but_stops_at_viewport_end() {
        let mut anim = AnimationClock::new();
        let cmds = render_frame(&uniform(0x600), &Camera::default(), &mut anim);
        assert_eq!(cmds.len(), 14 * 10 - 1);

        let dests: Vec<u16> = solids(&cmds).iter().map(|&(_, d)| d).collect();
        assert_eq!(dests[0], 642);
        assert_eq!(dests[13], 642 + 26);
        assert_eq!(dests[14], 642 + 640);
        assert_eq!(*dests.last().unwrap(), 642 + 9 * 640 + 24);
    }

    #[test]
    fn odd_camera_shifts_left_and_draws_full_last_row() {
        let mut anim = AnimationClock::new();
        let cmds = render_frame(&uniform(0x600), &Camera::new(1, 0), &mut anim);
        assert_eq!(cmds.len(), 14 * 10);

        let dests: Vec<u16> = solids(&cmds).iter().map(|&(_, d)| d).collect();
        assert_eq!(dests[0], 641);
        assert_eq!(*dests.last().unwrap(), 641 + 9 * 640 + 26);
    }

    #[test]
    fn odd_camera_backdrop_is_offset_right() {
        let mut anim = AnimationClock::new();
        let even = render_frame(&uniform(0x00), &Camera::new(2, 0), &mut anim);
        let odd = render_frame(&uniform(0x00), &Camera::new(3, 0), &mut anim);
        assert_eq!(solids(&even)[0], (BACKDROP_SRC_START, 642));
        assert_eq!(solids(&odd)[0], (BACKDROP_SRC_START, 642));
        assert_eq!(solids(&odd)[1].1, 644);
    }

    #[test]
    fn odd_camera_draws_backdrop_when_next_cell_is_background() {
        let mut cells = vec![0x600u16; ROW_STRIDE * 12];
        cells[1] = 0x20; // row 0, col 1
        let grid = TileGrid::new(cells).unwrap();
        let mut anim = AnimationClock::new();

        let cmds = render_frame(&grid, &Camera::new(1, 0), &mut anim);
        // cell 0 is foreground, its right neighbour is background B
        assert_eq!(at(&cmds, 642), vec![BACKDROP_SRC_START + BACKDROP_B_DELTA]);
        assert_eq!(at(&cmds, 641), vec![0x600]);

        let even = render_frame(&grid, &Camera::new(0, 0), &mut anim);
        assert_eq!(at(&even, 642), vec![0x600]);
    }

    #[test]
    fn backdrop_source_wraps_every_thirteen_tiles() {
        let mut anim = AnimationClock::new();
        let cmds = render_frame(&uniform(0x00), &Camera::default(), &mut anim);
        assert_eq!(at(&cmds, 644), vec![BACKDROP_SRC_START + 0x20]);
        assert_eq!(at(&cmds, 642 + 26), vec![BACKDROP_SRC_START + 13 * 0x20]);
        assert_eq!(at(&cmds, 642 + 640), vec![BACKDROP_SRC_START + 13 * 0x20]);
    }

    #[test]
    fn camera_selects_grid_window() {
        let mut cells = vec![0x600u16; ROW_STRIDE * 20];
        cells[3 * ROW_STRIDE + 5] = 0x700;
        let grid = TileGrid::new(cells).unwrap();
        let mut anim = AnimationClock::new();

        let cmds = render_frame(&grid, &Camera::at_row(10, 3), &mut anim);
        assert_eq!(at(&cmds, 642), vec![0x700]);
    }

    #[test]
    fn draw_map_runs_inside_latch_mode() {
        let mut backend = RecordingBackend::new();
        let mut anim = AnimationClock::new();
        draw_map(&mut backend, &uniform(0x00), &Camera::default(), &mut anim);

        assert_eq!(backend.mode_changes, vec![WriteMode::LatchCopy, WriteMode::Normal]);
        assert_eq!(backend.unlatched_solid_blits, 0);
        assert_eq!(backend.commands.len(), 139);
        assert_eq!(anim.phase(), 0x20);
    }
}
