//! Actor sprite projection.
//!
//! Actors are 16x32 sprites drawn as two masked 16x16 blits. Each half is
//! culled on its own, so an actor half-way off the top or bottom of the
//! viewport still gets its visible half drawn.

use super::blit::BlitBackend;
use super::map::MAP_DRAW_START;
use crate::domain::camera::Camera;
use crate::domain::culling::is_off_screen;
use crate::domain::grid::ROW_UNITS;

/// Atlas bytes per masked 16x16 tile: four colour planes plus a mask plane.
pub const MASKED_TILE_BYTES: u32 = 0xA0;

/// Atlas bytes per 16x32 frame (upper half followed by lower half).
pub const FRAME_STRIDE: u32 = MASKED_TILE_BYTES * 2;

/// Frames stored in the first bank; later frames come from the second.
pub const FIRST_BANK_FRAMES: u16 = 3;

/// Where an actor's two frame banks start in the sprite atlas.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SpriteBanks {
    pub first: u32,
    pub second: u32,
}

impl SpriteBanks {
    pub const fn new(first: u32, second: u32) -> Self {
        SpriteBanks { first, second }
    }

    /// Atlas offset of the upper half of `frame`.
    pub fn frame_offset(&self, frame: u16) -> u32 {
        if frame < FIRST_BANK_FRAMES {
            self.first + u32::from(frame) * FRAME_STRIDE
        } else {
            self.second + u32::from(frame - FIRST_BANK_FRAMES) * FRAME_STRIDE
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ActorSprite {
    /// World x in half-tiles.
    pub x: i32,
    /// World y of the lower half, in vertical world units.
    pub y: i32,
    pub frame: u16,
    pub banks: SpriteBanks,
}

/// World to viewport-relative screen coordinates: half-tiles across,
/// pixels down.
#[inline]
pub fn project(camera: &Camera, x: i32, y: i32) -> (i32, i32) {
    (x - camera.x, (y - camera.y) >> 3)
}

/// Draw both halves of an actor, skipping halves that are off screen.
/// Returns how many halves were drawn.
pub fn draw_actor<B: BlitBackend + ?Sized>(backend: &mut B, camera: &Camera, actor: &ActorSprite) -> usize {
    let src = actor.banks.frame_offset(actor.frame);
    let halves = [(actor.y - ROW_UNITS, src), (actor.y, src + MASKED_TILE_BYTES)];

    let origin_x = i32::from(MAP_DRAW_START.byte_x());
    let origin_y = i32::from(MAP_DRAW_START.pixel_y());

    let mut drawn = 0;
    for (y, src) in halves {
        if is_off_screen(camera, actor.x, y) {
            continue;
        }
        let (sx, sy) = project(camera, actor.x, y);
        backend.blit_masked_tile(src, origin_x + sx, origin_y + sy);
        drawn += 1;
    }
    drawn
}
