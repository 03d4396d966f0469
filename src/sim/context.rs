//! RenderContext: the explicit per-level state the core works on.
//!
//! Bundles a borrowed tile grid with the camera, animation clock and player
//! so that callers pass one value by reference instead of touching globals.
//! All frame work and movement queries go through these methods, which
//! delegate to `domain::*` and `ui::*` with the right pieces.

use crate::domain::anim::AnimationClock;
use crate::domain::camera::Camera;
use crate::domain::collision::{self, HeadRoom};
use crate::domain::culling;
use crate::domain::grid::TileGrid;
use crate::domain::player::PlayerState;
use crate::sim::event::CoreEvent;
use crate::ui::blit::{BlitBackend, BlitCommand};
use crate::ui::map;
use crate::ui::sprite::{self, ActorSprite};

pub struct RenderContext<'g> {
    pub grid: &'g TileGrid,
    pub camera: Camera,
    pub anim: AnimationClock,
    pub player: PlayerState,
}

// ── Lifecycle ──

impl<'g> RenderContext<'g> {
    pub fn new(grid: &'g TileGrid, player: PlayerState) -> Self {
        let mut ctx = RenderContext {
            grid,
            camera: Camera::default(),
            anim: AnimationClock::new(),
            player,
        };
        ctx.camera.center_on(ctx.player.x, ctx.player.y, grid.height());
        ctx
    }

    /// Switch to a new level: fresh animation clock, new player, camera
    /// snapped onto the player.
    pub fn load_level(&mut self, grid: &'g TileGrid, player: PlayerState) {
        self.grid = grid;
        self.player = player;
        self.anim.reset();
        self.camera.center_on(self.player.x, self.player.y, grid.height());
    }

    /// Per-tick camera update. A pending hanging adjustment re-centers the
    /// camera and is consumed; otherwise the camera follows with a dead zone.
    pub fn update_camera(&mut self) {
        let rows = self.grid.height();
        if self.player.camera_adjust_needed {
            self.camera.center_on(self.player.x, self.player.y, rows);
            self.player.camera_adjust_needed = false;
        } else {
            self.camera.follow(self.player.x, self.player.y, rows);
        }
    }
}

// ── Rendering ──

impl RenderContext<'_> {
    /// Blit list for this frame. Advances the animation clock.
    pub fn render_frame(&mut self) -> Vec<BlitCommand> {
        map::render_frame(self.grid, &self.camera, &mut self.anim)
    }

    pub fn draw_map<B: BlitBackend + ?Sized>(&mut self, backend: &mut B) {
        map::draw_map(backend, self.grid, &self.camera, &mut self.anim);
    }

    pub fn draw_actor<B: BlitBackend + ?Sized>(&self, backend: &mut B, actor: &ActorSprite) -> usize {
        sprite::draw_actor(backend, &self.camera, actor)
    }

    #[inline]
    pub fn is_off_screen(&self, x: i32, y: i32) -> bool {
        culling::is_off_screen(&self.camera, x, y)
    }

    #[inline]
    pub fn is_touching_player(&self, x: i32, y: i32) -> bool {
        culling::is_touching_player(&self.player, x, y)
    }
}

// ── Movement queries ──

impl RenderContext<'_> {
    #[inline]
    pub fn can_move_left(&self) -> bool {
        collision::can_move_left(self.grid, &self.player)
    }

    #[inline]
    pub fn can_move_right(&self) -> bool {
        collision::can_move_right(self.grid, &self.player)
    }

    #[inline]
    pub fn classify_head_room(&self) -> HeadRoom {
        collision::classify_head_room(self.grid, &self.player)
    }

    /// Command: may mutate the player's hanging state and animation frame.
    pub fn can_move_up(&mut self, events: &mut Vec<CoreEvent>) -> bool {
        collision::can_move_up(self.grid, &mut self.player, events)
    }

    #[inline]
    pub fn is_player_in_air(&self) -> bool {
        collision::is_player_in_air(self.grid, &self.player)
    }

    #[inline]
    pub fn intersects_solid_tile(&self, x: i32, y: i32) -> bool {
        collision::intersects_solid_tile(self.grid, x, y)
    }
}
