//! Tile-map rendering and tile-grid collision core.
//!
//! One tile grid and one coordinate system serve two per-frame questions:
//! which tiles are visible and how to draw them under sub-tile scroll, and
//! whether the player's body may occupy a tile-aligned position.
//!
//! Layering:
//!   - `domain`: tile codes, grid, clocks, camera, player, collision and culling
//!   - `ui`    : blit backend seam, map renderer, sprite projector, terminal/sound I/O
//!   - `sim`   : explicit per-level context and emitted events

pub mod config;
pub mod domain;
pub mod error;
pub mod sim;
pub mod ui;
