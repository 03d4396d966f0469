//! Blit backend seam.
//!
//! The core never touches pixels. It emits [`BlitCommand`]s and hands them to
//! a [`BlitBackend`], which owns the tile atlas and the screen. Addresses
//! follow the planar EGA layout: 40 bytes per pixel row, one byte per 8
//! horizontal pixels.
//!
//! Solid tile blits rely on the latch-copy write mode. [`LatchCopyGuard`]
//! enters it on creation and restores normal mode when dropped, so every exit
//! from a tile pass leaves the backend in normal mode.

use std::ops::{Deref, DerefMut};

/// Bytes per pixel row of screen memory.
pub const BYTES_PER_ROW: u16 = 40;

/// A destination address in screen memory.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct ScreenAddr(pub u16);

impl ScreenAddr {
    /// Address of byte column `byte_x` (8 px each) on pixel row `y`.
    pub const fn from_xy(byte_x: u16, y: u16) -> Self {
        ScreenAddr(y * BYTES_PER_ROW + byte_x)
    }

    #[inline]
    pub fn byte_x(self) -> u16 {
        self.0 % BYTES_PER_ROW
    }

    #[inline]
    pub fn pixel_y(self) -> u16 {
        self.0 / BYTES_PER_ROW
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WriteMode {
    Normal,
    /// Copies through the hardware latches; required by solid tile blits.
    LatchCopy,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlitCommand {
    /// Opaque 16x16 tile from atlas offset `src` to `dest`.
    Solid { src: u16, dest: ScreenAddr },
    /// Masked 16x16 tile from sprite atlas offset `src`, screen position in
    /// half-tiles (`x`) and pixels (`y`).
    Masked { src: u32, x: i32, y: i32 },
}

pub trait BlitBackend {
    fn set_write_mode(&mut self, mode: WriteMode);

    fn blit_solid_tile(&mut self, src: u16, dest: ScreenAddr);

    fn blit_masked_tile(&mut self, src: u32, screen_x: i32, screen_y: i32);

    fn submit(&mut self, cmd: &BlitCommand) {
        match *cmd {
            BlitCommand::Solid { src, dest } => self.blit_solid_tile(src, dest),
            BlitCommand::Masked { src, x, y } => self.blit_masked_tile(src, x, y),
        }
    }
}

/// Scoped latch-copy mode. Normal mode is restored on drop.
pub struct LatchCopyGuard<'a, B: BlitBackend + ?Sized> {
    backend: &'a mut B,
}

impl<'a, B: BlitBackend + ?Sized> LatchCopyGuard<'a, B> {
    pub fn enter(backend: &'a mut B) -> Self {
        backend.set_write_mode(WriteMode::LatchCopy);
        LatchCopyGuard { backend }
    }
}

impl<B: BlitBackend + ?Sized> Deref for LatchCopyGuard<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.backend
    }
}

impl<B: BlitBackend + ?Sized> DerefMut for LatchCopyGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.backend
    }
}

impl<B: BlitBackend + ?Sized> Drop for LatchCopyGuard<'_, B> {
    fn drop(&mut self) {
        self.backend.set_write_mode(WriteMode::Normal);
    }
}

/// Backend that records everything it is asked to do.
#[derive(Debug)]
pub struct RecordingBackend {
    pub commands: Vec<BlitCommand>,
    pub mode_changes: Vec<WriteMode>,
    pub mode: WriteMode,
    /// Solid blits issued while not in latch-copy mode.
    pub unlatched_solid_blits: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        RecordingBackend {
            commands: Vec::new(),
            mode_changes: Vec::new(),
            mode: WriteMode::Normal,
            unlatched_solid_blits: 0,
        }
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl BlitBackend for RecordingBackend {
    fn set_write_mode(&mut self, mode: WriteMode) {
        self.mode = mode;
        self.mode_changes.push(mode);
    }

    fn blit_solid_tile(&mut self, src: u16, dest: ScreenAddr) {
        if self.mode != WriteMode::LatchCopy {
            self.unlatched_solid_blits += 1;
        }
        self.commands.push(BlitCommand::Solid { src, dest });
    }

    fn blit_masked_tile(&mut self, src: u32, screen_x: i32, screen_y: i32) {
        self.commands.push(BlitCommand::Masked { src, x: screen_x, y: screen_y });
    }
}
