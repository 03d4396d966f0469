//! Tile codes and their classification.
//!
//! A tile code is a 16-bit value that doubles as the tile's source offset in
//! the tile atlas. Its behavioral class is purely a function of its numeric
//! range, so every threshold lives here and nowhere else.

/// Code range table:
///
/// | Code              | Class                                         |
/// |-------------------|-----------------------------------------------|
/// | `0x0000`          | background A                                  |
/// | `0x0020`          | background B                                  |
/// | `0x0021..=0x05DF` | animated foreground (phase added before blit) |
/// | `0x05E0..=0x17FF` | static foreground, passable                   |
/// | `> 0x17FF`        | solid                                         |
/// | `0x1B80..=0x1CA0` | ladder / climb marker (upward check only)     |
/// | `>= 0x2EE0`       | ceiling-hook anchor (upward check only)       |
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct TileCode(pub u16);

/// Coarse class used by the renderer and by the preview backend.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileClass {
    BackgroundA,
    BackgroundB,
    /// Codes `1..0x20` are neither backdrop nor foreground; nothing is drawn.
    Blank,
    Animated,
    Static,
    Solid,
}

impl TileCode {
    pub const BACKGROUND_A: TileCode = TileCode(0x0000);
    pub const BACKGROUND_B: TileCode = TileCode(0x0020);
    /// First code past the animated range.
    pub const STATIC_START: TileCode = TileCode(0x05E0);
    /// Highest non-solid code; anything above blocks movement.
    pub const LAST_PASSABLE: TileCode = TileCode(0x17FF);
    pub const LADDER_MARKER_START: TileCode = TileCode(0x1B80);
    pub const LADDER_MARKER_END: TileCode = TileCode(0x1CA0);
    pub const HOOK_ANCHOR_START: TileCode = TileCode(0x2EE0);
    /// Stand-in for cells outside the grid: the first solid code.
    pub const WALL: TileCode = TileCode(0x1800);

    #[inline]
    pub fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn is_background_a(self) -> bool {
        self == Self::BACKGROUND_A
    }

    #[inline]
    pub fn is_background_b(self) -> bool {
        self == Self::BACKGROUND_B
    }

    /// Anything above background B gets a foreground blit.
    #[inline]
    pub fn has_foreground(self) -> bool {
        self.0 > Self::BACKGROUND_B.0
    }

    #[inline]
    pub fn is_animated(self) -> bool {
        self.has_foreground() && self.0 < Self::STATIC_START.0
    }

    /// Blocks movement. Used by sideways, airborne and point checks.
    #[inline]
    pub fn is_solid(self) -> bool {
        self.0 > Self::LAST_PASSABLE.0
    }

    #[inline]
    pub fn is_ladder_marker(self) -> bool {
        (Self::LADDER_MARKER_START.0..=Self::LADDER_MARKER_END.0).contains(&self.0)
    }

    #[inline]
    pub fn is_hook_anchor(self) -> bool {
        self.0 >= Self::HOOK_ANCHOR_START.0
    }

    /// Ceiling marker seen by the upward check: hook anchor or ladder marker.
    #[inline]
    pub fn is_ceiling_marker(self) -> bool {
        self.is_hook_anchor() || self.is_ladder_marker()
    }

    /// Atlas source for the foreground blit of this tile at `phase`.
    /// Animated tiles are offset by the phase; static ones are not.
    #[inline]
    pub fn foreground_source(self, phase: u16) -> u16 {
        if self.is_animated() {
            self.0.wrapping_add(phase)
        } else {
            self.0
        }
    }

    pub fn class(self) -> TileClass {
        if self.is_background_a() {
            TileClass::BackgroundA
        } else if self.is_background_b() {
            TileClass::BackgroundB
        } else if !self.has_foreground() {
            TileClass::Blank
        } else if self.is_animated() {
            TileClass::Animated
        } else if self.is_solid() {
            TileClass::Solid
        } else {
            TileClass::Static
        }
    }
}
