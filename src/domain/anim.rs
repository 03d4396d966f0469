//! Four-phase animation clock.
//!
//! The phase is measured in atlas bytes: one 16x16 tile occupies `0x20`
//! bytes of planar source memory, so adding the phase to an animated tile
//! code selects the next frame of that tile.

/// Atlas bytes per 16x16 tile; also the phase increment.
pub const PHASE_STEP: u16 = 0x20;

/// Phase value that wraps back to zero.
const PHASE_WRAP: u16 = PHASE_STEP * 4;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct AnimationClock {
    step: u16,
}

impl AnimationClock {
    pub fn new() -> Self {
        AnimationClock { step: 0 }
    }

    /// Current phase: one of `0x00, 0x20, 0x40, 0x60`.
    #[inline]
    pub fn phase(&self) -> u16 {
        self.step
    }

    /// Advance one phase, wrapping after the fourth.
    pub fn advance(&mut self) -> u16 {
        self.step += PHASE_STEP;
        if self.step == PHASE_WRAP {
            self.step = 0;
        }
        self.step
    }

    /// Level (re)load.
    pub fn reset(&mut self) {
        self.step = 0;
    }
}
