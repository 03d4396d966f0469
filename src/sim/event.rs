//! Events emitted by core commands.
//! The presentation layer consumes these for sound.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CoreEvent {
    /// Upward movement stopped by a solid or marker tile above the head.
    HitHead,
    /// The player grabbed a ceiling hook.
    ClingToHooks,
}
