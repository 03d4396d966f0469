pub mod blit;
pub mod input;
pub mod map;
pub mod sound;
pub mod sprite;
pub mod terminal;
