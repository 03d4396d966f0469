pub mod anim;
pub mod camera;
pub mod collision;
pub mod culling;
pub mod grid;
pub mod player;
pub mod tile;
