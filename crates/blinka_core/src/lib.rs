pub mod animation;
pub mod input;
pub mod state;
pub mod time;
