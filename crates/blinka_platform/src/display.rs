//! Geometry of the target display.
//!
//! The screen is 160x128 logical pixels, tiled 10x8 with 16x16 tiles.
//! (0, 0) is the top-left corner and sprite positions name their top-left pixel.

pub const SCREEN_WIDTH: u32 = 160;
pub const SCREEN_HEIGHT: u32 = 128;
pub const TILE_SIZE: i32 = 16;
pub const GRID_COLUMNS: u32 = SCREEN_WIDTH / TILE_SIZE as u32;
pub const GRID_ROWS: u32 = SCREEN_HEIGHT / TILE_SIZE as u32;
