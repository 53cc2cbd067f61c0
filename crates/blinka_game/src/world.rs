//! Sprites and the fixed level layout.
//!
//! The player stays at a fixed screen position; gameplay position is encoded
//! in how far the walls have been scrolled around it.

use blinka_platform::display::TILE_SIZE;
use blinka_render::palette::WALL_FRAME;

use crate::physics::Displacement;

/// Screen position of the player sprite's top-left corner.
pub const PLAYER_START: (i32, i32) = (72, 56);
pub const PLAYER_START_FRAME: u16 = 1;

const FLOOR_Y: i32 = 72;
const PLATFORM_Y: i32 = 44;

/// A tile-sized sprite. Remembers where it was before the last move so the
/// renderer can erase the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub x: i32,
    pub y: i32,
    pub frame: u16,
    old_x: i32,
    old_y: i32,
}

impl Sprite {
    pub fn new(frame: u16, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            frame,
            old_x: x,
            old_y: y,
        }
    }

    /// Record the current position as the previous one.
    pub fn snapshot(&mut self) {
        self.old_x = self.x;
        self.old_y = self.y;
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_frame(&mut self, frame: u16) {
        self.frame = frame;
    }

    pub fn previous_position(&self) -> (i32, i32) {
        (self.old_x, self.old_y)
    }
}

#[derive(Debug, Clone)]
pub struct World {
    pub player: Sprite,
    /// Obstacles in creation order. Collision resolution depends on this order.
    pub walls: Vec<Sprite>,
    scroll_offset: (i32, i32),
}

impl World {
    pub fn new(player: Sprite, walls: Vec<Sprite>) -> Self {
        Self {
            player,
            walls,
            scroll_offset: (0, 0),
        }
    }

    /// Floor across the first screen, a one-tile pit, a second floor run, and
    /// a raised platform overlapping the pit.
    pub fn initial_layout() -> Self {
        let mut walls = Vec::new();
        walls.extend(tile_row(0, 10, FLOOR_Y));
        walls.extend(tile_row(12, 20, FLOOR_Y));
        walls.extend(tile_row(8, 13, PLATFORM_Y));

        let player = Sprite::new(PLAYER_START_FRAME, PLAYER_START.0, PLAYER_START.1);
        Self::new(player, walls)
    }

    /// Move every non-player sprite by `d`.
    pub fn scroll(&mut self, d: Displacement) {
        scroll(&mut self.walls, d);
        self.scroll_offset.0 += d.dx;
        self.scroll_offset.1 += d.dy;
    }

    /// Total world scroll applied since construction.
    pub fn scroll_offset(&self) -> (i32, i32) {
        self.scroll_offset
    }
}

/// Snapshot then move each sprite, every tick, including zero displacements.
pub fn scroll(sprites: &mut [Sprite], d: Displacement) {
    for sprite in sprites {
        sprite.snapshot();
        sprite.set_position(sprite.x + d.dx, sprite.y + d.dy);
    }
}

/// Wall tiles for grid columns `first..last` at pixel row `y`.
fn tile_row(first: i32, last: i32, y: i32) -> impl Iterator<Item = Sprite> {
    (first..last).map(move |column| Sprite::new(WALL_FRAME, column * TILE_SIZE, y))
}
