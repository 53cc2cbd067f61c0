//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every frame the key
//!   is physically down. The game only ever reads directions this way, folded
//!   into a [`Buttons`] mask by [`InputState::pressed_buttons`].
//!
//! - **Edge-triggered (just_pressed / just_released):** These are true only during
//!   the frame the transition happened. They are cleared by `end_frame()`.
//!   Devtools hotkeys are read once per rendered frame rather than per tick:
//!   at 12 ticks per second most rendered frames run zero ticks.

use std::collections::HashSet;

bitflags::bitflags! {
    /// Directional buttons currently held, as reported by `get_pressed()`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        const UP    = 0b0000_0001;
        const DOWN  = 0b0000_0010;
        const LEFT  = 0b0000_0100;
        const RIGHT = 0b0000_1000;
    }
}

impl Buttons {
    /// Parse a lowercase button name as used in replay files. Unlike the
    /// generated `from_name`, this takes the lowercase spelling.
    pub fn from_replay_name(name: &str) -> Option<Self> {
        match name {
            "up" => Some(Self::UP),
            "down" => Some(Self::DOWN),
            "left" => Some(Self::LEFT),
            "right" => Some(Self::RIGHT),
            _ => None,
        }
    }
}

/// Anything that can be sampled once per tick for the held button mask.
pub trait ButtonSource {
    fn get_pressed(&mut self) -> Buttons;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    F3,
    P,
    N,
}

impl Key {
    fn button(self) -> Option<Buttons> {
        match self {
            Self::Up => Some(Buttons::UP),
            Self::Down => Some(Buttons::DOWN),
            Self::Left => Some(Buttons::LEFT),
            Self::Right => Some(Buttons::RIGHT),
            _ => None,
        }
    }
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// Directional keys currently held, as a button mask.
    pub fn pressed_buttons(&self) -> Buttons {
        self.held
            .iter()
            .filter_map(|key| key.button())
            .fold(Buttons::empty(), |mask, button| mask | button)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonSource for InputState {
    fn get_pressed(&mut self) -> Buttons {
        self.pressed_buttons()
    }
}
