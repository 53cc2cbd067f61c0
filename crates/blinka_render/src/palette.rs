//! Flat colours standing in for the sprite bank.
//!
//! Bitmaps are not loaded; each bank frame index gets a fixed colour instead.

pub type Rgba = [f32; 4];

pub const BACKGROUND_LIGHT: Rgba = [0.55, 0.78, 0.93, 1.0];
pub const BACKGROUND_DARK: Rgba = [0.50, 0.72, 0.88, 1.0];
pub const WALL: Rgba = [0.42, 0.27, 0.16, 1.0];
pub const LETTERBOX: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

const PLAYER_FRAMES: [Rgba; 4] = [
    [0.62, 0.20, 0.78, 1.0],
    [0.70, 0.26, 0.84, 1.0],
    [0.78, 0.32, 0.90, 1.0],
    [0.70, 0.26, 0.84, 1.0],
];

/// Bank frame index of wall tiles.
pub const WALL_FRAME: u16 = 5;

/// Colour of a bank frame. Frames 1..=4 are the player walk cycle.
pub fn frame_color(frame: u16) -> Rgba {
    match frame {
        1..=4 => PLAYER_FRAMES[(frame - 1) as usize],
        WALL_FRAME => WALL,
        _ => BACKGROUND_LIGHT,
    }
}

/// Checkerboard colour of the background grid cell at (`column`, `row`).
pub fn background_color(column: u32, row: u32) -> Rgba {
    if (column + row) % 2 == 0 {
        BACKGROUND_LIGHT
    } else {
        BACKGROUND_DARK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_frames_are_distinct_from_walls() {
        for frame in 1..=4 {
            assert_ne!(frame_color(frame), WALL);
        }
        assert_eq!(frame_color(WALL_FRAME), WALL);
    }

    #[test]
    fn background_alternates() {
        assert_eq!(background_color(0, 0), BACKGROUND_LIGHT);
        assert_eq!(background_color(1, 0), BACKGROUND_DARK);
        assert_eq!(background_color(1, 1), BACKGROUND_LIGHT);
    }
}
