//! Turns frame snapshots into tile quads.
//!
//! Snapshots list sprites front to back; the batch is painted back to front,
//! so the background grid goes in first and the player last.

use blinka_platform::display::{GRID_COLUMNS, GRID_ROWS, SCREEN_HEIGHT, SCREEN_WIDTH, TILE_SIZE};
use blinka_render::palette::{background_color, frame_color};
use blinka_render::{QuadSpec, TileBatch};

use crate::pipeline::{FrameSink, FrameSnapshot, SpriteView};

#[derive(Debug, Default)]
pub struct SceneBuilder {
    batch: TileBatch,
    last_tick: Option<u64>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch(&self) -> &TileBatch {
        &self.batch
    }

    /// Tick of the most recently built frame.
    #[allow(dead_code)]
    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    fn push_background(&mut self) {
        let size = TILE_SIZE as f32;
        for row in 0..GRID_ROWS {
            for column in 0..GRID_COLUMNS {
                self.batch.push_quad(QuadSpec {
                    x: column as f32 * size,
                    y: row as f32 * size,
                    width: size,
                    height: size,
                    color: background_color(column, row),
                });
            }
        }
    }

    fn push_sprite(&mut self, sprite: &SpriteView) {
        if !on_screen(sprite) {
            return;
        }
        self.batch.push_quad(QuadSpec {
            x: sprite.x as f32,
            y: sprite.y as f32,
            width: TILE_SIZE as f32,
            height: TILE_SIZE as f32,
            color: frame_color(sprite.frame),
        });
    }
}

impl FrameSink for SceneBuilder {
    fn submit(&mut self, frame: &FrameSnapshot) {
        self.batch.clear();
        self.push_background();
        let sprites: Vec<&SpriteView> = frame.sprites().collect();
        for sprite in sprites.into_iter().rev() {
            self.push_sprite(sprite);
        }
        self.last_tick = Some(frame.tick);
        log::trace!(
            "built frame {} with {} quads",
            frame.tick,
            self.batch.quad_count()
        );
    }
}

fn on_screen(sprite: &SpriteView) -> bool {
    sprite.x + TILE_SIZE > 0
        && sprite.x < SCREEN_WIDTH as i32
        && sprite.y + TILE_SIZE > 0
        && sprite.y < SCREEN_HEIGHT as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Simulation;
    use blinka_render::palette::{WALL, WALL_FRAME};

    const BACKGROUND_QUADS: usize = 80;

    fn view(x: i32, y: i32, frame: u16) -> SpriteView {
        SpriteView {
            x,
            y,
            old_x: x,
            old_y: y,
            frame,
        }
    }

    fn first_corner(batch: &TileBatch, quad: usize) -> [f32; 2] {
        batch.vertices()[quad * 4].position
    }

    #[test]
    fn initial_frame_draws_background_visible_walls_then_player() {
        let mut builder = SceneBuilder::new();
        builder.submit(&Simulation::initial().snapshot());
        let batch = builder.batch();

        // Ten floor tiles and two platform tiles start on screen.
        assert_eq!(batch.quad_count(), BACKGROUND_QUADS + 12 + 1);
        assert_eq!(first_corner(batch, 0), [0.0, 0.0]);

        let last = batch.quad_count() - 1;
        assert_eq!(first_corner(batch, last), [72.0, 56.0]);
        assert_eq!(batch.vertices()[last * 4].color, frame_color(1));
        assert_eq!(builder.last_tick(), Some(0));
    }

    #[test]
    fn walls_are_drawn_last_to_first() {
        let frame = FrameSnapshot {
            tick: 3,
            game_state: Default::default(),
            player: view(72, 56, 2),
            walls: vec![view(0, 72, WALL_FRAME), view(16, 72, WALL_FRAME)],
        };
        let mut builder = SceneBuilder::new();
        builder.submit(&frame);
        let batch = builder.batch();

        assert_eq!(batch.quad_count(), BACKGROUND_QUADS + 3);
        assert_eq!(first_corner(batch, BACKGROUND_QUADS), [16.0, 72.0]);
        assert_eq!(first_corner(batch, BACKGROUND_QUADS + 1), [0.0, 72.0]);
        assert_eq!(batch.vertices()[BACKGROUND_QUADS * 4].color, WALL);
    }

    #[test]
    fn off_screen_sprites_are_culled() {
        assert!(on_screen(&view(-15, 0, WALL_FRAME)));
        assert!(!on_screen(&view(-16, 0, WALL_FRAME)));
        assert!(on_screen(&view(159, 127, WALL_FRAME)));
        assert!(!on_screen(&view(160, 0, WALL_FRAME)));
        assert!(!on_screen(&view(0, 128, WALL_FRAME)));
        assert!(!on_screen(&view(0, -16, WALL_FRAME)));
    }

    #[test]
    fn resubmitting_replaces_the_previous_frame() {
        let mut builder = SceneBuilder::new();
        let frame = Simulation::initial().snapshot();
        builder.submit(&frame);
        let first = builder.batch().quad_count();
        builder.submit(&frame);
        assert_eq!(builder.batch().quad_count(), first);
    }
}
