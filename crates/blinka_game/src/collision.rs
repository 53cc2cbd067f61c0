//! Wall collision for the scrolling world.
//!
//! Walls do not move on their own; the whole world scrolls by one displacement
//! per tick. Collision therefore clamps the *proposed scroll* instead of the
//! player: each wall is tested as if it had already been moved by `dx` alone,
//! then by `dy` alone, against the player's box at its fixed screen position.
//!
//! Resolution is a fold over the walls in creation order. Every wall sees the
//! displacement as already clamped by the walls before it, so when several
//! walls overlap the last one in order decides the clamp. That ordering is
//! observable in play and must not be replaced by a simultaneous solve.

use blinka_platform::display::TILE_SIZE;

use crate::physics::{Displacement, PlayerMotion};
use crate::world::Sprite;

/// Pixels trimmed from each side of the player's box, so tiles that merely
/// share an edge with the player do not count as overlapping.
pub const PLAYER_INSET: i32 = 1;

/// Axis-aligned box spanning `x0..x1` by `y0..y1`, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aabb {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Aabb {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x0 < other.x1 && self.x1 > other.x0 && self.y0 < other.y1 && self.y1 > other.y0
    }
}

/// The player's collision box, inset from its 16x16 footprint.
pub fn player_box(player: &Sprite) -> Aabb {
    Aabb::new(
        player.x + PLAYER_INSET,
        player.y + PLAYER_INSET,
        player.x + TILE_SIZE - PLAYER_INSET,
        player.y + TILE_SIZE - PLAYER_INSET,
    )
}

/// A wall's full tile box after a hypothetical scroll of (`dx`, `dy`).
pub fn wall_box(wall: &Sprite, dx: i32, dy: i32) -> Aabb {
    Aabb::new(
        wall.x + dx,
        wall.y + dy,
        wall.x + dx + TILE_SIZE,
        wall.y + dy + TILE_SIZE,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionOutcome {
    pub displacement: Displacement,
    pub collided_x: bool,
    pub collided_y: bool,
}

impl CollisionOutcome {
    fn unobstructed(displacement: Displacement) -> Self {
        Self {
            displacement,
            collided_x: false,
            collided_y: false,
        }
    }
}

/// Clamp `proposed` so the scrolled walls stop flush against the player.
///
/// A vertical contact, floor or ceiling, also lands `motion`.
pub fn resolve(
    proposed: Displacement,
    player: &Sprite,
    walls: &[Sprite],
    motion: &mut PlayerMotion,
) -> CollisionOutcome {
    let player_box = player_box(player);

    walls
        .iter()
        .enumerate()
        .fold(CollisionOutcome::unobstructed(proposed), |mut outcome, (index, wall)| {
            let d = &mut outcome.displacement;

            // signum() of a zero scroll is meaningless here, hence the guards.
            if d.dx != 0 && player_box.overlaps(&wall_box(wall, d.dx, 0)) {
                let clamped = player.x - wall.x - d.dx.signum() * TILE_SIZE;
                log::trace!("wall {index} blocks dx {} -> {}", d.dx, clamped);
                d.dx = clamped;
                outcome.collided_x = true;
            }

            if d.dy != 0 && player_box.overlaps(&wall_box(wall, 0, d.dy)) {
                let clamped = player.y - wall.y - d.dy.signum() * TILE_SIZE;
                log::trace!("wall {index} blocks dy {} -> {}", d.dy, clamped);
                d.dy = clamped;
                motion.land();
                outcome.collided_y = true;
            }

            outcome
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;
    use blinka_render::palette::WALL_FRAME;

    fn wall(x: i32, y: i32) -> Sprite {
        Sprite::new(WALL_FRAME, x, y)
    }

    fn player_at(x: i32, y: i32) -> Sprite {
        Sprite::new(1, x, y)
    }

    #[test]
    fn overlap_is_symmetric() {
        let boxes = [
            Aabb::new(0, 0, 16, 16),
            Aabb::new(15, 15, 31, 31),
            Aabb::new(16, 0, 32, 16),
            Aabb::new(-5, 3, 2, 9),
            Aabb::new(1, 1, 15, 15),
            Aabb::new(100, 100, 116, 116),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn shared_edge_is_not_overlap() {
        let a = Aabb::new(0, 0, 16, 16);
        assert!(!a.overlaps(&Aabb::new(16, 0, 32, 16)));
        assert!(!a.overlaps(&Aabb::new(0, 16, 16, 32)));
        assert!(a.overlaps(&Aabb::new(15, 15, 31, 31)));
    }

    #[test]
    fn player_box_is_inset_by_one() {
        assert_eq!(player_box(&player_at(0, 0)), Aabb::new(1, 1, 15, 15));
        assert_eq!(player_box(&player_at(72, 56)), Aabb::new(73, 57, 87, 71));
    }

    #[test]
    fn no_overlap_leaves_displacement_untouched() {
        let mut motion = PlayerMotion {
            y_velocity: -8,
            jump_time: 2,
        };
        let proposed = Displacement::new(-6, -15);
        let walls = [wall(0, 120), wall(300, 0)];
        let outcome = resolve(proposed, &player_at(72, 56), &walls, &mut motion);

        assert_eq!(outcome.displacement, proposed);
        assert!(!outcome.collided_x);
        assert!(!outcome.collided_y);
        assert_eq!(motion.y_velocity, -8);
        assert_eq!(motion.jump_time, 2);
    }

    #[test]
    fn wall_far_below_origin_player_is_ignored() {
        let player = player_at(0, 0);
        let floor = wall(0, 72);
        assert_eq!(wall_box(&floor, 0, 15), Aabb::new(0, 87, 16, 103));
        assert!(!player_box(&player).overlaps(&wall_box(&floor, 0, 15)));

        let mut motion = PlayerMotion::default();
        let outcome = resolve(Displacement::new(0, 15), &player, &[floor], &mut motion);
        assert_eq!(outcome.displacement.dy, 15);
    }

    #[test]
    fn wall_moving_away_never_touches_player() {
        let player = player_at(0, 56);
        let floor = wall(0, 72);
        let pbox = player_box(&player);
        assert_eq!(pbox, Aabb::new(1, 57, 15, 71));

        assert_eq!(wall_box(&floor, 0, 15), Aabb::new(0, 87, 16, 103));
        assert!(!pbox.overlaps(&wall_box(&floor, 0, 15)));
        assert_eq!(wall_box(&floor, 0, 16), Aabb::new(0, 88, 16, 104));
        assert!(!pbox.overlaps(&wall_box(&floor, 0, 16)));
    }

    #[test]
    fn falling_onto_floor_lands_flush() {
        // Player standing on the floor row with gravity pulling the world up.
        let player = player_at(72, 56);
        let floor = wall(64, 72);
        let mut motion = PlayerMotion {
            y_velocity: -16,
            jump_time: 2,
        };

        assert!(player_box(&player).overlaps(&wall_box(&floor, 0, -15)));
        let outcome = resolve(Displacement::new(0, -15), &player, &[floor], &mut motion);

        // 56 - 72 - (-1 * 16) = 0: the floor stays put.
        assert_eq!(outcome.displacement.dy, 0);
        assert!(outcome.collided_y);
        assert_eq!(motion, PlayerMotion::default());
    }

    #[test]
    fn falling_from_height_stops_on_floor_surface() {
        // Player 8px above the floor, falling at max speed.
        let player = player_at(72, 56);
        let floor = wall(72, 80);
        let mut motion = PlayerMotion {
            y_velocity: -40,
            jump_time: 3,
        };
        let outcome = resolve(Displacement::new(0, -15), &player, &[floor], &mut motion);

        // The floor rises by 8px so its top meets the player's bottom edge.
        assert_eq!(outcome.displacement.dy, -8);
        assert_eq!(floor.y + outcome.displacement.dy, player.y + 16);
        assert_eq!(motion.y_velocity, 0);
        assert_eq!(motion.jump_time, 0);
    }

    #[test]
    fn ceiling_contact_also_lands() {
        let player = player_at(72, 56);
        let ceiling = wall(72, 30);
        let mut motion = PlayerMotion {
            y_velocity: 20,
            jump_time: 1,
        };
        assert!(player_box(&player).overlaps(&wall_box(&ceiling, 0, 12)));
        let outcome = resolve(Displacement::new(0, 12), &player, &[ceiling], &mut motion);

        // 56 - 30 - 16 = 10: the ceiling comes down until it touches.
        assert_eq!(outcome.displacement.dy, 10);
        assert_eq!(ceiling.y + 10 + 16, player.y);
        assert_eq!(motion, PlayerMotion::default());
    }

    #[test]
    fn horizontal_clamp_places_wall_adjacent() {
        let player = player_at(64, 56);
        let blocker = wall(84, 56);
        let dx = -6;

        let pbox = player_box(&player);
        assert!(!pbox.overlaps(&wall_box(&blocker, 0, 0)));
        assert!(pbox.overlaps(&wall_box(&blocker, dx, 0)));

        let mut motion = PlayerMotion::default();
        let outcome = resolve(Displacement::new(dx, 0), &player, &[blocker], &mut motion);

        // 64 - 84 - (-1 * 16) = -4: the wall stops flush with the player's right side.
        assert_eq!(outcome.displacement.dx, -4);
        assert_eq!(blocker.x + outcome.displacement.dx, player.x + TILE_SIZE);
        assert!(outcome.collided_x);
        assert!(!outcome.collided_y);
        // Horizontal contact leaves vertical state alone.
        assert_eq!(motion, PlayerMotion::default());
    }

    #[test]
    fn clamp_formula_only_applies_on_overlap() {
        // Moving the wall at 80 right by 6 takes it away from the player.
        let player = player_at(64, 56);
        let receding = wall(80, 56);
        assert!(!player_box(&player).overlaps(&wall_box(&receding, 6, 0)));

        let mut motion = PlayerMotion::default();
        let outcome = resolve(Displacement::new(6, 0), &player, &[receding], &mut motion);
        assert_eq!(outcome.displacement.dx, 6);
        assert!(!outcome.collided_x);
    }

    #[test]
    fn horizontal_clamp_from_the_left() {
        let player = player_at(64, 56);
        let blocker = wall(44, 56);
        let dx = 6;
        assert!(player_box(&player).overlaps(&wall_box(&blocker, dx, 0)));

        let mut motion = PlayerMotion::default();
        let outcome = resolve(Displacement::new(dx, 0), &player, &[blocker], &mut motion);
        assert_eq!(outcome.displacement.dx, player.x - blocker.x - TILE_SIZE);
        assert_eq!(blocker.x + outcome.displacement.dx + TILE_SIZE, player.x);
    }

    #[test]
    fn overlap_with_zero_displacement_changes_nothing() {
        // Wall already overlapping the player box; no scroll requested.
        let player = player_at(72, 56);
        let inside = wall(72, 56);
        let mut motion = PlayerMotion {
            y_velocity: 0,
            jump_time: 2,
        };
        let outcome = resolve(Displacement::ZERO, &player, &[inside], &mut motion);
        assert_eq!(outcome.displacement, Displacement::ZERO);
        assert!(!outcome.collided_x && !outcome.collided_y);
        assert_eq!(motion.jump_time, 2);
    }

    #[test]
    fn later_wall_overrides_earlier_clamp() {
        let player = player_at(72, 56);
        let first = wall(72, 60);
        let second = wall(72, 40);

        // First wall alone clamps -15 to +12.
        let alone = resolve(
            Displacement::new(0, -15),
            &player,
            &[first],
            &mut PlayerMotion::default(),
        );
        assert_eq!(alone.displacement.dy, 12);

        // The second wall only overlaps once the first has flipped dy to +12,
        // and then clamps it again to 0.
        let outcome = resolve(
            Displacement::new(0, -15),
            &player,
            &[first, second],
            &mut PlayerMotion::default(),
        );
        assert_eq!(outcome.displacement.dy, 0);

        // In the other order the second wall is tested first, misses, and the
        // first wall has the last word.
        let reversed = resolve(
            Displacement::new(0, -15),
            &player,
            &[second, first],
            &mut PlayerMotion::default(),
        );
        assert_eq!(reversed.displacement.dy, 12);
    }

    #[test]
    fn standing_on_initial_floor_is_stable() {
        let world = World::initial_layout();
        let mut motion = PlayerMotion {
            y_velocity: -8,
            jump_time: 0,
        };
        let outcome = resolve(
            Displacement::new(0, -15),
            &world.player,
            &world.walls,
            &mut motion,
        );
        assert_eq!(outcome.displacement, Displacement::ZERO);
        assert!(outcome.collided_y);
    }
}
