//! Per-tick player physics.
//!
//! The player never moves on screen. `integrate` turns held buttons into the
//! displacement the *world* should move by this tick, so every sign here is
//! inverted relative to the player's apparent motion: holding RIGHT yields a
//! negative `dx`, and a rising player yields a positive `dy`.

use blinka_core::input::Buttons;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsConfig {
    /// Horizontal scroll per tick while a direction is held. Values of 16 or
    /// more let the player skip past a whole tile between ticks.
    pub move_speed: i32,
    pub gravity: i32,
    pub initial_velocity: i32,
    /// Cap on vertical scroll per tick, both directions.
    pub max_move: i32,
    /// Jump triggers allowed before a wall contact restores them.
    pub max_jump_time: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            move_speed: 6,
            gravity: 8,
            initial_velocity: 28,
            max_move: 15,
            max_jump_time: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerMotion {
    pub y_velocity: i32,
    pub jump_time: u32,
}

impl PlayerMotion {
    /// Vertical wall contact: stop vertical motion and restore jump allowance.
    pub fn land(&mut self) {
        self.y_velocity = 0;
        self.jump_time = 0;
    }
}

/// World scroll for one tick, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Displacement {
    pub dx: i32,
    pub dy: i32,
}

impl Displacement {
    #[allow(dead_code)]
    pub const ZERO: Self = Self { dx: 0, dy: 0 };

    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

pub fn integrate(buttons: Buttons, motion: &mut PlayerMotion, config: &PhysicsConfig) -> Displacement {
    let dx = if buttons.contains(Buttons::RIGHT) {
        -config.move_speed
    } else if buttons.contains(Buttons::LEFT) {
        config.move_speed
    } else {
        0
    };

    if buttons.contains(Buttons::UP) && motion.jump_time < config.max_jump_time {
        motion.y_velocity = config.initial_velocity;
        motion.jump_time += 1;
    }

    // Gravity lands twice in the displacement: once on the stored velocity
    // and once more on the scroll derived from it. The jump arc is tuned
    // around this.
    motion.y_velocity -= config.gravity;
    let dy = (motion.y_velocity - config.gravity).clamp(-config.max_move, config.max_move);

    Displacement { dx, dy }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(buttons: Buttons, motion: &mut PlayerMotion) -> Displacement {
        integrate(buttons, motion, &PhysicsConfig::default())
    }

    #[test]
    fn right_scrolls_world_left() {
        let mut motion = PlayerMotion::default();
        assert_eq!(step(Buttons::RIGHT, &mut motion).dx, -6);
    }

    #[test]
    fn left_scrolls_world_right() {
        let mut motion = PlayerMotion::default();
        assert_eq!(step(Buttons::LEFT, &mut motion).dx, 6);
    }

    #[test]
    fn right_wins_over_left() {
        let mut motion = PlayerMotion::default();
        assert_eq!(step(Buttons::LEFT | Buttons::RIGHT, &mut motion).dx, -6);
    }

    #[test]
    fn down_is_ignored() {
        let mut with_down = PlayerMotion::default();
        let mut without = PlayerMotion::default();
        assert_eq!(
            step(Buttons::DOWN, &mut with_down),
            step(Buttons::empty(), &mut without)
        );
        assert_eq!(with_down, without);
    }

    #[test]
    fn idle_tick_applies_gravity_twice() {
        let mut motion = PlayerMotion::default();
        let d = step(Buttons::empty(), &mut motion);
        assert_eq!(motion.y_velocity, -8);
        // -8 - 8 = -16, clamped to the max move.
        assert_eq!(d.dy, -15);
        assert_eq!(d.dx, 0);
    }

    #[test]
    fn jump_sets_initial_velocity_then_gravity() {
        let mut motion = PlayerMotion::default();
        let d = step(Buttons::UP, &mut motion);
        assert_eq!(motion.jump_time, 1);
        assert_eq!(motion.y_velocity, 20);
        assert_eq!(d.dy, 12);
    }

    #[test]
    fn dy_is_clamped_both_ways() {
        let config = PhysicsConfig {
            initial_velocity: 100,
            ..PhysicsConfig::default()
        };
        let mut motion = PlayerMotion::default();
        assert_eq!(integrate(Buttons::UP, &mut motion, &config).dy, 15);

        let mut motion = PlayerMotion {
            y_velocity: -200,
            jump_time: 3,
        };
        assert_eq!(integrate(Buttons::empty(), &mut motion, &config).dy, -15);
        // Velocity itself is not clamped, only the scroll.
        assert_eq!(motion.y_velocity, -208);
    }

    #[test]
    fn jump_retriggers_up_to_the_cap() {
        let mut motion = PlayerMotion::default();
        let mut velocities = Vec::new();
        for _ in 0..6 {
            step(Buttons::UP, &mut motion);
            velocities.push(motion.y_velocity);
        }
        assert_eq!(velocities, vec![20, 20, 20, 12, 4, -4]);
        assert_eq!(motion.jump_time, 3);
        let third = velocities[2];
        assert!(velocities[3..].iter().all(|&v| v <= third));
    }

    #[test]
    fn land_resets_velocity_and_jump_time() {
        let mut motion = PlayerMotion {
            y_velocity: -30,
            jump_time: 3,
        };
        motion.land();
        assert_eq!(motion, PlayerMotion::default());
    }
}
