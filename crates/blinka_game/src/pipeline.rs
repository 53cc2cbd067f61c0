//! The per-tick update pipeline.
//!
//! One tick runs, in this order: sample buttons, integrate physics, resolve
//! collisions, scroll the world, advance the player's animation, submit the
//! frame, then wait for the next tick slot. `Simulation` owns every piece of
//! mutable game state; `FramePipeline` wires it to an input source, a frame
//! sink and a pacer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use blinka_core::animation::FrameCycle;
use blinka_core::input::{ButtonSource, Buttons};
use blinka_core::state::GameState;
use blinka_core::time::TickPacer;

use crate::collision::resolve;
use crate::physics::{integrate, Displacement, PhysicsConfig, PlayerMotion};
use crate::world::{Sprite, World};

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// 1-based index of the tick.
    pub tick: u64,
    pub buttons: Buttons,
    /// Displacement before collision.
    pub proposed: Displacement,
    /// Displacement actually applied to the walls.
    pub displacement: Displacement,
    pub collided_x: bool,
    pub collided_y: bool,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    pub world: World,
    pub motion: PlayerMotion,
    pub config: PhysicsConfig,
    /// Carried for display only; no rule moves it off `Playing`.
    pub game_state: GameState,
    animation: FrameCycle,
    tick: u64,
    last_report: Option<TickReport>,
}

impl Simulation {
    pub fn new(world: World, config: PhysicsConfig) -> Self {
        Self {
            world,
            motion: PlayerMotion::default(),
            config,
            game_state: GameState::default(),
            animation: FrameCycle::player(),
            tick: 0,
            last_report: None,
        }
    }

    /// The starting level with default physics.
    pub fn initial() -> Self {
        Self::new(World::initial_layout(), PhysicsConfig::default())
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    /// Advance the game by one tick with `buttons` held.
    pub fn step(&mut self, buttons: Buttons) -> TickReport {
        let proposed = integrate(buttons, &mut self.motion, &self.config);
        let outcome = resolve(
            proposed,
            &self.world.player,
            &self.world.walls,
            &mut self.motion,
        );
        self.world.scroll(outcome.displacement);

        let next_frame = self.animation.next(self.world.player.frame);
        self.world.player.set_frame(next_frame);

        self.tick += 1;
        let report = TickReport {
            tick: self.tick,
            buttons,
            proposed,
            displacement: outcome.displacement,
            collided_x: outcome.collided_x,
            collided_y: outcome.collided_y,
        };
        log::trace!(
            "tick {}: {:?} proposed ({}, {}) applied ({}, {}) contact x={} y={}",
            report.tick,
            report.buttons,
            report.proposed.dx,
            report.proposed.dy,
            report.displacement.dx,
            report.displacement.dy,
            report.collided_x,
            report.collided_y
        );
        self.last_report = Some(report);
        report
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            game_state: self.game_state,
            player: SpriteView::from(&self.world.player),
            walls: self.world.walls.iter().map(SpriteView::from).collect(),
        }
    }
}

/// Render-facing copy of a sprite, including where it was last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteView {
    pub x: i32,
    pub y: i32,
    pub old_x: i32,
    pub old_y: i32,
    pub frame: u16,
}

impl From<&Sprite> for SpriteView {
    fn from(sprite: &Sprite) -> Self {
        let (old_x, old_y) = sprite.previous_position();
        Self {
            x: sprite.x,
            y: sprite.y,
            old_x,
            old_y,
            frame: sprite.frame,
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub game_state: GameState,
    pub player: SpriteView,
    pub walls: Vec<SpriteView>,
}

impl FrameSnapshot {
    /// Sprites from foreground to background: the player, then the walls.
    pub fn sprites(&self) -> impl Iterator<Item = &SpriteView> {
        std::iter::once(&self.player).chain(self.walls.iter())
    }
}

/// Receives the finished frame once per tick.
pub trait FrameSink {
    fn submit(&mut self, frame: &FrameSnapshot);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

/// Cloneable stop flag, polled by the pipeline between ticks.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct FramePipeline<I, S, P> {
    input: I,
    sink: S,
    pacer: P,
    simulation: Simulation,
    state: RunState,
}

impl<I, S, P> FramePipeline<I, S, P>
where
    I: ButtonSource,
    S: FrameSink,
    P: TickPacer,
{
    pub fn new(input: I, sink: S, pacer: P, simulation: Simulation) -> Self {
        Self {
            input,
            sink,
            pacer,
            simulation,
            state: RunState::Running,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Submit the current state without advancing, e.g. before the first tick.
    pub fn present(&mut self) {
        self.sink.submit(&self.simulation.snapshot());
    }

    /// One full tick: sample, simulate, submit, then block on the pacer.
    pub fn run_tick(&mut self) -> TickReport {
        let buttons = self.input.get_pressed();
        let report = self.simulation.step(buttons);
        self.sink.submit(&self.simulation.snapshot());
        self.pacer.tick();
        report
    }

    /// Latch `Stopped` once `shutdown` has been requested.
    pub fn check_shutdown(&mut self, shutdown: &ShutdownSignal) -> RunState {
        if self.state == RunState::Running && shutdown.is_requested() {
            log::info!("Shutdown requested after tick {}", self.simulation.tick());
            self.state = RunState::Stopped;
        }
        self.state
    }

    /// Tick until `shutdown` is requested. Returns the number of ticks run.
    pub fn run(&mut self, shutdown: &ShutdownSignal) -> u64 {
        let mut ticks = 0;
        while self.check_shutdown(shutdown) == RunState::Running {
            self.run_tick();
            ticks += 1;
        }
        ticks
    }

    /// Run exactly `count` ticks, ignoring any shutdown signal.
    #[allow(dead_code)]
    pub fn run_ticks(&mut self, count: u64) -> Vec<TickReport> {
        (0..count).map(|_| self.run_tick()).collect()
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (I, S, Simulation) {
        (self.input, self.sink, self.simulation)
    }
}
