//! Running the game without a window.

use blinka_core::time::{NoPacing, SleepPacer, TickPacer};

use crate::pipeline::{FrameSink, FramePipeline, FrameSnapshot, ShutdownSignal, Simulation};
use crate::replay::{ReplayInput, ReplaySequence};

/// Keeps every submitted frame.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<FrameSnapshot>,
}

impl FrameSink for RecordingSink {
    fn submit(&mut self, frame: &FrameSnapshot) {
        self.frames.push(frame.clone());
    }
}

/// Logs a one-line summary of each frame at debug level.
#[derive(Debug, Default)]
pub struct LogSink {
    submitted: u64,
}

impl LogSink {
    pub fn submitted(&self) -> u64 {
        self.submitted
    }
}

impl FrameSink for LogSink {
    fn submit(&mut self, frame: &FrameSnapshot) {
        self.submitted += 1;
        let first_wall = frame.walls.first().map(|w| (w.x, w.y));
        log::debug!(
            "frame {}: player frame {}, first wall {:?}, state {}",
            frame.tick,
            frame.player.frame,
            first_wall,
            frame.game_state
        );
    }
}

/// Play `replay` through the frame pipeline until its inputs run out.
///
/// With `fast` the ticks run back to back; otherwise they are paced at the
/// replay's own rate. Fails without running a tick if the replay does not
/// validate.
pub fn run_headless(replay: &ReplaySequence, fast: bool) -> Result<Simulation, String> {
    if fast {
        drive(replay, NoPacing)
    } else {
        drive(replay, SleepPacer::new(replay.fps))
    }
}

fn drive<P: TickPacer>(replay: &ReplaySequence, pacer: P) -> Result<Simulation, String> {
    let inputs = replay.expanded_inputs()?;
    let shutdown = ShutdownSignal::new();
    let input = ReplayInput::new(inputs, shutdown.clone());
    let mut pipeline = FramePipeline::new(input, LogSink::default(), pacer, Simulation::initial());

    pipeline.present();
    let ticks = pipeline.run(&shutdown);
    let (_, sink, simulation) = pipeline.into_parts();

    log::info!(
        "Headless run finished: {} ticks, {} frames submitted",
        ticks,
        sink.submitted()
    );
    log_summary(&simulation);
    Ok(simulation)
}

fn log_summary(simulation: &Simulation) {
    let (offset_x, offset_y) = simulation.world.scroll_offset();
    log::info!(
        "World offset ({offset_x}, {offset_y}), y_velocity {}, jump_time {}, player frame {}, state {}",
        simulation.motion.y_velocity,
        simulation.motion.jump_time,
        simulation.world.player.frame,
        simulation.game_state
    );
}
