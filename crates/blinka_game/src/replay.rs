use blinka_core::input::{ButtonSource, Buttons};
use blinka_core::time::DEFAULT_FPS;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::pipeline::ShutdownSignal;

/// Upper bound on a replay's length after repeats are expanded (a little over
/// 23 hours at 12 fps).
pub const MAX_REPLAY_TICKS: u64 = 1_000_000;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_fps")]
    pub fps: u32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    /// Held button names: "up", "down", "left", "right".
    #[serde(default)]
    pub buttons: Vec<String>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplayFrame {
    fn mask(&self) -> Result<Buttons, String> {
        self.buttons.iter().try_fold(Buttons::empty(), |mask, name| {
            Buttons::from_replay_name(name)
                .map(|button| mask | button)
                .ok_or_else(|| format!("unknown button '{name}'"))
        })
    }
}

impl ReplaySequence {
    /// Number of ticks the replay lasts once repeats are expanded. A repeat of
    /// zero counts as one.
    pub fn tick_count(&self) -> u64 {
        self.frames
            .iter()
            .map(|frame| u64::from(frame.repeat.max(1)))
            .sum()
    }

    /// One button mask per tick. Fails on the same replays `validate_replay`
    /// rejects, so a hand-built sequence gets the same checks as a loaded one.
    pub fn expanded_inputs(&self) -> Result<Vec<Buttons>, String> {
        validate_replay(self)?;
        let mut out = Vec::with_capacity(self.tick_count() as usize);
        for frame in &self.frames {
            let mask = frame.mask()?;
            out.extend(std::iter::repeat(mask).take(frame.repeat.max(1) as usize));
        }
        Ok(out)
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fps == 0 {
        return Err("Replay validation failed: fps must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    for (index, frame) in replay.frames.iter().enumerate() {
        frame
            .mask()
            .map_err(|e| format!("Replay validation failed: frame {index}: {e}"))?;
    }
    let ticks = replay.tick_count();
    if ticks > MAX_REPLAY_TICKS {
        return Err(format!(
            "Replay validation failed: {ticks} ticks exceeds the limit of {MAX_REPLAY_TICKS}"
        ));
    }
    Ok(())
}

const fn default_fps() -> u32 {
    DEFAULT_FPS
}

const fn default_repeat() -> u32 {
    1
}

/// Feeds a replay to the pipeline one tick at a time. Requests shutdown once
/// the last recorded tick has been handed out.
pub struct ReplayInput {
    inputs: Vec<Buttons>,
    cursor: usize,
    shutdown: ShutdownSignal,
}

impl ReplayInput {
    pub fn new(inputs: Vec<Buttons>, shutdown: ShutdownSignal) -> Self {
        if inputs.is_empty() {
            shutdown.request();
        }
        Self {
            inputs,
            cursor: 0,
            shutdown,
        }
    }

    #[allow(dead_code)]
    pub fn remaining(&self) -> usize {
        self.inputs.len().saturating_sub(self.cursor)
    }
}

impl ButtonSource for ReplayInput {
    fn get_pressed(&mut self) -> Buttons {
        let pressed = self.inputs.get(self.cursor).copied().unwrap_or_default();
        self.cursor += 1;
        if self.cursor >= self.inputs.len() {
            self.shutdown.request();
        }
        pressed
    }
}
