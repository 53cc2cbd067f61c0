use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

/// Target tick rate of the game.
pub const DEFAULT_FPS: u32 = 12;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_fps(DEFAULT_FPS)
    }

    pub fn with_fps(fps: u32) -> Self {
        let fixed_dt = 1.0 / fps.max(1) as f64;
        Self {
            fixed_dt,
            // Never run more than three ticks to catch up after a stall.
            max_accumulator: fixed_dt * 3.0,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / fixed_dt,
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(real_dt);
    }

    /// Feed `real_dt` seconds of elapsed time into the accumulator.
    pub fn advance(&mut self, real_dt: f64) {
        self.real_dt = real_dt;

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {:.1}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        // FPS smoothing
        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Instant at which the accumulator will next hold a full tick.
    pub fn next_step_deadline(&self) -> Instant {
        let remaining = (self.fixed_dt - self.accumulator).max(0.0);
        self.last_instant + Duration::from_secs_f64(remaining)
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame-rate governor: blocks until the next tick slot.
pub trait TickPacer {
    fn tick(&mut self);
}

/// Sleeps the calling thread on a fixed-rate deadline schedule.
pub struct SleepPacer {
    period: Duration,
    next_deadline: Option<Instant>,
}

impl SleepPacer {
    pub fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            next_deadline: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Deadline following `deadline` given the current time. When the caller is
    /// more than a full period late the schedule is re-anchored on `now`.
    fn schedule_after(&self, deadline: Instant, now: Instant) -> (Instant, bool) {
        let next = deadline + self.period;
        if next + self.period < now {
            (now + self.period, true)
        } else {
            (next, false)
        }
    }
}

impl TickPacer for SleepPacer {
    fn tick(&mut self) {
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now + self.period);
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        let (next, reanchored) = self.schedule_after(deadline, Instant::now());
        if reanchored {
            log::warn!(
                "Tick overran its {:.1}ms slot, re-anchoring pacer",
                self.period.as_secs_f64() * 1000.0
            );
        }
        self.next_deadline = Some(next);
    }
}

/// Pacer that never waits. Used for replays and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPacing;

impl TickPacer for NoPacing {
    fn tick(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fixed_dt_is_twelve_fps() {
        let time = TimeState::new();
        assert!((time.fixed_dt - 1.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn accumulator_releases_whole_ticks_only() {
        let mut time = TimeState::with_fps(10);
        time.advance(0.25);
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert_eq!(time.fixed_step_count, 2);
        assert_eq!(time.steps_this_frame, 2);

        // The leftover 50ms plus another 60ms makes one more tick.
        time.advance(0.06);
        assert!(time.should_step());
        assert!(!time.should_step());
        assert_eq!(time.fixed_step_count, 3);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut time = TimeState::with_fps(10);
        time.advance(5.0);
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 3);
    }

    #[test]
    fn steps_this_frame_resets_each_frame() {
        let mut time = TimeState::with_fps(10);
        time.advance(0.1);
        assert!(time.should_step());
        time.advance(0.0);
        assert_eq!(time.steps_this_frame, 0);
        assert_eq!(time.frame_count, 2);
    }

    #[test]
    fn zero_fps_is_treated_as_one() {
        let time = TimeState::with_fps(0);
        assert!((time.fixed_dt - 1.0).abs() < 1e-12);
        assert_eq!(SleepPacer::new(0).period(), Duration::from_secs(1));
    }

    #[test]
    fn sleep_pacer_keeps_schedule_when_on_time() {
        let pacer = SleepPacer::new(10);
        let start = Instant::now();
        let (next, reanchored) = pacer.schedule_after(start, start);
        assert!(!reanchored);
        assert_eq!(next, start + Duration::from_millis(100));
    }

    #[test]
    fn sleep_pacer_reanchors_when_far_behind() {
        let pacer = SleepPacer::new(10);
        let start = Instant::now();
        let late = start + Duration::from_millis(550);
        let (next, reanchored) = pacer.schedule_after(start, late);
        assert!(reanchored);
        assert_eq!(next, late + Duration::from_millis(100));
    }

    #[test]
    fn no_pacing_returns_immediately() {
        let mut pacer = NoPacing;
        for _ in 0..1000 {
            pacer.tick();
        }
    }
}
