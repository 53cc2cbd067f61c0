//! Tick-driven sprite frame cycling.
//!
//! Frames are 1-based indices into the sprite bank. A cycle of `frame_count`
//! frames advances exactly one frame per tick and wraps back to 1, so the
//! visible animation rate is tied to the tick rate rather than wall time.

/// Number of frames in the player's walk cycle.
pub const PLAYER_FRAME_COUNT: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCycle {
    frame_count: u16,
}

impl FrameCycle {
    pub fn new(frame_count: u16) -> Result<Self, String> {
        if frame_count == 0 {
            return Err("Animation validation failed: frame cycle has no frames".to_string());
        }
        Ok(Self { frame_count })
    }

    pub fn player() -> Self {
        Self {
            frame_count: PLAYER_FRAME_COUNT,
        }
    }

    pub fn frame_count(&self) -> u16 {
        self.frame_count
    }

    /// Frame that follows `frame`: `frame % frame_count + 1`.
    pub fn next(&self, frame: u16) -> u16 {
        frame % self.frame_count + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_cycle_sequence_from_frame_one() {
        let cycle = FrameCycle::player();
        let mut frame = 1;
        let mut seen = Vec::new();
        for _ in 0..10 {
            frame = cycle.next(frame);
            seen.push(frame);
        }
        assert_eq!(seen, vec![2, 3, 4, 1, 2, 3, 4, 1, 2, 3]);
    }

    #[test]
    fn cycle_has_period_of_frame_count() {
        let cycle = FrameCycle::new(6).expect("non-empty cycle");
        for start in 1..=6 {
            let mut frame = start;
            for _ in 0..6 {
                frame = cycle.next(frame);
            }
            assert_eq!(frame, start);
        }
    }

    #[test]
    fn out_of_range_frame_wraps_into_cycle() {
        // Frame 0 (the bank's first image) rolls into the cycle at 1.
        let cycle = FrameCycle::player();
        assert_eq!(cycle.next(0), 1);
        assert_eq!(cycle.next(9), 2);
    }

    #[test]
    fn empty_cycle_is_rejected() {
        let err = FrameCycle::new(0).expect_err("zero frames should fail");
        assert!(err.contains("no frames"));
    }
}
