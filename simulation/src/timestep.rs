use std::time::Duration;

use gridiron_core::TICK_DURATION;

/// Longest stretch of wall time carried between frames.
pub const MAX_BACKLOG: Duration = Duration::from_millis(250);

/// Most ticks executed for a single frame.
pub const MAX_TICKS_PER_FRAME: u32 = 8;

/// Converts variable frame times into a whole number of fixed ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedTimestep {
    step: Duration,
    max_backlog: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
}

impl FixedTimestep {
    /// Creates an accumulator for the provided step and caps.
    #[must_use]
    pub const fn new(step: Duration, max_backlog: Duration, max_ticks_per_frame: u32) -> Self {
        Self {
            step,
            max_backlog,
            max_ticks_per_frame,
            accumulator: Duration::ZERO,
        }
    }

    /// Adds `elapsed` wall time and returns how many ticks to run now.
    ///
    /// Time beyond the backlog cap is dropped rather than replayed later.
    pub fn accumulate(&mut self, elapsed: Duration) -> u32 {
        self.accumulator = self.accumulator.saturating_add(elapsed).min(self.max_backlog);
        if self.step.is_zero() {
            return 0;
        }

        let due = self.accumulator.as_nanos() / self.step.as_nanos();
        let ticks = u32::try_from(due)
            .unwrap_or(u32::MAX)
            .min(self.max_ticks_per_frame);
        self.accumulator = self.accumulator.saturating_sub(self.step * ticks);
        ticks
    }

    /// Wall time waiting to be converted into ticks.
    #[must_use]
    pub const fn backlog(&self) -> Duration {
        self.accumulator
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(TICK_DURATION, MAX_BACKLOG, MAX_TICKS_PER_FRAME)
    }
}
