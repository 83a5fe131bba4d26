//! Repeating autoplay timer.
//!
//! Wraps a [`tokio::time::Interval`]; nothing is spawned. A tick can only happen
//! while someone awaits [`AutoplayTimer::tick`], so dropping the timer is a
//! complete cancellation.

use std::time::Duration;

use tokio::time::{self, Instant, Interval};

pub const DEFAULT_AUTOPLAY_PERIOD: Duration = Duration::from_millis(3000);

/// Proof that one autoplay period elapsed for the timer armed with `generation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayTick {
    generation: u64,
}

impl AutoplayTick {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub struct AutoplayTimer {
    interval: Interval,
    generation: u64,
}

impl AutoplayTimer {
    /// Arms a timer whose first tick is one full `period` from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(period: Duration, generation: u64) -> Self {
        Self {
            interval: time::interval_at(Instant::now() + period, period),
            generation,
        }
    }

    /// Resolves once per elapsed period. Cancel-safe; a caller that falls behind
    /// gets one immediate tick per missed period.
    pub async fn tick(&mut self) -> AutoplayTick {
        self.interval.tick().await;
        AutoplayTick {
            generation: self.generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
#[path = "tests/autoplay_tests.rs"]
mod tests;
