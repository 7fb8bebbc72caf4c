use std::time::Duration;

use clap::ValueEnum;

use crate::clock::Clock;
use crate::constants::{BURST_MS, PUMP_BATCH};
use crate::counter::SlidingWindowCounter;

/// How generated events are spread within each second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Pattern {
    /// Evenly across the second.
    #[default]
    Steady,
    /// Packed into the first 200 ms of every second.
    Bursty,
}

/// Synthetic event source, driven from the caller's loop.
#[derive(Debug)]
pub struct LoadGenerator {
    rate: Option<u64>,
    pattern: Pattern,
    emitted: u64,
}

impl LoadGenerator {
    /// `rate` is events per second; `None` records as fast as the loop allows.
    pub fn new(rate: Option<u64>, pattern: Pattern) -> Self {
        Self {
            rate,
            pattern,
            emitted: 0,
        }
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Events owed at `elapsed` since the run started, capped at one batch.
    pub fn due(&self, elapsed: Duration) -> u64 {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let in_burst = ms % 1_000 < BURST_MS;

        let Some(rate) = self.rate else {
            return match self.pattern {
                Pattern::Bursty if !in_burst => 0,
                _ => PUMP_BATCH,
            };
        };

        let target = match self.pattern {
            Pattern::Steady => rate.saturating_mul(ms) / 1_000,
            Pattern::Bursty => {
                let whole = rate.saturating_mul(ms / 1_000);
                let partial = rate.saturating_mul((ms % 1_000).min(BURST_MS)) / BURST_MS;
                whole.saturating_add(partial)
            }
        };
        target.saturating_sub(self.emitted).min(PUMP_BATCH)
    }

    /// Records the events owed at `elapsed` and returns how many were recorded.
    pub fn pump<C: Clock>(&mut self, counter: &mut SlidingWindowCounter<C>, elapsed: Duration) -> u64 {
        let owed = self.due(elapsed);
        for _ in 0..owed {
            counter.record();
        }
        self.emitted += owed;
        owed
    }
}
