use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::clock::{Clock, MonotonicClock};
use crate::config::RunConfig;
use crate::constants::{REPORT_WINDOWS, WINDOW_SECS};
use crate::counter::SlidingWindowCounter;
use crate::load::LoadGenerator;
use crate::span::WindowSpan;

// Main harness state, shared by the console and dashboard front-ends
pub struct App<C: Clock = MonotonicClock> {
    pub counter: SlidingWindowCounter<C>,
    load: LoadGenerator,
    windows: Vec<WindowSpan>,

    // Latest (window, count) pairs, shortest window first
    pub readings: Vec<(WindowSpan, u64)>,
    // Closed seconds, oldest first, for charting
    pub per_second: Vec<f64>,
    pub peak_record: (u64, DateTime<Local>),

    pub started: Instant,
    pub last_tick: Instant,
}

impl<C: Clock> App<C> {
    pub fn new(counter: SlidingWindowCounter<C>, config: &RunConfig) -> Self {
        let mut windows: Vec<WindowSpan> = REPORT_WINDOWS
            .iter()
            .filter_map(|&secs| WindowSpan::try_from(i64::from(secs)).ok())
            .collect();
        windows.push(config.window);
        windows.sort();
        windows.dedup();

        let now = counter.clock().now();
        App {
            counter,
            load: LoadGenerator::new(config.rate, config.pattern),
            readings: windows.iter().map(|&w| (w, 0)).collect(),
            windows,
            per_second: vec![0.0; WINDOW_SECS],
            peak_record: (0, Local::now()),
            started: now,
            last_tick: now,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.counter.clock().now().saturating_duration_since(self.started)
    }

    pub fn total_recorded(&self) -> u64 {
        self.load.emitted()
    }

    /// Feeds the events owed right now into the counter.
    pub fn pump(&mut self) -> u64 {
        let elapsed = self.elapsed();
        self.load.pump(&mut self.counter, elapsed)
    }

    pub fn tick_due(&self, tick: Duration) -> bool {
        self.counter.clock().now().saturating_duration_since(self.last_tick) >= tick
    }

    pub fn on_tick(&mut self) {
        for (span, count) in self.readings.iter_mut() {
            *count = self.counter.count(*span);
        }

        self.per_second.clear();
        self.per_second.extend(self.counter.history().map(|v| v as f64));

        let last_second = self.per_second.last().copied().unwrap_or(0.0) as u64;
        if last_second > self.peak_record.0 {
            self.peak_record = (last_second, Local::now());
        }

        self.last_tick = self.counter.clock().now();
        tracing::debug!(
            last_second,
            pending = self.counter.pending(),
            total = self.total_recorded(),
            "tick"
        );
    }

    pub fn windows(&self) -> &[WindowSpan] {
        &self.windows
    }

    pub fn reading(&self, span: WindowSpan) -> Option<u64> {
        self.readings.iter().find(|(w, _)| *w == span).map(|&(_, c)| c)
    }
}
