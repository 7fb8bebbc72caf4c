use std::time::{Duration, Instant};

use crate::clock::{Clock, MonotonicClock};
use crate::constants::{INVALID_QUERY, ROTATION_INTERVAL, WINDOW_SECS};
use crate::span::WindowSpan;

/// Counts events over the trailing 300 seconds at one-second resolution.
///
/// Events land in a pending tally; once a second or more has passed since the
/// last rotation, the next `record` or query folds that tally into the
/// per-second history. A rotation spanning several seconds spreads the pending
/// events evenly (floor division) across them, and a gap of 300 seconds or more
/// zeroes the whole window.
///
/// Pending events are never visible to queries.
#[derive(Debug)]
pub struct SlidingWindowCounter<C = MonotonicClock> {
    clock: C,
    pending: u64,
    // Ring buffer; `head` is the oldest slot and the next one to be overwritten.
    history: [u64; WINDOW_SECS],
    head: usize,
    last_rotation: Instant,
}

impl SlidingWindowCounter<MonotonicClock> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock)
    }
}

impl Default for SlidingWindowCounter<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SlidingWindowCounter<C> {
    pub fn with_clock(clock: C) -> Self {
        let last_rotation = clock.now();
        Self {
            clock,
            pending: 0,
            history: [0; WINDOW_SECS],
            head: 0,
            last_rotation,
        }
    }

    /// Records a single event.
    #[inline]
    pub fn record(&mut self) {
        let now = self.clock.now();
        self.pending += 1;
        self.advance(now);
    }

    /// Number of events in the last `seconds` seconds, or `-1` when `seconds`
    /// is outside `1..=300`.
    pub fn query(&mut self, seconds: i64) -> i64 {
        match WindowSpan::try_from(seconds) {
            Ok(span) => self.count_signed(span),
            Err(err) => {
                tracing::trace!(%err, "rejected window query");
                INVALID_QUERY
            }
        }
    }

    /// Like [`query`](Self::query), also returning `-1` for fractional or
    /// non-finite input.
    pub fn query_f64(&mut self, seconds: f64) -> i64 {
        match WindowSpan::try_from(seconds) {
            Ok(span) => self.count_signed(span),
            Err(err) => {
                tracing::trace!(%err, "rejected window query");
                INVALID_QUERY
            }
        }
    }

    /// Number of events in the last `span` seconds.
    pub fn count(&mut self, span: WindowSpan) -> u64 {
        let now = self.clock.now();
        self.advance(now);

        let idle_secs = now.saturating_duration_since(self.last_rotation).as_secs();
        let range = span.secs().saturating_sub(usize::try_from(idle_secs).unwrap_or(usize::MAX));
        if range == 0 {
            return 0;
        }
        self.history().skip(WINDOW_SECS - range).sum()
    }

    /// Events recorded since the last rotation.
    pub fn pending(&self) -> u64 {
        self.pending
    }

    /// Per-second counts, oldest first.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = u64> + '_ {
        let (newer, older) = self.history.split_at(self.head);
        older.iter().chain(newer).copied()
    }

    pub fn last_rotation(&self) -> Instant {
        self.last_rotation
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn count_signed(&mut self, span: WindowSpan) -> i64 {
        i64::try_from(self.count(span)).unwrap_or(i64::MAX)
    }

    /// Rotates if at least one full second has passed since the last rotation.
    #[inline]
    fn advance(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_rotation);
        if elapsed < ROTATION_INTERVAL {
            return;
        }
        self.rotate(elapsed);
        self.pending = 0;
        self.last_rotation = now;
    }

    fn rotate(&mut self, elapsed: Duration) {
        let elapsed_secs = elapsed.as_secs().max(1);
        let per_second = if elapsed_secs >= WINDOW_SECS as u64 {
            0
        } else {
            self.pending / elapsed_secs
        };
        let slots = usize::try_from(elapsed_secs).map_or(WINDOW_SECS, |s| s.min(WINDOW_SECS));

        self.append(per_second, slots);

        tracing::debug!(
            elapsed_secs,
            pending = self.pending,
            per_second,
            "rotated window"
        );
    }

    /// Pushes `slots` copies of `value`, evicting the same number of oldest seconds.
    fn append(&mut self, value: u64, slots: usize) {
        if slots >= WINDOW_SECS {
            self.history.fill(value);
            self.head = 0;
            return;
        }

        let to_end = slots.min(WINDOW_SECS - self.head);
        self.history[self.head..self.head + to_end].fill(value);
        self.history[..slots - to_end].fill(value);
        self.head = (self.head + slots) % WINDOW_SECS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use tracing_test::traced_test;

    fn counter() -> (SlidingWindowCounter<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (SlidingWindowCounter::with_clock(clock.clone()), clock)
    }

    fn record_n(counter: &mut SlidingWindowCounter<ManualClock>, n: u64) {
        for _ in 0..n {
            counter.record();
        }
    }

    #[test]
    fn fresh_counter_is_empty() {
        let (mut counter, _clock) = counter();
        assert_eq!(counter.history().count(), WINDOW_SECS);
        assert!(counter.history().all(|v| v == 0));
        assert_eq!(counter.pending(), 0);
        assert_eq!(counter.query(300), 0);
    }

    #[test]
    fn records_stay_pending_within_a_second() {
        let (mut counter, clock) = counter();
        record_n(&mut counter, 10);
        clock.advance_ms(999);
        counter.record();

        assert_eq!(counter.pending(), 11);
        assert_eq!(counter.query(1), 0);
        assert_eq!(counter.query(300), 0);
    }

    #[test]
    fn query_triggered_rotation_closes_the_second() {
        let (mut counter, clock) = counter();
        clock.advance_ms(500);
        record_n(&mut counter, 1_000);
        clock.advance_ms(400);
        clock.advance_ms(1_000);

        assert_eq!(counter.query(1), 1_000);
        assert_eq!(counter.query(300), 1_000);
        assert_eq!(counter.pending(), 0);
    }

    #[test]
    fn record_triggered_rotation_includes_the_triggering_event() {
        let (mut counter, clock) = counter();
        record_n(&mut counter, 1_000);
        clock.advance_ms(900);
        clock.advance_ms(1_000);
        counter.record();

        assert_eq!(counter.pending(), 0);
        assert_eq!(counter.query(1), 1_001);
        assert_eq!(counter.query(300), 1_001);
    }

    #[test]
    fn silence_rotates_in_zeroes() {
        let (mut counter, clock) = counter();
        clock.advance_ms(3_000);

        assert_eq!(counter.query(1), 0);
        assert_eq!(counter.history().filter(|&v| v != 0).count(), 0);
    }

    #[test]
    fn invalid_windows_return_sentinel() {
        let (mut counter, _clock) = counter();
        assert_eq!(counter.query(0), INVALID_QUERY);
        assert_eq!(counter.query(301), INVALID_QUERY);
        assert_eq!(counter.query(-1), INVALID_QUERY);
        assert_eq!(counter.query_f64(1.5), INVALID_QUERY);
        assert_eq!(counter.query_f64(f64::NAN), INVALID_QUERY);
        assert_eq!(counter.query_f64(5.0), 0);
    }

    #[test]
    fn one_event_per_second_fills_the_window() {
        let (mut counter, clock) = counter();
        counter.record();
        for _ in 1..300 {
            clock.advance_ms(1_000);
            counter.record();
        }

        assert_eq!(counter.query(300), 300);
        assert_eq!(counter.query(1), 1);
        // 299 rotations; the first carried both the first and second events.
        assert_eq!(counter.history().next(), Some(0));
        assert_eq!(counter.history().nth(1), Some(2));
    }

    #[test]
    fn long_gap_smears_pending_evenly_with_floor() {
        let (mut counter, clock) = counter();
        record_n(&mut counter, 10);
        clock.advance_ms(3_200);

        assert_eq!(counter.query(3), 9);
        assert_eq!(counter.query(1), 3);
        let newest: Vec<u64> = counter.history().skip(WINDOW_SECS - 4).collect();
        assert_eq!(newest, vec![0, 3, 3, 3]);
    }

    #[test]
    fn gap_of_a_full_window_discards_everything() {
        let (mut counter, clock) = counter();
        for _ in 0..20 {
            record_n(&mut counter, 50);
            clock.advance_ms(1_000);
        }
        record_n(&mut counter, 5_000);
        clock.advance_ms(300_000);

        for n in [1, 10, 60, 300] {
            assert_eq!(counter.query(n), 0, "window {n}");
        }
    }

    #[test]
    fn gap_just_under_a_full_window_keeps_the_average() {
        let (mut counter, clock) = counter();
        record_n(&mut counter, 598);
        clock.advance_ms(299_000);

        assert_eq!(counter.query(300), 598);
        assert_eq!(counter.query(1), 2);
    }

    #[test]
    fn oldest_seconds_are_evicted_first() {
        let (mut counter, clock) = counter();
        // Second n carries n events.
        for n in 1..=WINDOW_SECS as u64 {
            record_n(&mut counter, n);
            clock.advance_ms(1_000);
            counter.query(1);
        }
        assert_eq!(counter.query(1), 300);

        record_n(&mut counter, 7);
        clock.advance_ms(1_000);
        assert_eq!(counter.query(1), 7);

        let expected: u64 = (2..=300).sum::<u64>() + 7;
        assert_eq!(counter.query(300), expected as i64);
        assert_eq!(counter.history().next(), Some(2));
    }

    #[test]
    fn ring_wraps_across_the_buffer_end() {
        let (mut counter, clock) = counter();
        clock.advance_ms(290_000);
        assert_eq!(counter.query(1), 0);

        record_n(&mut counter, 40);
        clock.advance_ms(20_000);
        assert_eq!(counter.query(20), 40);
        assert_eq!(counter.query(300), 40);
        assert_eq!(counter.history().rev().take(20).collect::<Vec<_>>(), vec![2; 20]);
    }

    #[test]
    fn back_to_back_queries_agree() {
        let (mut counter, clock) = counter();
        record_n(&mut counter, 42);
        clock.advance_ms(1_250);
        let first = counter.query(60);
        let second = counter.query(60);
        assert_eq!(first, second);
        assert_eq!(first, 42);
    }

    #[test]
    fn sub_second_remainder_is_not_carried() {
        let (mut counter, clock) = counter();
        let start = counter.last_rotation();
        clock.advance_ms(1_700);
        counter.record();

        assert_eq!(counter.last_rotation() - start, Duration::from_millis(1_700));
        clock.advance_ms(900);
        counter.record();
        assert_eq!(counter.pending(), 1);
    }

    #[test]
    #[traced_test]
    fn rotation_is_logged() {
        let (mut counter, clock) = counter();
        record_n(&mut counter, 3);
        clock.advance_ms(1_000);
        counter.record();
        assert!(logs_contain("rotated window"));
    }
}
