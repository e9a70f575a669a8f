//! Segment timing: start timestamp and duration bookkeeping.
//!
//! A [`Timer`] tracks one segment's wall-clock range in epoch milliseconds.
//! It supports open-ended ranges (started, still running) and closed ranges,
//! and durations may be injected directly instead of measured, which is the
//! primary path for instrumentation that does not want to wait real time.

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock time as milliseconds since the Unix epoch.
///
/// A clock before the epoch reads as 0.
#[must_use]
pub fn epoch_ms_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis().min(u128::from(u64::MAX)) as u64)
}

/// Lifecycle state of a [`Timer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimerState {
    /// Never started; duration reads as 0.
    #[default]
    Pending,
    /// Started and not yet stopped; duration reads as elapsed-so-far.
    Running,
    /// Stopped, either by ending or by direct duration injection.
    Stopped,
}

/// Tracks the start timestamp and duration of a single segment.
///
/// All operations are total functions over valid state: starting twice is a
/// no-op, ending a timer that never ran is a no-op, and arithmetic saturates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timer {
    start_ms: u64,
    duration_ms: u64,
    state: TimerState,
}

impl Timer {
    /// Creates a timer that has not been started.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            start_ms: 0,
            duration_ms: 0,
            state: TimerState::Pending,
        }
    }

    /// Starts the timer at the given timestamp.
    ///
    /// Idempotent: once started, later calls do not move the start.
    pub fn start_at(&mut self, now_ms: u64) {
        if matches!(self.state, TimerState::Pending) {
            self.start_ms = now_ms;
            self.state = TimerState::Running;
        }
    }

    /// Starts the timer at the current wall-clock time.
    pub fn start(&mut self) {
        self.start_at(epoch_ms_now());
    }

    /// Stops the timer at the given timestamp, fixing the duration.
    ///
    /// No-op unless the timer is running.
    pub fn end_at(&mut self, now_ms: u64) {
        if matches!(self.state, TimerState::Running) {
            self.duration_ms = now_ms.saturating_sub(self.start_ms);
            self.state = TimerState::Stopped;
        }
    }

    /// Stops the timer at the current wall-clock time.
    pub fn end(&mut self) {
        self.end_at(epoch_ms_now());
    }

    /// Records the duration-so-far at `now_ms` without stopping the timer.
    ///
    /// No-op unless the timer is running.
    pub fn touch_at(&mut self, now_ms: u64) {
        if matches!(self.state, TimerState::Running) {
            self.duration_ms = now_ms.saturating_sub(self.start_ms);
        }
    }

    /// Records the duration-so-far at the current wall-clock time.
    pub fn touch(&mut self) {
        self.touch_at(epoch_ms_now());
    }

    /// Fixes the duration directly and stops the timer.
    ///
    /// The start timestamp is left as-is; callers that also need to place
    /// the range use [`Timer::set_start_ms`].
    pub fn set_duration_ms(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
        self.state = TimerState::Stopped;
    }

    /// Overrides the start timestamp.
    pub fn set_start_ms(&mut self, start_ms: u64) {
        self.start_ms = start_ms;
        if matches!(self.state, TimerState::Pending) {
            self.state = TimerState::Running;
        }
    }

    /// Returns the start timestamp in epoch milliseconds (0 if never started).
    #[must_use]
    pub const fn start_ms(&self) -> u64 {
        self.start_ms
    }

    /// Returns the duration as observed at `now_ms`.
    ///
    /// Stopped timers report their fixed duration, running timers report
    /// elapsed-so-far, and pending timers report 0.
    #[must_use]
    pub const fn duration_ms_at(&self, now_ms: u64) -> u64 {
        match self.state {
            TimerState::Pending => 0,
            TimerState::Running => now_ms.saturating_sub(self.start_ms),
            TimerState::Stopped => self.duration_ms,
        }
    }

    /// Returns the duration as observed at the current wall-clock time.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms_at(epoch_ms_now())
    }

    /// Returns the `[start, end)` range covered by this timer at `now_ms`.
    #[must_use]
    pub const fn range_ms_at(&self, now_ms: u64) -> (u64, u64) {
        let start = self.start_ms;
        (start, start.saturating_add(self.duration_ms_at(now_ms)))
    }

    /// Returns true if the timer has been started at least once.
    #[must_use]
    pub const fn has_started(&self) -> bool {
        !matches!(self.state, TimerState::Pending)
    }

    /// Returns true if the timer is started and not yet stopped.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running)
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_is_pending() {
        let timer = Timer::new();
        assert_eq!(timer.state(), TimerState::Pending);
        assert!(!timer.has_started());
        assert!(!timer.is_running());
        assert_eq!(timer.start_ms(), 0);
        assert_eq!(timer.duration_ms_at(10_000), 0);
    }

    #[test]
    fn start_is_idempotent() {
        let mut timer = Timer::new();
        timer.start_at(1_000);
        timer.start_at(2_000);
        assert_eq!(timer.start_ms(), 1_000);
        assert!(timer.is_running());
    }

    #[test]
    fn running_reports_elapsed_so_far() {
        let mut timer = Timer::new();
        timer.start_at(1_000);
        assert_eq!(timer.duration_ms_at(1_250), 250);
        assert_eq!(timer.duration_ms_at(1_500), 500);
    }

    #[test]
    fn end_fixes_duration() {
        let mut timer = Timer::new();
        timer.start_at(1_000);
        timer.end_at(1_042);
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.duration_ms_at(9_999), 42);

        // Ending again does not move the duration.
        timer.end_at(5_000);
        assert_eq!(timer.duration_ms_at(9_999), 42);
    }

    #[test]
    fn end_without_start_is_noop() {
        let mut timer = Timer::new();
        timer.end_at(5_000);
        assert_eq!(timer.state(), TimerState::Pending);
        assert_eq!(timer.duration_ms_at(9_999), 0);
    }

    #[test]
    fn touch_records_without_stopping() {
        let mut timer = Timer::new();
        timer.start_at(1_000);
        timer.touch_at(1_300);
        assert!(timer.is_running());
        // A stopped read would report the touched value; a running read
        // still tracks the clock.
        assert_eq!(timer.duration_ms_at(1_700), 700);
    }

    #[test]
    fn set_duration_stops_the_timer() {
        let mut timer = Timer::new();
        timer.set_duration_ms(42);
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.duration_ms_at(0), 42);
    }

    #[test]
    fn set_start_marks_running() {
        let mut timer = Timer::new();
        timer.set_start_ms(2_000);
        assert!(timer.is_running());
        assert_eq!(timer.start_ms(), 2_000);
    }

    #[test]
    fn end_before_start_saturates() {
        let mut timer = Timer::new();
        timer.start_at(5_000);
        timer.end_at(4_000);
        assert_eq!(timer.duration_ms_at(0), 0);
    }

    #[test]
    fn range_covers_start_plus_duration() {
        let mut timer = Timer::new();
        timer.set_start_ms(1_000);
        timer.set_duration_ms(250);
        assert_eq!(timer.range_ms_at(0), (1_000, 1_250));
    }
}
