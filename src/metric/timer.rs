//! Timers: a histogram of durations plus a meter of calls.

use std::sync::Arc;
use std::time::Duration;

use super::clock::{Clock, SystemClock};
use super::histogram::{Histogram, HistogramSnapshot};
use super::meter::Meter;

/// Times events, recording durations in nanoseconds.
#[derive(Debug)]
pub struct Timer {
    histogram: Histogram,
    meter: Meter,
    clock: ClockHandle,
}

struct ClockHandle(Arc<dyn Clock>);

impl std::fmt::Debug for ClockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Clock")
    }
}

impl Timer {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            histogram: Histogram::new(),
            meter: Meter::with_clock(clock.clone()),
            clock: ClockHandle(clock),
        }
    }

    /// Record one call that took `duration`.
    pub fn update(&self, duration: Duration) {
        let nanos = i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX);
        self.histogram.update(nanos);
        self.meter.mark();
    }

    /// Start timing a call. The duration is recorded when the returned
    /// context is stopped or dropped.
    pub fn time(&self) -> TimerContext<'_> {
        TimerContext {
            timer: self,
            start: self.clock.0.tick(),
            stopped: false,
        }
    }

    /// Time a closure.
    pub fn time_fn<T>(&self, f: impl FnOnce() -> T) -> T {
        let _ctx = self.time();
        f()
    }

    pub fn count(&self) -> u64 {
        self.histogram.count()
    }

    /// Duration statistics, in nanoseconds.
    pub fn snapshot(&self) -> HistogramSnapshot {
        self.histogram.snapshot()
    }

    pub fn mean_rate(&self) -> f64 {
        self.meter.mean_rate()
    }

    pub fn one_minute_rate(&self) -> f64 {
        self.meter.one_minute_rate()
    }

    pub fn five_minute_rate(&self) -> f64 {
        self.meter.five_minute_rate()
    }

    pub fn fifteen_minute_rate(&self) -> f64 {
        self.meter.fifteen_minute_rate()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// An in-flight timing started by [`Timer::time`].
pub struct TimerContext<'a> {
    timer: &'a Timer,
    start: u64,
    stopped: bool,
}

impl TimerContext<'_> {
    /// Record the elapsed time and return it.
    pub fn stop(mut self) -> Duration {
        self.record()
    }

    fn record(&mut self) -> Duration {
        self.stopped = true;
        let elapsed = self.timer.clock.0.tick().saturating_sub(self.start);
        let duration = Duration::from_nanos(elapsed);
        self.timer.update(duration);
        duration
    }
}

impl Drop for TimerContext<'_> {
    fn drop(&mut self) {
        if !self.stopped {
            self.record();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::ManualClock;

    #[test]
    fn context_records_elapsed_clock_time() {
        let clock = Arc::new(ManualClock::new());
        let timer = Timer::with_clock(clock.clone());

        let ctx = timer.time();
        clock.advance(Duration::from_millis(20));
        assert_eq!(ctx.stop(), Duration::from_millis(20));

        {
            let _ctx = timer.time();
            clock.advance(Duration::from_millis(40));
        }

        assert_eq!(timer.count(), 2);
        let snapshot = timer.snapshot();
        assert_eq!(snapshot.min(), 20_000_000);
        assert_eq!(snapshot.max(), 40_000_000);
    }

    #[test]
    fn update_marks_the_meter() {
        let timer = Timer::with_clock(Arc::new(ManualClock::new()));
        timer.update(Duration::from_millis(5));
        timer.update(Duration::from_millis(15));
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.snapshot().mean(), 10_000_000.0);
    }
}
