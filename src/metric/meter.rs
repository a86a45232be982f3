//! Meters: event counts with exponentially weighted moving average rates.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::clock::{Clock, SystemClock};

/// Interval at which the moving averages are decayed.
const TICK_INTERVAL_NANOS: u64 = 5_000_000_000;
const TICK_INTERVAL_SECS: f64 = 5.0;

/// An exponentially weighted moving average of a per-second rate.
#[derive(Debug)]
pub(crate) struct Ewma {
    alpha: f64,
    uncounted: AtomicU64,
    initialized: AtomicBool,
    rate: Mutex<f64>,
}

impl Ewma {
    /// A moving average over `minutes` minutes, ticked every five seconds.
    pub(crate) fn over_minutes(minutes: f64) -> Self {
        Self {
            alpha: 1.0 - (-TICK_INTERVAL_SECS / 60.0 / minutes).exp(),
            uncounted: AtomicU64::new(0),
            initialized: AtomicBool::new(false),
            rate: Mutex::new(0.0),
        }
    }

    pub(crate) fn update(&self, n: u64) {
        self.uncounted.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn tick(&self) {
        let count = self.uncounted.swap(0, Ordering::Relaxed);
        let instant_rate = count as f64 / TICK_INTERVAL_SECS;
        let mut rate = self.rate.lock().unwrap_or_else(|e| e.into_inner());
        if self.initialized.swap(true, Ordering::Relaxed) {
            *rate += self.alpha * (instant_rate - *rate);
        } else {
            *rate = instant_rate;
        }
    }

    /// Current rate in events per second.
    pub(crate) fn rate(&self) -> f64 {
        *self.rate.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Measures the rate at which events occur.
pub struct Meter {
    count: AtomicU64,
    start_tick: u64,
    last_tick: AtomicU64,
    m1: Ewma,
    m5: Ewma,
    m15: Ewma,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Meter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Meter")
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}

impl Meter {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let start_tick = clock.tick();
        Self {
            count: AtomicU64::new(0),
            start_tick,
            last_tick: AtomicU64::new(start_tick),
            m1: Ewma::over_minutes(1.0),
            m5: Ewma::over_minutes(5.0),
            m15: Ewma::over_minutes(15.0),
            clock,
        }
    }

    pub fn mark(&self) {
        self.mark_n(1);
    }

    pub fn mark_n(&self, n: u64) {
        self.tick_if_necessary();
        self.count.fetch_add(n, Ordering::Relaxed);
        self.m1.update(n);
        self.m5.update(n);
        self.m15.update(n);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Mean events per second since the meter was created.
    pub fn mean_rate(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        let elapsed = self.clock.tick().saturating_sub(self.start_tick);
        if elapsed == 0 {
            return 0.0;
        }
        count as f64 / (elapsed as f64 / 1e9)
    }

    pub fn one_minute_rate(&self) -> f64 {
        self.tick_if_necessary();
        self.m1.rate()
    }

    pub fn five_minute_rate(&self) -> f64 {
        self.tick_if_necessary();
        self.m5.rate()
    }

    pub fn fifteen_minute_rate(&self) -> f64 {
        self.tick_if_necessary();
        self.m15.rate()
    }

    fn tick_if_necessary(&self) {
        let old_tick = self.last_tick.load(Ordering::Acquire);
        let new_tick = self.clock.tick();
        let age = new_tick.saturating_sub(old_tick);
        if age <= TICK_INTERVAL_NANOS {
            return;
        }

        let new_interval_start = new_tick - age % TICK_INTERVAL_NANOS;
        if self
            .last_tick
            .compare_exchange(old_tick, new_interval_start, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            for _ in 0..age / TICK_INTERVAL_NANOS {
                self.m1.tick();
                self.m5.tick();
                self.m15.tick();
            }
        }
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::metric::ManualClock;

    #[test]
    fn one_minute_ewma_after_first_tick() {
        let ewma = Ewma::over_minutes(1.0);
        ewma.update(3);
        ewma.tick();
        assert!((ewma.rate() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn one_minute_ewma_decays() {
        let ewma = Ewma::over_minutes(1.0);
        ewma.update(3);
        ewma.tick();
        for _ in 0..12 {
            ewma.tick();
        }
        assert!((ewma.rate() - 0.22072766).abs() < 1e-6);
    }

    #[test]
    fn marks_events_and_reports_rates() {
        let clock = Arc::new(ManualClock::new());
        let meter = Meter::with_clock(clock.clone());

        meter.mark();
        clock.advance(Duration::from_secs(10));
        meter.mark_n(2);

        assert_eq!(meter.count(), 3);
        assert!((meter.mean_rate() - 0.3).abs() < 1e-9);
        assert!(meter.one_minute_rate() > 0.0);
        assert!(meter.five_minute_rate() > 0.0);
        assert!(meter.fifteen_minute_rate() > 0.0);
    }

    #[test]
    fn unused_meter_reports_zero() {
        let meter = Meter::with_clock(Arc::new(ManualClock::new()));
        assert_eq!(meter.count(), 0);
        assert_eq!(meter.mean_rate(), 0.0);
        assert_eq!(meter.one_minute_rate(), 0.0);
    }
}
