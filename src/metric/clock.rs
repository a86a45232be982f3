//! Time sources for meters, timers and report timestamps.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A source of monotonic ticks and wall-clock time.
pub trait Clock: Send + Sync {
    /// Monotonic time in nanoseconds. Only differences are meaningful.
    fn tick(&self) -> u64;

    /// Wall-clock time in milliseconds since the Unix epoch.
    fn time(&self) -> u64;
}

/// The default clock: `Instant` for ticks, `SystemTime` for wall time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn tick(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    fn time(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to.
///
/// Ticks and wall time advance together; wall time starts at the epoch
/// offset given to [`ManualClock::starting_at`].
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
    epoch_millis: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the wall clock at `epoch_millis`.
    pub fn starting_at(epoch_millis: u64) -> Self {
        Self {
            nanos: AtomicU64::new(0),
            epoch_millis,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn tick(&self) -> u64 {
        self.nanos.load(Ordering::SeqCst)
    }

    fn time(&self) -> u64 {
        self.epoch_millis + self.tick() / 1_000_000
    }
}
