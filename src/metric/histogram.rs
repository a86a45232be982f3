//! Histograms and the statistical snapshots computed from them.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of most recent samples a histogram keeps for its statistics.
pub const DEFAULT_WINDOW_SIZE: usize = 1028;

/// A distribution of `i64` values.
///
/// The count covers every update; the statistics are computed over a
/// sliding window of the most recent samples.
#[derive(Debug)]
pub struct Histogram {
    count: AtomicU64,
    window: Mutex<VecDeque<i64>>,
    window_size: usize,
}

impl Histogram {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW_SIZE)
    }

    /// Create a histogram keeping the last `size` samples (at least one).
    pub fn with_window(size: usize) -> Self {
        let size = size.max(1);
        Self {
            count: AtomicU64::new(0),
            window: Mutex::new(VecDeque::with_capacity(size)),
            window_size: size,
        }
    }

    pub fn update(&self, value: i64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        let mut window = self.window.lock().unwrap_or_else(|e| e.into_inner());
        if window.len() == self.window_size {
            window.pop_front();
        }
        window.push_back(value);
    }

    /// Total number of values recorded, including ones evicted from the window.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        let window = self.window.lock().unwrap_or_else(|e| e.into_inner());
        HistogramSnapshot::new(window.iter().copied().collect())
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorted samples with statistics over them.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    values: Vec<i64>,
}

impl HistogramSnapshot {
    pub fn new(mut values: Vec<i64>) -> Self {
        values.sort_unstable();
        Self { values }
    }

    /// Value at quantile `q` in `[0, 1]`, interpolated between neighbouring samples.
    ///
    /// Returns `NaN` if `q` is outside `[0, 1]` or not a number; `0.0` for an
    /// empty snapshot.
    pub fn value(&self, q: f64) -> f64 {
        if !(0.0..=1.0).contains(&q) {
            return f64::NAN;
        }
        if self.values.is_empty() {
            return 0.0;
        }

        let n = self.values.len();
        let pos = q * (n + 1) as f64;
        let index = pos as usize;

        if index < 1 {
            return self.values[0] as f64;
        }
        if index >= n {
            return self.values[n - 1] as f64;
        }

        let lower = self.values[index - 1] as f64;
        let upper = self.values[index] as f64;
        lower + (pos - pos.floor()) * (upper - lower)
    }

    pub fn median(&self) -> f64 {
        self.value(0.5)
    }

    pub fn p75(&self) -> f64 {
        self.value(0.75)
    }

    pub fn p95(&self) -> f64 {
        self.value(0.95)
    }

    pub fn p98(&self) -> f64 {
        self.value(0.98)
    }

    pub fn p99(&self) -> f64 {
        self.value(0.99)
    }

    pub fn p999(&self) -> f64 {
        self.value(0.999)
    }

    pub fn min(&self) -> i64 {
        self.values.first().copied().unwrap_or(0)
    }

    pub fn max(&self) -> i64 {
        self.values.last().copied().unwrap_or(0)
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().map(|&v| v as f64).sum::<f64>() / self.values.len() as f64
    }

    /// Sample standard deviation; zero with fewer than two samples.
    pub fn std_dev(&self) -> f64 {
        let n = self.values.len();
        if n <= 1 {
            return 0.0;
        }
        let mean = self.mean();
        let sum: f64 = self
            .values
            .iter()
            .map(|&v| {
                let diff = v as f64 - mean;
                diff * diff
            })
            .sum();
        (sum / (n - 1) as f64).sqrt()
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }
}
