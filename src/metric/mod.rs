//! In-process metric types and the registry that snapshots them.
//!
//! The reporter only ever reads [`Snapshots`]; a [`MetricRegistry`] is the
//! usual way to produce them, but any code can assemble one by hand.

mod clock;
mod counter;
mod filter;
mod gauge;
mod histogram;
mod meter;
mod registry;
mod timer;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use clock::{Clock, ManualClock, SystemClock};
pub use counter::Counter;
pub use filter::{AcceptAll, MetricFilter, Prefix, prefix};
pub use gauge::{Gauge, GaugeValue};
pub use histogram::{DEFAULT_WINDOW_SIZE, Histogram, HistogramSnapshot};
pub use meter::Meter;
pub use registry::MetricRegistry;
pub use timer::{Timer, TimerContext};

/// The closed set of metric kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Gauge,
    Counter,
    Histogram,
    Meter,
    Timer,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
            MetricKind::Meter => "meter",
            MetricKind::Timer => "timer",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shared handle to a metric of any kind.
#[derive(Clone)]
pub enum Metric {
    Gauge(Arc<dyn Gauge>),
    Counter(Arc<Counter>),
    Histogram(Arc<Histogram>),
    Meter(Arc<Meter>),
    Timer(Arc<Timer>),
}

impl Metric {
    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Gauge(_) => MetricKind::Gauge,
            Metric::Counter(_) => MetricKind::Counter,
            Metric::Histogram(_) => MetricKind::Histogram,
            Metric::Meter(_) => MetricKind::Meter,
            Metric::Timer(_) => MetricKind::Timer,
        }
    }
}

impl std::fmt::Debug for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Metric::{:?}", self.kind())
    }
}

/// Name-sorted metrics of every kind, captured for one report cycle.
#[derive(Clone, Default)]
pub struct Snapshots {
    pub gauges: BTreeMap<String, Arc<dyn Gauge>>,
    pub counters: BTreeMap<String, Arc<Counter>>,
    pub histograms: BTreeMap<String, Arc<Histogram>>,
    pub meters: BTreeMap<String, Arc<Meter>>,
    pub timers: BTreeMap<String, Arc<Timer>>,
}

impl Snapshots {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a metric under the map for its kind, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, metric: Metric) {
        let name = name.into();
        match metric {
            Metric::Gauge(g) => {
                self.gauges.insert(name, g);
            }
            Metric::Counter(c) => {
                self.counters.insert(name, c);
            }
            Metric::Histogram(h) => {
                self.histograms.insert(name, h);
            }
            Metric::Meter(m) => {
                self.meters.insert(name, m);
            }
            Metric::Timer(t) => {
                self.timers.insert(name, t);
            }
        }
    }

    /// Total entries across all kinds.
    pub fn len(&self) -> usize {
        self.gauges.len()
            + self.counters.len()
            + self.histograms.len()
            + self.meters.len()
            + self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Snapshots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshots")
            .field("gauges", &self.gauges.keys().collect::<Vec<_>>())
            .field("counters", &self.counters.keys().collect::<Vec<_>>())
            .field("histograms", &self.histograms.keys().collect::<Vec<_>>())
            .field("meters", &self.meters.keys().collect::<Vec<_>>())
            .field("timers", &self.timers.keys().collect::<Vec<_>>())
            .finish()
    }
}
