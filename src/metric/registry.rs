//! A named collection of metrics.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use super::{
    Clock, Counter, Gauge, Histogram, Meter, Metric, MetricFilter, MetricKind, Snapshots,
    SystemClock, Timer,
};
use crate::{ReporterError, Result};

/// A cloneable handle to a set of named metrics.
///
/// Names are unique: asking for a counter under a name already holding a
/// meter fails with [`ReporterError::MetricConflict`].
#[derive(Clone)]
pub struct MetricRegistry {
    metrics: Arc<RwLock<BTreeMap<String, Metric>>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Create a registry whose meters and timers read time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            metrics: Arc::new(RwLock::new(BTreeMap::new())),
            clock,
        }
    }

    /// Join name parts with dots, skipping empty parts.
    ///
    /// ```
    /// # use riak_reporter::MetricRegistry;
    /// assert_eq!(MetricRegistry::name("app.Handler", &["requests", ""]), "app.Handler.requests");
    /// ```
    pub fn name(base: &str, parts: &[&str]) -> String {
        std::iter::once(base)
            .chain(parts.iter().copied())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Register a metric under a new name.
    pub fn register(&self, name: impl Into<String>, metric: Metric) -> Result<()> {
        let name = name.into();
        let mut metrics = self.metrics.write().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = metrics.get(&name) {
            return Err(ReporterError::MetricConflict {
                name,
                existing: existing.kind().as_str(),
            });
        }
        metrics.insert(name, metric);
        Ok(())
    }

    /// Register a gauge read through `gauge` on every report.
    pub fn gauge<G>(&self, name: impl Into<String>, gauge: G) -> Result<()>
    where
        G: Gauge + 'static,
    {
        self.register(name, Metric::Gauge(Arc::new(gauge)))
    }

    pub fn counter(&self, name: &str) -> Result<Arc<Counter>> {
        self.get_or_add(name, MetricKind::Counter, || {
            Metric::Counter(Arc::new(Counter::new()))
        })
        .map(|metric| match metric {
            Metric::Counter(c) => c,
            _ => unreachable!("kind checked by get_or_add"),
        })
    }

    pub fn histogram(&self, name: &str) -> Result<Arc<Histogram>> {
        self.get_or_add(name, MetricKind::Histogram, || {
            Metric::Histogram(Arc::new(Histogram::new()))
        })
        .map(|metric| match metric {
            Metric::Histogram(h) => h,
            _ => unreachable!("kind checked by get_or_add"),
        })
    }

    pub fn meter(&self, name: &str) -> Result<Arc<Meter>> {
        let clock = self.clock.clone();
        self.get_or_add(name, MetricKind::Meter, move || {
            Metric::Meter(Arc::new(Meter::with_clock(clock)))
        })
        .map(|metric| match metric {
            Metric::Meter(m) => m,
            _ => unreachable!("kind checked by get_or_add"),
        })
    }

    pub fn timer(&self, name: &str) -> Result<Arc<Timer>> {
        let clock = self.clock.clone();
        self.get_or_add(name, MetricKind::Timer, move || {
            Metric::Timer(Arc::new(Timer::with_clock(clock)))
        })
        .map(|metric| match metric {
            Metric::Timer(t) => t,
            _ => unreachable!("kind checked by get_or_add"),
        })
    }

    /// Remove a metric. Returns whether it was registered.
    pub fn remove(&self, name: &str) -> bool {
        let mut metrics = self.metrics.write().unwrap_or_else(|e| e.into_inner());
        metrics.remove(name).is_some()
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let metrics = self.metrics.read().unwrap_or_else(|e| e.into_inner());
        metrics.keys().cloned().collect()
    }

    /// Capture the metrics matching `filter`, partitioned by kind.
    pub fn snapshot(&self, filter: &dyn MetricFilter) -> Snapshots {
        let metrics = self.metrics.read().unwrap_or_else(|e| e.into_inner());
        let mut snapshots = Snapshots::new();
        for (name, metric) in metrics.iter() {
            if filter.matches(name, metric) {
                snapshots.insert(name.clone(), metric.clone());
            }
        }
        snapshots
    }

    /// Look up `name`, creating it with `make` if absent.
    ///
    /// Uses double-checked locking so lookups of existing metrics only
    /// take the read lock.
    fn get_or_add(
        &self,
        name: &str,
        kind: MetricKind,
        make: impl FnOnce() -> Metric,
    ) -> Result<Metric> {
        let check = |metric: &Metric| {
            if metric.kind() == kind {
                Ok(metric.clone())
            } else {
                Err(ReporterError::MetricConflict {
                    name: name.to_string(),
                    existing: metric.kind().as_str(),
                })
            }
        };

        {
            let metrics = self.metrics.read().unwrap_or_else(|e| e.into_inner());
            if let Some(metric) = metrics.get(name) {
                return check(metric);
            }
        }

        let mut metrics = self.metrics.write().unwrap_or_else(|e| e.into_inner());
        if let Some(metric) = metrics.get(name) {
            return check(metric);
        }
        let metric = make();
        metrics.insert(name.to_string(), metric.clone());
        Ok(metric)
    }
}
