//! The Riak reporter: encodes every metric and writes it under its name.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::ScheduledReporter;
use super::builder::{ReporterSettings, RiakReporterBuilder};
use crate::encode::MetricEncoder;
use crate::metric::{Clock, MetricFilter, MetricKind, MetricRegistry, Snapshots};
use crate::store::KeyValueStore;
use crate::{Result, telemetry};

/// Exports metrics to Riak, one document per metric name.
///
/// Built with [`RiakReporter::builder`]. Every entry of a report is
/// written independently: a metric that fails to encode or store is
/// logged, counted in [`telemetry::DROPPED_TOTAL`] and skipped, and the
/// rest of the batch carries on. Nothing is retried; the next cycle writes
/// the metric's then-current value.
pub struct RiakReporter {
    pub(super) store: Arc<dyn KeyValueStore>,
    pub(super) encoder: MetricEncoder,
    pub(super) registry: Option<MetricRegistry>,
    pub(super) filter: Arc<dyn MetricFilter>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) settings: ReporterSettings,
}

impl std::fmt::Debug for RiakReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiakReporter")
            .field("settings", &self.settings)
            .field("namespace", &self.store.namespace())
            .finish_non_exhaustive()
    }
}

/// Counts of one report cycle.
#[derive(Debug, Default, Clone, Copy)]
struct CycleStats {
    written: usize,
    dropped: usize,
}

impl RiakReporter {
    /// Create a new builder for configuring the reporter.
    pub fn builder() -> RiakReporterBuilder {
        RiakReporterBuilder::new()
    }

    /// Create a builder that reports `registry`.
    pub fn for_registry(registry: MetricRegistry) -> RiakReporterBuilder {
        RiakReporterBuilder::new().registry(registry)
    }

    /// The options this reporter was built with.
    pub fn settings(&self) -> &ReporterSettings {
        &self.settings
    }

    pub fn encoder(&self) -> &MetricEncoder {
        &self.encoder
    }

    /// The bucket all documents are written into.
    pub fn namespace(&self) -> &str {
        self.store.namespace()
    }

    /// Write one encoded metric. Failures are logged and counted, never returned.
    async fn store_metric(
        &self,
        stats: &mut CycleStats,
        key: &str,
        kind: MetricKind,
        document: Result<String>,
    ) {
        let result = match document {
            Ok(document) => self.store.put(key, &document).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                stats.written += 1;
                metrics::counter!(telemetry::WRITES_TOTAL, "kind" => kind.as_str()).increment(1);
            }
            Err(e) => {
                stats.dropped += 1;
                warn!(
                    key,
                    kind = kind.as_str(),
                    bucket = self.store.namespace(),
                    error = %e,
                    "dropped metric"
                );
                metrics::counter!(telemetry::DROPPED_TOTAL,
                    "kind" => kind.as_str(),
                    "reason" => e.kind(),
                )
                .increment(1);
            }
        }
    }
}

#[async_trait]
impl ScheduledReporter for RiakReporter {
    fn name(&self) -> &str {
        "riak-reporter"
    }

    fn registry(&self) -> Option<&MetricRegistry> {
        self.registry.as_ref()
    }

    fn filter(&self) -> &dyn MetricFilter {
        self.filter.as_ref()
    }

    async fn report_snapshots(&self, snapshots: &Snapshots) {
        let started = Instant::now();
        let at = self.settings.time_zone.format(self.clock.time());
        debug!(
            at = %at,
            locale = %self.settings.locale,
            entries = snapshots.len(),
            bucket = self.store.namespace(),
            "report cycle starting"
        );

        let mut stats = CycleStats::default();
        let encoder = &self.encoder;

        for (name, gauge) in &snapshots.gauges {
            let document = encoder.encode_gauge(gauge.as_ref());
            self.store_metric(&mut stats, name, MetricKind::Gauge, document)
                .await;
        }
        for (name, counter) in &snapshots.counters {
            let document = encoder.encode_counter(counter);
            self.store_metric(&mut stats, name, MetricKind::Counter, document)
                .await;
        }
        for (name, histogram) in &snapshots.histograms {
            let document = encoder.encode_histogram(histogram);
            self.store_metric(&mut stats, name, MetricKind::Histogram, document)
                .await;
        }
        for (name, meter) in &snapshots.meters {
            let document = encoder.encode_meter(meter);
            self.store_metric(&mut stats, name, MetricKind::Meter, document)
                .await;
        }
        for (name, timer) in &snapshots.timers {
            let document = encoder.encode_timer(timer);
            self.store_metric(&mut stats, name, MetricKind::Timer, document)
                .await;
        }

        metrics::counter!(telemetry::REPORTS_TOTAL).increment(1);
        metrics::histogram!(telemetry::REPORT_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        debug!(
            written = stats.written,
            dropped = stats.dropped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "report cycle finished"
        );
    }
}
