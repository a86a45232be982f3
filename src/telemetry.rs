//! Telemetry metric name constants.
//!
//! Metrics about the reporter itself, emitted through the `metrics` facade.
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `riak_reporter_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `kind`: metric kind being exported: "gauge", "counter", "histogram",
//!   "meter" or "timer"
//! - `reason`: why an entry was dropped: "serialization" or "storage_write"

/// Total documents successfully written to the store.
///
/// Labels: `kind`.
pub const WRITES_TOTAL: &str = "riak_reporter_writes_total";

/// Total entries dropped during a report cycle.
///
/// Labels: `kind`, `reason`.
pub const DROPPED_TOTAL: &str = "riak_reporter_dropped_total";

/// Total report cycles run.
pub const REPORTS_TOTAL: &str = "riak_reporter_reports_total";

/// Wall time of one report cycle in seconds.
pub const REPORT_DURATION_SECONDS: &str = "riak_reporter_report_duration_seconds";
