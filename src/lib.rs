//! riak-reporter - scheduled metrics export to Riak
//!
//! This crate drains an in-process [`MetricRegistry`] on a fixed schedule
//! and stores every metric in a Riak bucket as a JSON document keyed by the
//! metric's name. Each kind has a fixed document shape:
//!
//! | kind      | document fields |
//! |-----------|-----------------|
//! | gauge     | `value` |
//! | counter   | `count` |
//! | histogram | `count`, `min`, `max`, `mean`, `stddev`, `p50` … `p999` |
//! | meter     | `count`, `mean_rate`, `m1_rate`, `m5_rate`, `m15_rate`, `units` |
//! | timer     | histogram fields in the duration unit + meter rates, `duration_units`, `rate_units` |
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use riak_reporter::{MetricRegistry, RiakReporter, ScheduledReporter, TimeUnit};
//!
//! #[tokio::main]
//! async fn main() -> riak_reporter::Result<()> {
//!     let registry = MetricRegistry::new();
//!     let requests = registry.meter("app.requests")?;
//!
//!     let reporter = RiakReporter::for_registry(registry.clone())
//!         .host("10.0.0.5")
//!         .port(8098)
//!         .bucket("app-metrics")
//!         .convert_rates_to(TimeUnit::Minutes)
//!         .build()
//!         .await?;
//!
//!     let handle = std::sync::Arc::new(reporter).start(Duration::from_secs(60))?;
//!     requests.mark();
//!     // ...
//!     handle.stop().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod encode;
pub mod error;
pub mod metric;
pub mod reporter;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use encode::MetricEncoder;
pub use error::{ReporterError, Result};
pub use metric::{
    AcceptAll, Clock, Counter, Gauge, GaugeValue, Histogram, HistogramSnapshot, ManualClock,
    Meter, Metric, MetricFilter, MetricKind, MetricRegistry, Snapshots, SystemClock, Timer,
};
pub use reporter::{
    ReporterHandle, ReporterSettings, RiakReporter, RiakReporterBuilder, ScheduledReporter,
};
pub use store::{IdentityNaming, KeyValueStore, NamingStrategy, RiakStore};
pub use types::{Locale, TimeUnit, TimeZone};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
