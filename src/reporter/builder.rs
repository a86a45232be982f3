//! Builder for configuring reporter instances

use std::sync::Arc;

use tracing::info;

use super::RiakReporter;
use crate::Result;
use crate::encode::MetricEncoder;
use crate::metric::{AcceptAll, Clock, MetricFilter, MetricRegistry, SystemClock};
use crate::store::{IdentityNaming, KeyValueStore, NamingStrategy, RiakStore};
use crate::types::{Locale, TimeUnit, TimeZone};

/// Default Riak host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default Riak port.
pub const DEFAULT_PORT: u16 = 8087;
/// Default bucket for metric documents.
pub const DEFAULT_BUCKET: &str = "metrics";

/// The plain-value options a reporter was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterSettings {
    pub host: String,
    pub port: u16,
    /// Bucket after the naming strategy has been applied.
    pub bucket: String,
    pub locale: Locale,
    pub time_zone: TimeZone,
    pub rate_unit: TimeUnit,
    pub duration_unit: TimeUnit,
}

/// Builder for configuring reporter instances.
///
/// Every setter is infallible; [`build`](Self::build) is the only step that
/// can fail, and it either returns a connected reporter or nothing.
pub struct RiakReporterBuilder {
    host: String,
    port: u16,
    bucket: String,
    naming: Arc<dyn NamingStrategy>,
    locale: Locale,
    clock: Arc<dyn Clock>,
    time_zone: TimeZone,
    rate_unit: TimeUnit,
    duration_unit: TimeUnit,
    filter: Arc<dyn MetricFilter>,
    registry: Option<MetricRegistry>,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl Default for RiakReporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RiakReporterBuilder {
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            bucket: DEFAULT_BUCKET.to_string(),
            naming: Arc::new(IdentityNaming),
            locale: Locale::system(),
            clock: Arc::new(SystemClock::new()),
            time_zone: TimeZone::default(),
            rate_unit: TimeUnit::Seconds,
            duration_unit: TimeUnit::Milliseconds,
            filter: Arc::new(AcceptAll),
            registry: None,
            store: None,
        }
    }

    /// Write to the given Riak host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Use the given port on the Riak host.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Use the given bucket for metric documents.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Derive the bucket name from the configured one.
    ///
    /// Applied once in [`build`](Self::build); the resolved bucket is used
    /// for every write.
    pub fn bucket_namer(mut self, namer: impl NamingStrategy + 'static) -> Self {
        self.naming = Arc::new(namer);
        self
    }

    /// Locale attached to report log lines.
    pub fn formatted_for(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Time zone used for report timestamps.
    pub fn time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Use the given clock for report timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Convert rates to the given time unit.
    pub fn convert_rates_to(mut self, unit: TimeUnit) -> Self {
        self.rate_unit = unit;
        self
    }

    /// Convert durations to the given time unit.
    pub fn convert_durations_to(mut self, unit: TimeUnit) -> Self {
        self.duration_unit = unit;
        self
    }

    /// Only report metrics which match the given filter.
    pub fn filter(mut self, filter: impl MetricFilter + 'static) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    /// Registry polled by [`ScheduledReporter::report`](crate::ScheduledReporter::report).
    pub fn registry(mut self, registry: MetricRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Write through an existing store instead of connecting to Riak.
    ///
    /// Host, port and bucket are then informational only.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// The settings a reporter built now would carry.
    pub fn settings(&self) -> ReporterSettings {
        ReporterSettings {
            host: self.host.clone(),
            port: self.port,
            bucket: self.naming.name(&self.bucket),
            locale: self.locale.clone(),
            time_zone: self.time_zone,
            rate_unit: self.rate_unit,
            duration_unit: self.duration_unit,
        }
    }

    /// Build the reporter, connecting to Riak unless a store was supplied.
    ///
    /// Fails with [`ReporterError::Connection`](crate::ReporterError::Connection)
    /// if the node cannot be reached or the bucket cannot be resolved.
    pub async fn build(self) -> Result<RiakReporter> {
        let settings = self.settings();
        if settings.bucket != self.bucket {
            info!(seed = %self.bucket, bucket = %settings.bucket, "bucket renamed by naming strategy");
        }

        let store: Arc<dyn KeyValueStore> = match self.store {
            Some(store) => store,
            None => Arc::new(
                RiakStore::connect(&settings.host, settings.port, settings.bucket.clone()).await?,
            ),
        };

        Ok(RiakReporter {
            store,
            encoder: MetricEncoder::new(settings.rate_unit, settings.duration_unit),
            registry: self.registry,
            filter: self.filter,
            clock: self.clock,
            settings,
        })
    }
}
