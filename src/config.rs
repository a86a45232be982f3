//! Configuration file loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. explicit path (e.g. the `--config` flag)
//! 2. `~/.riak-reporter/config.toml` (user)
//! 3. `/etc/riak-reporter/config.toml` (system)
//!
//! ```toml
//! [riak]
//! host = "10.0.0.5"
//! port = 8098
//! bucket = "app-metrics"
//!
//! [report]
//! interval_secs = 30
//! rate_unit = "minutes"
//! duration_unit = "milliseconds"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::reporter::{DEFAULT_BUCKET, DEFAULT_HOST, DEFAULT_PORT, RiakReporterBuilder};
use crate::types::{Locale, TimeUnit, TimeZone};
use crate::{ReporterError, Result};

/// Reporter configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub riak: RiakConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Riak connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RiakConfig {
    /// Riak host (default: 127.0.0.1).
    #[serde(default = "default_host")]
    pub host: String,
    /// Riak port (default: 8087).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bucket for metric documents (default: "metrics").
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

impl Default for RiakConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bucket: default_bucket(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

/// Reporting schedule and formatting.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Seconds between report cycles (default: 60).
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Unit rates are expressed in (default: seconds).
    #[serde(default = "default_rate_unit")]
    pub rate_unit: TimeUnit,
    /// Unit durations are expressed in (default: milliseconds).
    #[serde(default = "default_duration_unit")]
    pub duration_unit: TimeUnit,
    /// Locale tag such as `en-US` (default: platform locale).
    #[serde(default)]
    pub locale: Option<String>,
    /// Render timestamps in UTC instead of the platform zone.
    #[serde(default)]
    pub utc: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            rate_unit: default_rate_unit(),
            duration_unit: default_duration_unit(),
            locale: None,
            utc: false,
        }
    }
}

fn default_interval() -> u64 {
    60
}

fn default_rate_unit() -> TimeUnit {
    TimeUnit::Seconds
}

fn default_duration_unit() -> TimeUnit {
    TimeUnit::Milliseconds
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.riak-reporter/config.toml`
    /// 3. `/etc/riak-reporter/config.toml`
    ///
    /// With no explicit path and no file found, the defaults are used.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from one file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ReporterError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ReporterError::Configuration(msg) => ReporterError::Configuration(format!(
                "Failed to parse config file {path:?}: {msg}"
            )),
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ReporterError::Configuration(e.to_string()))?;
        if config.report.interval_secs == 0 {
            return Err(ReporterError::Configuration(
                "report.interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(ReporterError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".riak-reporter").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/riak-reporter/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Time between report cycles.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.report.interval_secs)
    }

    /// Apply this configuration onto a reporter builder.
    pub fn apply(&self, builder: RiakReporterBuilder) -> RiakReporterBuilder {
        let mut builder = builder
            .host(&self.riak.host)
            .port(self.riak.port)
            .bucket(&self.riak.bucket)
            .convert_rates_to(self.report.rate_unit)
            .convert_durations_to(self.report.duration_unit);

        if let Some(ref locale) = self.report.locale {
            builder = builder.formatted_for(Locale::new(locale));
        }
        if self.report.utc {
            builder = builder.time_zone(TimeZone::Utc);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.riak.host, "127.0.0.1");
        assert_eq!(config.riak.port, 8087);
        assert_eq!(config.riak.bucket, "metrics");
        assert_eq!(config.interval(), Duration::from_secs(60));
        assert_eq!(config.report.rate_unit, TimeUnit::Seconds);
        assert_eq!(config.report.duration_unit, TimeUnit::Milliseconds);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = Config::from_toml("[report]\ninterval_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("interval_secs"));
    }

    #[test]
    fn unknown_unit_is_rejected() {
        assert!(Config::from_toml("[report]\nrate_unit = \"fortnights\"\n").is_err());
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/riak-reporter.toml"))).unwrap_err();
        assert!(matches!(err, ReporterError::Configuration(_)));
    }
}
