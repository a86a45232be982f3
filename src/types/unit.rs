//! Time units for rate and duration conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ReporterError;

/// A unit of time, used to express rates (events per unit) and durations.
///
/// Deserializes through [`FromStr`], so config files accept the short
/// forms (`ms`, `s`, `m`, ...) as well as the full names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Length of one unit in nanoseconds.
    pub const fn as_nanos(self) -> u64 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60 * 1_000_000_000,
            TimeUnit::Hours => 3_600 * 1_000_000_000,
            TimeUnit::Days => 86_400 * 1_000_000_000,
        }
    }

    /// Length of one unit in (fractional) seconds.
    pub fn as_secs_f64(self) -> f64 {
        self.as_nanos() as f64 / 1e9
    }

    /// Convert a per-second rate into a rate per this unit.
    pub fn convert_rate(self, per_second: f64) -> f64 {
        per_second * self.as_secs_f64()
    }

    /// Convert a duration in nanoseconds into this unit.
    pub fn convert_duration(self, nanos: f64) -> f64 {
        nanos / self.as_nanos() as f64
    }

    /// Plural lowercase name, e.g. `"milliseconds"`.
    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "nanoseconds",
            TimeUnit::Microseconds => "microseconds",
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
        }
    }

    /// Singular name used in rate labels, e.g. `"second"` in `"events/second"`.
    pub fn singular(self) -> &'static str {
        let name = self.name();
        &name[..name.len() - 1]
    }

    /// Rate label such as `"events/second"`.
    pub fn rate_label(self, what: &str) -> String {
        format!("{what}/{}", self.singular())
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeUnit {
    type Err = ReporterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ns" | "nanoseconds" => Ok(TimeUnit::Nanoseconds),
            "us" | "microseconds" => Ok(TimeUnit::Microseconds),
            "ms" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "s" | "seconds" => Ok(TimeUnit::Seconds),
            "m" | "minutes" => Ok(TimeUnit::Minutes),
            "h" | "hours" => Ok(TimeUnit::Hours),
            "d" | "days" => Ok(TimeUnit::Days),
            other => Err(ReporterError::Configuration(format!(
                "unknown time unit: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for TimeUnit {
    type Error = ReporterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
