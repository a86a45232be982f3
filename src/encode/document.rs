//! Stored document shapes, one per metric kind.
//!
//! Field names are the stored schema; every document decodes back into the
//! struct that produced it.

use serde::{Deserialize, Serialize};

use crate::metric::GaugeValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeDocument {
    pub value: GaugeValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterDocument {
    pub count: i64,
}

/// Distribution statistics shared by histograms and timers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionFields {
    pub max: f64,
    pub mean: f64,
    pub min: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub p98: f64,
    pub p99: f64,
    pub p999: f64,
    pub stddev: f64,
}

/// Moving-average rates shared by meters and timers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateFields {
    pub m15_rate: f64,
    pub m1_rate: f64,
    pub m5_rate: f64,
    pub mean_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramDocument {
    pub count: u64,
    #[serde(flatten)]
    pub distribution: DistributionFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterDocument {
    pub count: u64,
    #[serde(flatten)]
    pub rates: RateFields,
    /// Rate unit label, e.g. `"events/second"`.
    pub units: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerDocument {
    pub count: u64,
    #[serde(flatten)]
    pub distribution: DistributionFields,
    #[serde(flatten)]
    pub rates: RateFields,
    /// Duration unit name, e.g. `"milliseconds"`.
    pub duration_units: String,
    /// Rate unit label, e.g. `"calls/second"`.
    pub rate_units: String,
}
