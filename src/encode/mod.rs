//! Metric → JSON document encoding.
//!
//! [`MetricEncoder`] maps each metric kind onto its document shape (see
//! [`document`]), converting rates and durations into the units chosen at
//! build time. A statistic that is not a finite number fails the whole
//! document with [`ReporterError::Serialization`].

pub mod document;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::metric::{
    Counter, Gauge, GaugeValue, Histogram, HistogramSnapshot, Meter, Metric, Timer,
};
use crate::types::TimeUnit;
use crate::{ReporterError, Result};

use document::{
    CounterDocument, DistributionFields, GaugeDocument, HistogramDocument, MeterDocument,
    RateFields, TimerDocument,
};

/// Encodes metrics into JSON documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricEncoder {
    rate_unit: TimeUnit,
    duration_unit: TimeUnit,
}

impl Default for MetricEncoder {
    fn default() -> Self {
        Self::new(TimeUnit::Seconds, TimeUnit::Milliseconds)
    }
}

impl MetricEncoder {
    pub fn new(rate_unit: TimeUnit, duration_unit: TimeUnit) -> Self {
        Self {
            rate_unit,
            duration_unit,
        }
    }

    pub fn rate_unit(&self) -> TimeUnit {
        self.rate_unit
    }

    pub fn duration_unit(&self) -> TimeUnit {
        self.duration_unit
    }

    /// Encode any metric.
    pub fn encode(&self, metric: &Metric) -> Result<String> {
        match metric {
            Metric::Gauge(g) => self.encode_gauge(g.as_ref()),
            Metric::Counter(c) => self.encode_counter(c),
            Metric::Histogram(h) => self.encode_histogram(h),
            Metric::Meter(m) => self.encode_meter(m),
            Metric::Timer(t) => self.encode_timer(t),
        }
    }

    /// A gauge that panics while being read fails like an unencodable one.
    pub fn encode_gauge(&self, gauge: &dyn Gauge) -> Result<String> {
        let value = panic::catch_unwind(AssertUnwindSafe(|| gauge.value())).map_err(|payload| {
            let message = panic_message(payload.as_ref());
            ReporterError::Serialization(format!("gauge panicked: {message}"))
        })?;
        if let GaugeValue::Float(v) = value {
            finite("value", v)?;
        }
        to_json(&GaugeDocument { value })
    }

    pub fn encode_counter(&self, counter: &Counter) -> Result<String> {
        to_json(&CounterDocument {
            count: counter.count(),
        })
    }

    /// Histogram statistics are written in the units the samples were recorded in.
    pub fn encode_histogram(&self, histogram: &Histogram) -> Result<String> {
        let snapshot = histogram.snapshot();
        to_json(&HistogramDocument {
            count: histogram.count(),
            distribution: distribution(&snapshot, |v| v)?,
        })
    }

    pub fn encode_meter(&self, meter: &Meter) -> Result<String> {
        to_json(&MeterDocument {
            count: meter.count(),
            rates: self.rates(
                meter.mean_rate(),
                meter.one_minute_rate(),
                meter.five_minute_rate(),
                meter.fifteen_minute_rate(),
            )?,
            units: self.rate_unit.rate_label("events"),
        })
    }

    pub fn encode_timer(&self, timer: &Timer) -> Result<String> {
        let snapshot = timer.snapshot();
        let duration_unit = self.duration_unit;
        to_json(&TimerDocument {
            count: timer.count(),
            distribution: distribution(&snapshot, |nanos| duration_unit.convert_duration(nanos))?,
            rates: self.rates(
                timer.mean_rate(),
                timer.one_minute_rate(),
                timer.five_minute_rate(),
                timer.fifteen_minute_rate(),
            )?,
            duration_units: duration_unit.name().to_string(),
            rate_units: self.rate_unit.rate_label("calls"),
        })
    }

    fn rates(&self, mean: f64, m1: f64, m5: f64, m15: f64) -> Result<RateFields> {
        let convert = |field, per_second| finite(field, self.rate_unit.convert_rate(per_second));
        Ok(RateFields {
            mean_rate: convert("mean_rate", mean)?,
            m1_rate: convert("m1_rate", m1)?,
            m5_rate: convert("m5_rate", m5)?,
            m15_rate: convert("m15_rate", m15)?,
        })
    }
}

fn distribution(
    snapshot: &HistogramSnapshot,
    convert: impl Fn(f64) -> f64,
) -> Result<DistributionFields> {
    let field = |name, raw: f64| finite(name, convert(raw));
    Ok(DistributionFields {
        max: field("max", snapshot.max() as f64)?,
        mean: field("mean", snapshot.mean())?,
        min: field("min", snapshot.min() as f64)?,
        p50: field("p50", snapshot.median())?,
        p75: field("p75", snapshot.p75())?,
        p95: field("p95", snapshot.p95())?,
        p98: field("p98", snapshot.p98())?,
        p99: field("p99", snapshot.p99())?,
        p999: field("p999", snapshot.p999())?,
        stddev: field("stddev", snapshot.std_dev())?,
    })
}

fn finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ReporterError::Serialization(format!(
            "{field} is not a finite number ({value})"
        )))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string payload"
    }
}

fn to_json<T: serde::Serialize>(document: &T) -> Result<String> {
    serde_json::to_string(document).map_err(|e| ReporterError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_gauge_is_a_serialization_error() {
        let gauge = || f64::NAN;
        let err = MetricEncoder::default().encode_gauge(&gauge).unwrap_err();
        assert!(matches!(err, ReporterError::Serialization(_)));
        assert!(err.to_string().contains("value"));
    }

    #[test]
    fn panicking_gauge_is_a_serialization_error() {
        let gauge = || -> i64 { panic!("sensor unplugged") };
        let err = MetricEncoder::default().encode_gauge(&gauge).unwrap_err();
        assert!(matches!(err, ReporterError::Serialization(_)));
        assert!(err.to_string().contains("sensor unplugged"));
    }

    #[test]
    fn infinite_rate_is_rejected() {
        let encoder = MetricEncoder::default();
        let err = encoder.rates(f64::INFINITY, 0.0, 0.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("mean_rate"));
    }

    #[test]
    fn rates_use_configured_unit() {
        let encoder = MetricEncoder::new(TimeUnit::Minutes, TimeUnit::Milliseconds);
        let rates = encoder.rates(1.0, 2.0, 3.0, 4.0).unwrap();
        assert_eq!(rates.mean_rate, 60.0);
        assert_eq!(rates.m15_rate, 240.0);
    }
}
