//! Gauges: metrics whose value is read on demand.

use serde::{Deserialize, Serialize};

/// The type-erased value of a gauge.
///
/// Serializes untagged, so `Int(1000)` becomes the JSON number `1000`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GaugeValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl GaugeValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GaugeValue::Int(v) => Some(*v as f64),
            GaugeValue::UInt(v) => Some(*v as f64),
            GaugeValue::Float(v) => Some(*v),
            GaugeValue::Bool(_) | GaugeValue::Text(_) => None,
        }
    }
}

macro_rules! gauge_value_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for GaugeValue {
                fn from(v: $ty) -> Self {
                    GaugeValue::$variant(v.into())
                }
            }
        )+
    };
}

gauge_value_from!(Int: i8, i16, i32, i64);
gauge_value_from!(UInt: u8, u16, u32, u64);
gauge_value_from!(Float: f32, f64);
gauge_value_from!(Bool: bool);
gauge_value_from!(Text: String, &str);

impl From<usize> for GaugeValue {
    fn from(v: usize) -> Self {
        GaugeValue::UInt(v as u64)
    }
}

/// A metric which reports an instantaneous value.
pub trait Gauge: Send + Sync {
    fn value(&self) -> GaugeValue;
}

impl<F, T> Gauge for F
where
    F: Fn() -> T + Send + Sync,
    T: Into<GaugeValue>,
{
    fn value(&self) -> GaugeValue {
        self().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_gauges() {
        let gauge = || 1000_i32;
        assert_eq!(gauge.value(), GaugeValue::Int(1000));

        let gauge = || "up";
        assert_eq!(gauge.value(), GaugeValue::Text("up".into()));
    }

    #[test]
    fn untagged_serialization() {
        assert_eq!(serde_json::to_string(&GaugeValue::Int(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&GaugeValue::Bool(true)).unwrap(), "true");
        assert_eq!(
            serde_json::to_string(&GaugeValue::Text("x".into())).unwrap(),
            "\"x\""
        );
    }
}
