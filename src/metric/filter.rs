use super::Metric;

/// Decides which metrics take part in a report.
pub trait MetricFilter: Send + Sync {
    fn matches(&self, name: &str, metric: &Metric) -> bool;
}

/// Matches every metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl MetricFilter for AcceptAll {
    fn matches(&self, _name: &str, _metric: &Metric) -> bool {
        true
    }
}

impl<F> MetricFilter for F
where
    F: Fn(&str, &Metric) -> bool + Send + Sync,
{
    fn matches(&self, name: &str, metric: &Metric) -> bool {
        self(name, metric)
    }
}

/// Matches metrics whose name starts with a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix(String);

impl MetricFilter for Prefix {
    fn matches(&self, name: &str, _metric: &Metric) -> bool {
        name.starts_with(&self.0)
    }
}

/// Matches metrics whose name starts with `prefix`.
pub fn prefix(prefix: impl Into<String>) -> Prefix {
    Prefix(prefix.into())
}
