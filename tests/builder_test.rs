//! Tests for [`RiakReporterBuilder`] defaults and construction.

use std::sync::Arc;

use async_trait::async_trait;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use riak_reporter::{
    Counter, KeyValueStore, Locale, Metric, MetricFilter, ReporterError, Result, RiakReporter,
    TimeUnit, TimeZone,
};

struct NullStore;

#[async_trait]
impl KeyValueStore for NullStore {
    fn namespace(&self) -> &str {
        "null"
    }

    async fn put(&self, _key: &str, _document: &str) -> Result<()> {
        Ok(())
    }
}

#[test]
fn defaults_match_explicit_settings() {
    let defaults = RiakReporter::builder().settings();
    let explicit = RiakReporter::builder()
        .host("127.0.0.1")
        .port(8087)
        .bucket("metrics")
        .convert_rates_to(TimeUnit::Seconds)
        .convert_durations_to(TimeUnit::Milliseconds)
        .settings();

    assert_eq!(defaults, explicit);
    assert_eq!(defaults.host, "127.0.0.1");
    assert_eq!(defaults.port, 8087);
    assert_eq!(defaults.bucket, "metrics");
    assert_eq!(defaults.rate_unit, TimeUnit::Seconds);
    assert_eq!(defaults.duration_unit, TimeUnit::Milliseconds);
    assert_eq!(defaults.time_zone, TimeZone::Local);
    assert_eq!(defaults.locale, Locale::system());
}

#[tokio::test]
async fn default_filter_accepts_everything() {
    let reporter = RiakReporter::builder()
        .store(Arc::new(NullStore))
        .build()
        .await
        .unwrap();

    let metric = Metric::Counter(Arc::new(Counter::new()));
    let filter: &dyn MetricFilter = riak_reporter::ScheduledReporter::filter(&reporter);
    assert!(filter.matches("anything", &metric));
    assert!(filter.matches("", &metric));
}

#[tokio::test]
async fn encoder_uses_configured_units() {
    let reporter = RiakReporter::builder()
        .convert_rates_to(TimeUnit::Minutes)
        .convert_durations_to(TimeUnit::Microseconds)
        .store(Arc::new(NullStore))
        .build()
        .await
        .unwrap();

    assert_eq!(reporter.encoder().rate_unit(), TimeUnit::Minutes);
    assert_eq!(reporter.encoder().duration_unit(), TimeUnit::Microseconds);
    assert_eq!(reporter.namespace(), "null");
}

#[test]
fn naming_strategy_renames_bucket_once() {
    let settings = RiakReporter::builder()
        .bucket("metrics")
        .bucket_namer(|seed: &str| format!("{seed}-staging"))
        .settings();
    assert_eq!(settings.bucket, "metrics-staging");
}

#[tokio::test]
async fn build_connects_to_the_named_bucket() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/buckets/bar/props"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"props": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let address = server.address();
    let reporter = RiakReporter::builder()
        .host(address.ip().to_string())
        .port(address.port())
        .bucket_namer(|_: &str| "bar".to_string())
        .build()
        .await
        .unwrap();

    assert_eq!(reporter.namespace(), "bar");
    assert_eq!(reporter.settings().bucket, "bar");
}

#[tokio::test]
async fn build_fails_when_riak_is_unreachable() {
    let err = RiakReporter::builder()
        .host("127.0.0.1")
        .port(1)
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, ReporterError::Connection(_)));
}
