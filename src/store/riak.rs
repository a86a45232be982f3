//! Riak client over the HTTP interface.
//!
//! See: <https://docs.riak.com/riak/kv/latest/developing/api/http/>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use tracing::{debug, info};

use super::KeyValueStore;
use crate::{ReporterError, Result};

/// Per-request timeout for every call to Riak.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const PROTOBUF_PORT: u16 = 8087;

/// Writes documents into one Riak bucket.
///
/// Construction pings the node and resolves the bucket properties; a store
/// that exists has reached Riak at least once.
#[derive(Debug, Clone)]
pub struct RiakStore {
    http: Client,
    base_url: Url,
    bucket: String,
}

impl RiakStore {
    /// Connect to the Riak node at `host:port` and resolve `bucket`.
    pub async fn connect(host: &str, port: u16, bucket: impl Into<String>) -> Result<Self> {
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_string()
        };
        Self::with_base_url(&format!("http://{host}:{port}/"), bucket).await
    }

    /// Connect through an explicit base URL (for proxies and wiremock).
    pub async fn with_base_url(base_url: &str, bucket: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ReporterError::Connection(format!("invalid Riak URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ReporterError::Connection(format!(
                "invalid Riak URL {base_url}: not a base URL"
            )));
        }

        let bucket = bucket.into();
        if is_dot_segment(&bucket) {
            return Err(ReporterError::Connection(format!(
                "invalid bucket name '{bucket}'"
            )));
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ReporterError::Connection(format!("failed to build HTTP client: {e}")))?;

        let store = Self {
            http,
            base_url,
            bucket,
        };
        store.ping().await?;
        store.resolve_bucket().await?;

        info!(url = %store.base_url, bucket = %store.bucket, "connected to riak");
        Ok(store)
    }

    /// The bucket every write goes to.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn ping(&self) -> Result<()> {
        let url = self.url(&["ping"]);
        let hint = port_hint(&self.base_url);
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ReporterError::Connection(format!("cannot reach {url}: {e}{hint}")))?;

        if !response.status().is_success() {
            return Err(ReporterError::Connection(format!(
                "ping {url} returned {}{hint}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn resolve_bucket(&self) -> Result<()> {
        let url = self.url(&["buckets", self.bucket.as_str(), "props"]);
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ReporterError::Connection(format!("cannot reach {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReporterError::Connection(format!(
                "cannot resolve bucket '{}' ({status}): {body}",
                self.bucket
            )));
        }
        debug!(bucket = %self.bucket, "bucket resolved");
        Ok(())
    }
}

/// Extra context for ping failures against Riak's protocol buffers port.
fn port_hint(url: &Url) -> &'static str {
    if url.port() == Some(PROTOBUF_PORT) {
        " (8087 is Riak's protocol buffers port; the HTTP interface usually listens on 8098)"
    } else {
        ""
    }
}

/// `.` and `..` are dropped by URL path normalisation instead of being encoded.
fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

#[async_trait]
impl KeyValueStore for RiakStore {
    fn namespace(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &str, document: &str) -> Result<()> {
        let write_error = |message: String| ReporterError::StorageWrite {
            key: key.to_string(),
            message,
        };
        if is_dot_segment(key) {
            return Err(write_error("key cannot be addressed as a URL path segment".to_string()));
        }
        let url = self.url(&["buckets", self.bucket.as_str(), "keys", key]);

        let response = self
            .http
            .put(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(document.to_string())
            .send()
            .await
            .map_err(|e| write_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(write_error(format!("HTTP {status}: {body}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base: &str) -> RiakStore {
        RiakStore {
            http: Client::new(),
            base_url: Url::parse(base).unwrap(),
            bucket: "metrics".to_string(),
        }
    }

    #[test]
    fn key_urls_are_percent_encoded() {
        let url = store("http://127.0.0.1:8087/").url(&["buckets", "metrics", "keys", "a b/c"]);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8087/buckets/metrics/keys/a%20b%2Fc"
        );
    }

    #[tokio::test]
    async fn dot_keys_are_rejected_before_sending() {
        let store = store("http://127.0.0.1:9/");
        for key in [".", ".."] {
            match store.put(key, "{}").await.unwrap_err() {
                ReporterError::StorageWrite { key: k, .. } => assert_eq!(k, key),
                other => panic!("expected StorageWrite, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn dot_bucket_is_rejected_at_connect() {
        let err = RiakStore::with_base_url("http://127.0.0.1:9/", "..")
            .await
            .unwrap_err();
        assert!(matches!(err, ReporterError::Connection(_)));
        assert!(err.to_string().contains("invalid bucket name"));
    }

    #[test]
    fn protobuf_port_gets_a_hint() {
        let hinted = Url::parse("http://127.0.0.1:8087/").unwrap();
        assert!(port_hint(&hinted).contains("8098"));
        let plain = Url::parse("http://127.0.0.1:8098/").unwrap();
        assert_eq!(port_hint(&plain), "");
    }

    #[test]
    fn base_path_is_preserved() {
        let url = store("http://proxy/riak/").url(&["ping"]);
        assert_eq!(url.as_str(), "http://proxy/riak/ping");
    }
}
