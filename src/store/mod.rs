//! Storage seam for encoded metric documents.
//!
//! The reporter writes through the [`KeyValueStore`] trait, so tests and
//! alternative backends can stand in for Riak. [`RiakStore`] is the
//! production implementation.

mod naming;
mod riak;

use async_trait::async_trait;

use crate::Result;

pub use naming::{IdentityNaming, NamingStrategy};
pub use riak::RiakStore;

/// A key-value store holding one document per metric name.
///
/// The namespace is resolved when the store is constructed and stays fixed
/// for its lifetime.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// The namespace (bucket) every `put` writes into.
    fn namespace(&self) -> &str;

    /// Store `document` under `key`, replacing any previous value.
    ///
    /// Failures are returned as [`ReporterError::StorageWrite`](crate::ReporterError::StorageWrite);
    /// implementations do not retry.
    async fn put(&self, key: &str, document: &str) -> Result<()>;
}
