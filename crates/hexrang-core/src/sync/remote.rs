//! Remote color store client
//!
//! Writes color records into a remote keyed document collection via
//! `put(collection, key, document)`. No retries here; retry policy lives in
//! the coordinator. Nothing ever reads back from the remote.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::ColorRecord;

/// Errors from a remote write
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Transport-level failure (DNS, connect, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote service answered with a non-success status
    #[error("Remote service error: HTTP {status}")]
    Service { status: u16 },

    /// The document could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One or more upserts in a batch failed
///
/// Documents already written stay written; the batch reports failure as a
/// whole and carries the first cause.
#[derive(Error, Debug)]
#[error("{failed} of {total} remote writes failed")]
pub struct BatchError {
    pub failed: usize,
    pub total: usize,
    #[source]
    pub cause: RemoteError,
}

/// Wire document for one color record
///
/// Serialized form: `{"hexColor": "#FF8800", "createdAt": ..., "synced": true}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColorDocument {
    pub hex_color: String,
    pub created_at: DateTime<Utc>,
    pub synced: bool,
}

impl From<&ColorRecord> for ColorDocument {
    fn from(record: &ColorRecord) -> Self {
        Self {
            hex_color: record.hex.to_string(),
            created_at: record.created_at,
            // The remote copy only exists because a sync succeeded
            synced: true,
        }
    }
}

/// A keyed remote document store
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Insert or overwrite the document stored under `key`
    async fn put(
        &self,
        collection: &str,
        key: &str,
        document: &ColorDocument,
    ) -> Result<(), RemoteError>;
}

#[async_trait]
impl<T: RemoteStore + ?Sized> RemoteStore for Arc<T> {
    async fn put(
        &self,
        collection: &str,
        key: &str,
        document: &ColorDocument,
    ) -> Result<(), RemoteError> {
        (**self).put(collection, key, document).await
    }
}

/// HTTP-backed remote store
///
/// Documents live at `PUT {base_url}/{collection}/{key}` with a JSON body.
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn put(
        &self,
        collection: &str,
        key: &str,
        document: &ColorDocument,
    ) -> Result<(), RemoteError> {
        // '#' starts a URL fragment, so the key goes on the path bare
        let key = key.trim_start_matches('#');
        let url = format!("{}/{}/{}", self.base_url, collection, key);

        debug!(%url, "remote put");
        let response = self.client.put(&url).json(document).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RemoteError::Service {
                status: response.status().as_u16(),
            })
        }
    }
}

/// Client that pushes color records into one remote collection
pub struct RemoteClient<R> {
    store: R,
    collection: String,
}

impl<R: RemoteStore> RemoteClient<R> {
    pub fn new(store: R, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Upsert a single record, keyed by its canonical hex value
    pub async fn upsert(&self, record: &ColorRecord) -> Result<(), RemoteError> {
        let document = ColorDocument::from(record);
        self.store
            .put(&self.collection, record.hex.as_str(), &document)
            .await
    }

    /// Upsert every record concurrently
    ///
    /// Fans out one write per record and joins them all. Succeeds only when
    /// every write succeeded; a failure fails the batch as a whole without
    /// rolling back documents that were already written.
    pub async fn upsert_all(&self, records: &[ColorRecord]) -> Result<(), BatchError> {
        if records.is_empty() {
            return Ok(());
        }

        let total = records.len();
        let results = future::join_all(records.iter().map(|r| self.upsert(r))).await;

        let mut failures = results.into_iter().filter_map(Result::err);
        match failures.next() {
            None => Ok(()),
            Some(cause) => Err(BatchError {
                failed: 1 + failures.count(),
                total,
                cause,
            }),
        }
    }
}

/// In-memory remote store
///
/// Backs tests and local experimentation. Individual keys can be scripted
/// to fail, which is how partial batch failures are simulated.
#[derive(Default)]
pub struct MemoryRemoteStore {
    documents: Mutex<HashMap<String, ColorDocument>>,
    failing_keys: Mutex<HashSet<String>>,
    put_calls: Mutex<usize>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes for `key` fail with a service error
    pub fn fail_key(&self, key: &str) {
        self.failing_keys.lock().unwrap().insert(key.to_string());
    }

    /// Fetch a stored document (test inspection only)
    pub fn document(&self, collection: &str, key: &str) -> Option<ColorDocument> {
        self.documents
            .lock()
            .unwrap()
            .get(&doc_path(collection, key))
            .cloned()
    }

    /// Number of documents currently stored
    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `put` calls observed, including failed ones
    pub fn put_calls(&self) -> usize {
        *self.put_calls.lock().unwrap()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn put(
        &self,
        collection: &str,
        key: &str,
        document: &ColorDocument,
    ) -> Result<(), RemoteError> {
        *self.put_calls.lock().unwrap() += 1;

        if self.failing_keys.lock().unwrap().contains(key) {
            return Err(RemoteError::Service { status: 503 });
        }

        self.documents
            .lock()
            .unwrap()
            .insert(doc_path(collection, key), document.clone());
        Ok(())
    }
}

fn doc_path(collection: &str, key: &str) -> String {
    format!("{}/{}", collection, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HexColor;

    fn record(hex: &str) -> ColorRecord {
        ColorRecord::new(HexColor::parse(hex).unwrap())
    }

    fn client(store: Arc<MemoryRemoteStore>) -> RemoteClient<Arc<MemoryRemoteStore>> {
        RemoteClient::new(store, "userColors")
    }

    #[test]
    fn test_document_from_record() {
        let r = record("#FF8800");
        let doc = ColorDocument::from(&r);
        assert_eq!(doc.hex_color, "#FF8800");
        assert_eq!(doc.created_at, r.created_at);
        assert!(doc.synced);
    }

    #[test]
    fn test_document_wire_format() {
        let doc = ColorDocument::from(&record("#FF8800"));
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"hexColor\":\"#FF8800\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"synced\":true"));
    }

    #[tokio::test]
    async fn test_upsert_stores_under_hex_key() {
        let remote = Arc::new(MemoryRemoteStore::new());
        let client = client(remote.clone());

        client.upsert(&record("#FF8800")).await.unwrap();

        let doc = remote.document("userColors", "#FF8800").unwrap();
        assert_eq!(doc.hex_color, "#FF8800");
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let remote = Arc::new(MemoryRemoteStore::new());
        let client = client(remote.clone());

        let first = record("#FF8800");
        let second = record("#FF8800");

        client.upsert(&first).await.unwrap();
        client.upsert(&second).await.unwrap();

        // Same key, one document; the second write won
        assert_eq!(remote.len(), 1);
        assert_eq!(remote.put_calls(), 2);
        let doc = remote.document("userColors", "#FF8800").unwrap();
        assert_eq!(doc.created_at, second.created_at);
    }

    #[tokio::test]
    async fn test_upsert_failure_carries_cause() {
        let remote = Arc::new(MemoryRemoteStore::new());
        remote.fail_key("#FF8800");
        let client = client(remote.clone());

        let err = client.upsert(&record("#FF8800")).await.unwrap_err();
        assert!(matches!(err, RemoteError::Service { status: 503 }));
        assert!(remote.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_all_success() {
        let remote = Arc::new(MemoryRemoteStore::new());
        let client = client(remote.clone());

        let records = vec![record("#111111"), record("#222222"), record("#333333")];
        client.upsert_all(&records).await.unwrap();

        assert_eq!(remote.len(), 3);
    }

    #[tokio::test]
    async fn test_upsert_all_empty_is_noop() {
        let remote = Arc::new(MemoryRemoteStore::new());
        let client = client(remote.clone());

        client.upsert_all(&[]).await.unwrap();
        assert_eq!(remote.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_upsert_all_partial_failure() {
        let remote = Arc::new(MemoryRemoteStore::new());
        remote.fail_key("#222222");
        let client = client(remote.clone());

        let records = vec![record("#111111"), record("#222222"), record("#333333")];
        let err = client.upsert_all(&records).await.unwrap_err();

        assert_eq!(err.failed, 1);
        assert_eq!(err.total, 3);

        // Successful writes are not rolled back
        assert_eq!(remote.len(), 2);
        assert!(remote.document("userColors", "#111111").is_some());
        assert!(remote.document("userColors", "#222222").is_none());
    }

    #[test]
    fn test_http_store_trims_trailing_slash() {
        let store = HttpRemoteStore::new("https://colors.example.com/api/");
        assert_eq!(store.base_url, "https://colors.example.com/api");
    }
}
