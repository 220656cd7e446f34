//! Object operations
//!
//! The gateway validates the bucket, drives the store adapter, and
//! shapes every response into a [`GatewayResult`]. Store failures pass
//! through as statuses; nothing is retried here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mime::DEFAULT_CONTENT_TYPE;
use crate::store::{ObjectEntry, ObjectStore};

use super::etag;
use super::result::{GatewayResult, GatewayStatus};

/// The only bucket this gateway serves.
pub const BUCKET: &str = "public";

/// Buckets are not stored entities, so the reported creation date is a
/// fixed constant.
const BUCKET_CREATION_DATE: &str = "2023-01-01T00:00:00.000Z";

/// Wire record for `GET /` listings.
#[derive(Debug, Serialize, Deserialize)]
pub struct BucketSummary {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CreationDate")]
    pub creation_date: String,
}

/// Wire record for object listings.
#[derive(Debug, Serialize, Deserialize)]
pub struct ObjectSummary {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Size")]
    pub size: i64,
    #[serde(rename = "LastModified")]
    pub last_modified: String,
}

/// Wire record returned by a successful put.
#[derive(Debug, Serialize, Deserialize)]
pub struct PutReceipt {
    #[serde(rename = "ETag")]
    pub etag: String,
    #[serde(rename = "LastModified")]
    pub last_modified: String,
}

/// Object gateway over a store adapter.
#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn ObjectStore>,
}

impl Gateway {
    /// Create a gateway owning the given store adapter.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// List buckets. Always the single `public` bucket, regardless of
    /// store state.
    pub async fn list_buckets(&self) -> GatewayResult {
        let buckets = [BucketSummary {
            name: BUCKET.to_string(),
            creation_date: BUCKET_CREATION_DATE.to_string(),
        }];
        GatewayResult::json(&buckets)
    }

    /// List objects in a bucket, optionally filtered by key prefix.
    pub async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> GatewayResult {
        if let Err(result) = check_bucket(bucket) {
            return result;
        }

        let entries = match self.store.list().await {
            Ok(entries) => entries,
            Err(e) => {
                return GatewayResult::error(e.status(), format!("Failed to list objects: {e}"))
            }
        };

        let summaries: Vec<ObjectSummary> = filter_prefix(entries, prefix)
            .into_iter()
            .map(|entry| ObjectSummary {
                key: entry.path,
                size: entry.size,
                last_modified: format_timestamp(&entry.last_modified),
            })
            .collect();

        debug!(count = summaries.len(), "listed objects");
        GatewayResult::json(&summaries)
    }

    /// Fetch one object; the payload carries the stored bytes and
    /// content type verbatim.
    pub async fn get_object(&self, bucket: &str, key: &str) -> GatewayResult {
        if let Err(result) = check_bucket(bucket) {
            return result;
        }
        if key.is_empty() {
            return GatewayResult::error(GatewayStatus::InvalidInput, "Object key is required");
        }

        match self.store.get(key).await {
            Ok(Some(object)) => {
                debug!(key, size = object.content.len(), "object fetched");
                GatewayResult::success(object.content, object.content_type)
            }
            Ok(None) => GatewayResult::error(GatewayStatus::NotFound, "Object not found"),
            Err(e) => GatewayResult::error(e.status(), format!("Failed to fetch object: {e}")),
        }
    }

    /// Insert or fully replace an object.
    ///
    /// The response payload is `{"ETag":...,"LastModified":...}`; the
    /// ETag is a pure function of the content bytes.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: &[u8],
        content_type: Option<&str>,
    ) -> GatewayResult {
        if bucket.is_empty() || key.is_empty() || content.is_empty() {
            return GatewayResult::error(
                GatewayStatus::InvalidInput,
                "Bucket name, key, and content are required",
            );
        }
        if let Err(result) = check_bucket(bucket) {
            return result;
        }

        let content_type = match content_type {
            Some(ct) if !ct.is_empty() => ct,
            _ => DEFAULT_CONTENT_TYPE,
        };

        let last_modified = match self.store.put(key, content, content_type).await {
            Ok(ts) => ts,
            Err(e) => {
                return GatewayResult::error(e.status(), format!("Failed to store object: {e}"))
            }
        };

        debug!(key, size = content.len(), content_type, "object stored");
        let receipt = PutReceipt {
            etag: etag::compute(content),
            last_modified: format_timestamp(&last_modified),
        };
        GatewayResult::json(&receipt)
    }

    /// Delete an object. Succeeds whether or not the key existed.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> GatewayResult {
        if let Err(result) = check_bucket(bucket) {
            return result;
        }
        if key.is_empty() {
            return GatewayResult::error(GatewayStatus::InvalidInput, "Object key is required");
        }

        match self.store.delete(key).await {
            Ok(removed) => {
                debug!(key, removed, "object deleted");
                GatewayResult::json(&serde_json::json!({}))
            }
            Err(e) => GatewayResult::error(e.status(), format!("Failed to delete object: {e}")),
        }
    }
}

fn check_bucket(bucket: &str) -> std::result::Result<(), GatewayResult> {
    if bucket.is_empty() {
        return Err(GatewayResult::error(
            GatewayStatus::InvalidInput,
            "Bucket name is required",
        ));
    }
    if bucket != BUCKET {
        return Err(GatewayResult::error(
            GatewayStatus::NotFound,
            "Bucket not found",
        ));
    }
    Ok(())
}

/// Retain entries whose key starts with `prefix`, byte-wise and
/// case-sensitive. Filtering operates on the parsed listing, never on
/// serialized JSON. An empty or absent prefix keeps everything.
fn filter_prefix(entries: Vec<ObjectEntry>, prefix: Option<&str>) -> Vec<ObjectEntry> {
    match prefix {
        Some(p) if !p.is_empty() => entries
            .into_iter()
            .filter(|entry| entry.path.starts_with(p))
            .collect(),
        _ => entries,
    }
}

/// Encode a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ` (milliseconds, UTC).
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
