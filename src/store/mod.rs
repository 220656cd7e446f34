//! Object Store Module
//!
//! Storage backends for the object gateway. `PgStore` is the production
//! adapter over PostgreSQL; `MemoryStore` serves tests and embedded use.

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// One row of the object listing.
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    /// Object key
    pub path: String,
    /// Content length in bytes
    pub size: i64,
    /// Server-assigned time of the last successful write
    pub last_modified: DateTime<Utc>,
}

/// Stored object content as returned by [`ObjectStore::get`].
#[derive(Debug, Clone)]
pub struct ObjectContent {
    pub content: Vec<u8>,
    pub content_type: String,
}

/// Storage contract the gateway drives.
///
/// Implementations do not retry: connectivity and statement failures
/// propagate to the caller unchanged.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// All stored objects, ordered by path ascending in byte order.
    async fn list(&self) -> Result<Vec<ObjectEntry>>;

    /// Fetch one object, or `None` if the path is absent.
    async fn get(&self, path: &str) -> Result<Option<ObjectContent>>;

    /// Insert or fully replace an object, returning the server-assigned
    /// modification time of this write.
    async fn put(&self, path: &str, content: &[u8], content_type: &str)
        -> Result<DateTime<Utc>>;

    /// Remove an object. Returns `true` iff a row existed and was
    /// removed; absence is not an error.
    async fn delete(&self, path: &str) -> Result<bool>;
}
