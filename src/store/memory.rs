//! In-memory object store for tests and embedded use

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::Result;

use super::{ObjectContent, ObjectEntry, ObjectStore};

#[derive(Debug, Clone)]
struct StoredObject {
    content: Vec<u8>,
    content_type: String,
    last_modified: DateTime<Utc>,
}

/// Object store over an ordered in-memory map.
///
/// `BTreeMap` iteration order gives the same byte-order listing the
/// PostgreSQL adapter produces with `COLLATE "C"`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    objects: Arc<RwLock<BTreeMap<String, StoredObject>>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self) -> Result<Vec<ObjectEntry>> {
        let objects = self.objects.read().await;
        Ok(objects
            .iter()
            .map(|(path, object)| ObjectEntry {
                path: path.clone(),
                size: object.content.len() as i64,
                last_modified: object.last_modified,
            })
            .collect())
    }

    async fn get(&self, path: &str) -> Result<Option<ObjectContent>> {
        let objects = self.objects.read().await;
        Ok(objects.get(path).map(|object| ObjectContent {
            content: object.content.clone(),
            content_type: object.content_type.clone(),
        }))
    }

    async fn put(
        &self,
        path: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<DateTime<Utc>> {
        let last_modified = Utc::now();
        let mut objects = self.objects.write().await;
        objects.insert(
            path.to_string(),
            StoredObject {
                content: content.to_vec(),
                content_type: content_type.to_string(),
                last_modified,
            },
        );
        Ok(last_modified)
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        let mut objects = self.objects.write().await;
        Ok(objects.remove(path).is_some())
    }
}
