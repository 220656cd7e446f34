//! PostgreSQL Object Store
//!
//! Translates gateway calls into statements against `s3.objects`, and
//! owns the idempotent schema bootstrap.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

use super::{ObjectContent, ObjectEntry, ObjectStore};

const CREATE_SCHEMA: &str = "CREATE SCHEMA IF NOT EXISTS s3";

const CREATE_OBJECTS: &str = "CREATE TABLE IF NOT EXISTS s3.objects (
    path          TEXT PRIMARY KEY,
    content       BYTEA NOT NULL,
    content_type  TEXT NOT NULL,
    size          BIGINT NOT NULL,
    last_modified TIMESTAMPTZ NOT NULL DEFAULT now()
)";

// COLLATE "C" pins byte-order sorting regardless of database collation.
const LIST_OBJECTS: &str =
    "SELECT path, size, last_modified FROM s3.objects ORDER BY path COLLATE \"C\"";

const GET_OBJECT: &str = "SELECT content, content_type FROM s3.objects WHERE path = $1";

const UPSERT_OBJECT: &str = "INSERT INTO s3.objects \
     (path, content, content_type, size, last_modified) \
     VALUES ($1, $2, $3, $4, now()) \
     ON CONFLICT (path) DO UPDATE \
     SET content = EXCLUDED.content, content_type = EXCLUDED.content_type, \
         size = EXCLUDED.size, last_modified = now() \
     RETURNING last_modified";

const DELETE_OBJECT: &str = "DELETE FROM s3.objects WHERE path = $1";

/// Object store backed by a PostgreSQL connection pool.
///
/// The pool is the only shared resource; each operation checks out a
/// connection for a single statement, so concurrent requests serialize
/// only when the pool is exhausted.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to PostgreSQL and build the connection pool.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.database_url())
            .await?;

        Ok(Self { pool })
    }

    /// Check if the connection is healthy
    pub async fn health_check(&self) -> Result<bool> {
        let row: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&self.pool).await?;
        Ok(row.0 == 1)
    }

    /// Close the connection pool
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Ensure the `s3` schema and objects table exist.
    ///
    /// Runs on every listing/get/put invocation. `IF NOT EXISTS` makes
    /// the happy path idempotent, but two connections can still race the
    /// catalog insert; the loser sees a duplicate-object error after the
    /// winner has already created it, so a failed statement is accepted
    /// when the object turns out to exist.
    async fn ensure_schema(&self) -> Result<()> {
        if let Err(e) = sqlx::query(CREATE_SCHEMA).execute(&self.pool).await {
            if !self.schema_exists().await.unwrap_or(false) {
                return Err(Error::Schema(format!("failed to create schema: {e}")));
            }
        }

        if let Err(e) = sqlx::query(CREATE_OBJECTS).execute(&self.pool).await {
            if !self.table_exists().await.unwrap_or(false) {
                return Err(Error::Schema(format!("failed to create objects table: {e}")));
            }
        }

        Ok(())
    }

    async fn schema_exists(&self) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM pg_namespace WHERE nspname = 's3')")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get(0)?)
    }

    async fn table_exists(&self) -> Result<bool> {
        let row = sqlx::query("SELECT to_regclass('s3.objects') IS NOT NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get(0)?)
    }
}

#[async_trait]
impl ObjectStore for PgStore {
    async fn list(&self) -> Result<Vec<ObjectEntry>> {
        self.ensure_schema().await?;

        let rows = sqlx::query(LIST_OBJECTS).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(ObjectEntry {
                    path: row.try_get("path")?,
                    size: row.try_get("size")?,
                    last_modified: row.try_get("last_modified")?,
                })
            })
            .collect()
    }

    async fn get(&self, path: &str) -> Result<Option<ObjectContent>> {
        self.ensure_schema().await?;

        let row = sqlx::query(GET_OBJECT)
            .bind(path)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(ObjectContent {
                content: row.try_get("content")?,
                content_type: row.try_get("content_type")?,
            })),
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        path: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<DateTime<Utc>> {
        self.ensure_schema().await?;

        let row = sqlx::query(UPSERT_OBJECT)
            .bind(path)
            .bind(content)
            .bind(content_type)
            .bind(content.len() as i64)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("last_modified")?)
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        let result = sqlx::query(DELETE_OBJECT)
            .bind(path)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
