//! pgs3 - S3-style object storage on PostgreSQL
//!
//! A minimal object-storage API (bucket listing, object get/put/delete,
//! prefix-filtered listing) backed by a single PostgreSQL table and
//! reachable through a one-shot CLI or an HTTP gateway.
//!
//! # Architecture
//!
//! Transport bindings (CLI and HTTP) drive the [`gateway::Gateway`],
//! which validates the bucket, shapes responses, and encodes the JSON
//! wire format. Storage goes through the [`store::ObjectStore`] seam;
//! the PostgreSQL adapter owns schema bootstrap and maps objects onto
//! rows byte-for-byte. One bucket, `public`, is served; it is a
//! validated constant rather than a stored entity.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod mime;
pub mod store;

pub use config::DatabaseConfig;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::DatabaseConfig;
    pub use crate::error::{Error, Result};
    pub use crate::gateway::{Gateway, GatewayResult, GatewayStatus};
    pub use crate::store::{MemoryStore, ObjectStore, PgStore};
}
