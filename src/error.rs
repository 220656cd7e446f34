//! pgs3 Error Types

use thiserror::Error;

use crate::gateway::GatewayStatus;

/// Result type alias for pgs3 operations
pub type Result<T> = std::result::Result<T, Error>;

/// pgs3 error types
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Query execution failed: {0}")]
    QueryExecution(String),

    // Gateway errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Buffer allocation failed: {0}")]
    OutOfMemory(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    // Transport errors
    #[error("Network error: {0}")]
    Network(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Project this error onto the closed gateway status set.
    ///
    /// Connectivity failures (pool exhaustion, TLS, network I/O) map to
    /// `Connection`; everything that reached the backend and failed maps
    /// to `Execution`.
    pub fn status(&self) -> GatewayStatus {
        match self {
            Error::Database(e) => match e {
                sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::Configuration(_) => GatewayStatus::Connection,
                _ => GatewayStatus::Execution,
            },
            Error::Config(_) | Error::Network(_) | Error::Io(_) => GatewayStatus::Connection,
            Error::Schema(_) | Error::QueryExecution(_) | Error::Operation(_) => {
                GatewayStatus::Execution
            }
            Error::InvalidInput(_) => GatewayStatus::InvalidInput,
            Error::NotFound(_) => GatewayStatus::NotFound,
            Error::OutOfMemory(_) => GatewayStatus::OutOfMemory,
        }
    }
}
