//! Upload body accumulation
//!
//! PUT bodies arrive in chunks; they are collected into one buffer
//! before the gateway is invoked. The loop awaits between chunks, so a
//! slow upload never stalls other requests.

use axum::body::Body;
use bytes::Bytes;
use futures::StreamExt;

use crate::error::{Error, Result};

/// Cap on accumulated upload bodies.
pub const MAX_BODY_BYTES: usize = 512 * 1024 * 1024;

/// Collect a request body into a single buffer, enforcing `limit`.
pub async fn accumulate(body: Body, limit: usize) -> Result<Vec<u8>> {
    let mut stream = body.into_data_stream();
    let mut buf: Vec<u8> = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk: Bytes =
            chunk.map_err(|e| Error::Network(format!("failed to read request body: {e}")))?;

        if buf.len() + chunk.len() > limit {
            return Err(Error::InvalidInput(format!(
                "request body exceeds the {limit} byte limit"
            )));
        }
        if buf.try_reserve(chunk.len()).is_err() {
            return Err(Error::OutOfMemory(format!(
                "cannot buffer {} more body bytes",
                chunk.len()
            )));
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}
