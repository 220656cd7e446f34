//! Object Gateway Module
//!
//! Implements the S3-flavored object semantics (bucket validation,
//! list/get/put/delete orchestration, ETag computation, and JSON wire
//! encoding) on top of an [`crate::store::ObjectStore`].

pub mod etag;
mod objects;
mod result;

pub use objects::{BucketSummary, Gateway, ObjectSummary, PutReceipt, BUCKET};
pub use result::{GatewayResult, GatewayStatus, Payload};
