//! HTTP API Module
//!
//! The HTTP transport binding over the object gateway.

mod body;
mod http;

pub use http::HttpServer;
