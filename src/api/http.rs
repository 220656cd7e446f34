//! S3-style HTTP server
//!
//! Path-based routing over the object gateway:
//! - `GET /` → list buckets
//! - `GET /public` (optional `prefix` query) → list objects
//! - `GET /public/<key>` → get object
//! - `PUT /public/<key>` → put object (body accumulated before dispatch)
//! - `DELETE /public/<key>` → delete object
//!
//! Anything else is a generic 404. Gateway statuses map to HTTP status
//! codes here and nowhere else.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{Error, Result};
use crate::gateway::{Gateway, GatewayResult, GatewayStatus};

use super::body;

/// HTTP server for the object gateway
pub struct HttpServer {
    bind_addr: String,
    gateway: Gateway,
}

impl HttpServer {
    /// Create a new server bound to all interfaces on `port`.
    pub fn new(port: u16, gateway: Gateway) -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{port}"),
            gateway,
        }
    }

    /// Create the router
    fn create_router(gateway: Gateway) -> Router {
        Router::new()
            // Object routing is path-based, so a catch-all route
            // dispatches on method + parsed path.
            .route("/", any(handle_root))
            .route("/*path", any(handle_path))
            .layer(TraceLayer::new_for_http())
            .with_state(gateway)
    }

    /// Start the HTTP server (blocks until shutdown or failure).
    pub async fn run(self) -> Result<()> {
        let app = Self::create_router(self.gateway);

        let listener = TcpListener::bind(&self.bind_addr).await?;
        info!("S3 API listening on {}", self.bind_addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Network(format!("HTTP server error: {e}")))?;

        Ok(())
    }
}

async fn handle_root(State(gateway): State<Gateway>, method: Method) -> Response {
    match method {
        Method::GET => render(gateway.list_buckets().await),
        _ => not_found(),
    }
}

async fn handle_path(
    State(gateway): State<Gateway>,
    Path(path): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    method: Method,
    request: Request,
) -> Response {
    let (bucket, key) = parse_bucket_key(&path);

    match (method, key) {
        (Method::GET, None) => {
            let prefix = query.get("prefix").map(String::as_str);
            render(gateway.list_objects(&bucket, prefix).await)
        }
        (Method::GET, Some(key)) => render(gateway.get_object(&bucket, &key).await),
        (Method::PUT, Some(key)) => {
            let content_type = headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);

            let content =
                match body::accumulate(request.into_body(), body::MAX_BODY_BYTES).await {
                    Ok(buf) => buf,
                    Err(e) => {
                        return render(GatewayResult::error(
                            e.status(),
                            format!("Failed to read body: {e}"),
                        ))
                    }
                };

            render(
                gateway
                    .put_object(&bucket, &key, &content, content_type.as_deref())
                    .await,
            )
        }
        (Method::DELETE, Some(key)) => render(gateway.delete_object(&bucket, &key).await),
        _ => not_found(),
    }
}

/// Parse a request path into (bucket, optional key)
fn parse_bucket_key(path: &str) -> (String, Option<String>) {
    let path = path.trim_start_matches('/');
    match path.split_once('/') {
        Some((bucket, key)) if !key.is_empty() => (bucket.to_string(), Some(key.to_string())),
        Some((bucket, _)) => (bucket.to_string(), None),
        None => (path.to_string(), None),
    }
}

/// Map a gateway status onto the transport status code.
fn http_status(status: GatewayStatus) -> StatusCode {
    match status {
        GatewayStatus::Success => StatusCode::OK,
        GatewayStatus::NotFound => StatusCode::NOT_FOUND,
        GatewayStatus::PermissionDenied => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a gateway result as an HTTP response.
fn render(result: GatewayResult) -> Response {
    if result.is_success() {
        match result.payload {
            Some(payload) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, payload.content_type)],
                payload.data,
            )
                .into_response(),
            None => StatusCode::OK.into_response(),
        }
    } else {
        let message = result
            .error_message
            .unwrap_or_else(|| "Internal Server Error".to_string());
        (http_status(result.status), message).into_response()
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{ObjectSummary, PutReceipt};
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router() -> Router {
        let gateway = Gateway::new(Arc::new(MemoryStore::new()));
        HttpServer::create_router(gateway)
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    fn request(method: &str, uri: &str, body: &[u8]) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_vec()))
            .unwrap()
    }

    #[test]
    fn test_parse_bucket_key() {
        assert_eq!(parse_bucket_key("public"), ("public".into(), None));
        assert_eq!(parse_bucket_key("public/"), ("public".into(), None));
        assert_eq!(
            parse_bucket_key("public/a.txt"),
            ("public".into(), Some("a.txt".into()))
        );
        assert_eq!(
            parse_bucket_key("public/a/b.txt"),
            ("public".into(), Some("a/b.txt".into()))
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(http_status(GatewayStatus::Success), StatusCode::OK);
        assert_eq!(http_status(GatewayStatus::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            http_status(GatewayStatus::PermissionDenied),
            StatusCode::FORBIDDEN
        );
        for status in [
            GatewayStatus::Connection,
            GatewayStatus::Execution,
            GatewayStatus::InvalidInput,
            GatewayStatus::OutOfMemory,
        ] {
            assert_eq!(http_status(status), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[tokio::test]
    async fn test_list_buckets() {
        let response = router()
            .oneshot(request("GET", "/", b""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_bytes(response).await,
            br#"[{"Name":"public","CreationDate":"2023-01-01T00:00:00.000Z"}]"#
        );
    }

    #[tokio::test]
    async fn test_put_get_delete_cycle() {
        let app = router();

        let put = app
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .method("PUT")
                    .uri("/public/a.txt")
                    .header("content-type", "text/plain")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(put.status(), StatusCode::OK);
        let receipt: PutReceipt =
            serde_json::from_slice(&body_bytes(put).await).unwrap();
        assert!(!receipt.etag.is_empty());

        let get = app
            .clone()
            .oneshot(request("GET", "/public/a.txt", b""))
            .await
            .unwrap();
        assert_eq!(get.status(), StatusCode::OK);
        assert_eq!(
            get.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain"
        );
        assert_eq!(body_bytes(get).await, b"hello");

        let delete = app
            .clone()
            .oneshot(request("DELETE", "/public/a.txt", b""))
            .await
            .unwrap();
        assert_eq!(delete.status(), StatusCode::OK);
        assert_eq!(body_bytes(delete).await, b"{}");

        let gone = app
            .oneshot(request("GET", "/public/a.txt", b""))
            .await
            .unwrap();
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_put_without_content_type_defaults() {
        let app = router();
        app.clone()
            .oneshot(request("PUT", "/public/blob", b"data"))
            .await
            .unwrap();

        let get = app
            .oneshot(request("GET", "/public/blob", b""))
            .await
            .unwrap();
        assert_eq!(
            get.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_prefix_query_filters_listing() {
        let app = router();
        for key in ["b/1", "a/2", "a/1"] {
            app.clone()
                .oneshot(request("PUT", &format!("/public/{key}"), b"x"))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(request("GET", "/public?prefix=a/", b""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let summaries: Vec<ObjectSummary> =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        let keys: Vec<_> = summaries.into_iter().map(|s| s.key).collect();
        assert_eq!(keys, ["a/1", "a/2"]);
    }

    #[tokio::test]
    async fn test_get_missing_object_is_404_with_message() {
        let response = router()
            .oneshot(request("GET", "/public/missing", b""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(response).await, b"Object not found");
    }

    #[tokio::test]
    async fn test_delete_missing_object_succeeds() {
        let response = router()
            .oneshot(request("DELETE", "/public/missing", b""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"{}");
    }

    #[tokio::test]
    async fn test_unknown_bucket_is_404() {
        let response = router()
            .oneshot(request("GET", "/private/a.txt", b""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(response).await, b"Bucket not found");
    }

    #[tokio::test]
    async fn test_unroutable_method_is_404() {
        let post = router()
            .oneshot(request("POST", "/public/a.txt", b"x"))
            .await
            .unwrap();
        assert_eq!(post.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(post).await, b"Not Found");

        let put_bucket = router()
            .oneshot(request("PUT", "/public", b"x"))
            .await
            .unwrap();
        assert_eq!(put_bucket.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_put_empty_body_is_invalid_input() {
        let response = router()
            .oneshot(request("PUT", "/public/empty.txt", b""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
