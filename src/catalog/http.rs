//! HTTP API for the catalog
//!
//! | Method | Path                 | Success | Failure |
//! |--------|----------------------|---------|---------|
//! | GET    | `/catalog`           | 200     | 404     |
//! | POST   | `/catalog`           | 201     | 422     |
//! | GET    | `/catalog/:barcode`  | 200     | 404     |
//! | POST   | `/catalog/:barcode`  | 202     | 422     |
//! | DELETE | `/catalog/:barcode`  | 202     | 422     |
//!
//! Any other method on those paths answers 405, HEAD included. Every
//! failure carries a JSON body `{"error": <kind>, "message": <text>}`.

use crate::catalog::service::CatalogService;
use crate::common::{request_tracing_middleware, Error, Result};
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        DefaultBodyLimit, Path, State,
    },
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

const INDEX_TEXT: &str = "\
Volume catalog API

GET    /catalog            list all volumes
POST   /catalog            create a volume
GET    /catalog/{barcode}  fetch one volume
POST   /catalog/{barcode}  replace a volume
DELETE /catalog/{barcode}  delete a volume (body names the barcode)
";

#[derive(Clone)]
pub struct CatalogState {
    pub service: CatalogService,
}

/// Creates the HTTP router with all public endpoints.
pub fn create_router(state: CatalogState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route(
            "/catalog",
            get(list_volumes)
                .post(create_volume)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route(
            "/catalog/:barcode",
            get(get_volume)
                .post(update_volume)
                .delete(delete_volume)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn(request_tracing_middleware))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

async fn index() -> &'static str {
    INDEX_TEXT
}

async fn health() -> Response {
    json_response(
        StatusCode::OK,
        &json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

async fn list_volumes(State(state): State<CatalogState>) -> Response {
    let service = state.service;
    match blocking(move || service.list_volumes()).await {
        Ok(volumes) => json_response(StatusCode::OK, &volumes),
        Err(e) => read_failure(e),
    }
}

async fn create_volume(
    State(state): State<CatalogState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let result = match read_body(body) {
        Ok(payload) => {
            let service = state.service;
            blocking(move || service.create_volume(&payload)).await
        }
        Err(e) => Err(e),
    };
    match result {
        Ok(volume) => json_response(StatusCode::CREATED, &volume),
        Err(e) => write_failure(e),
    }
}

async fn get_volume(
    State(state): State<CatalogState>,
    barcode: std::result::Result<Path<String>, PathRejection>,
) -> Response {
    let result = match read_barcode(barcode) {
        Ok(barcode) => {
            let service = state.service;
            blocking(move || service.get_volume(&barcode)).await
        }
        Err(e) => Err(e),
    };
    match result {
        Ok(volume) => json_response(StatusCode::OK, &volume),
        Err(e) => read_failure(e),
    }
}

async fn update_volume(
    State(state): State<CatalogState>,
    barcode: std::result::Result<Path<String>, PathRejection>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let result = match (read_barcode(barcode), read_body(body)) {
        (Ok(barcode), Ok(payload)) => {
            let service = state.service;
            blocking(move || service.update_volume(&barcode, &payload)).await
        }
        (Err(e), _) | (_, Err(e)) => Err(e),
    };
    match result {
        Ok(volume) => json_response(StatusCode::ACCEPTED, &volume),
        Err(e) => write_failure(e),
    }
}

async fn delete_volume(
    State(state): State<CatalogState>,
    barcode: std::result::Result<Path<String>, PathRejection>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let result = match (read_barcode(barcode), read_body(body)) {
        (Ok(barcode), Ok(payload)) => {
            let service = state.service;
            blocking(move || service.delete_volume(&barcode, &payload)).await
        }
        (Err(e), _) | (_, Err(e)) => Err(e),
    };
    match result {
        Ok(volume) => json_response(StatusCode::ACCEPTED, &volume),
        Err(e) => write_failure(e),
    }
}

async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "method_not_allowed",
        "Invalid request method.",
    )
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "not_found", "No such endpoint")
}

/// Store calls block on disk I/O, so they run off the async workers.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// A barcode segment that does not decode (e.g. invalid UTF-8) is malformed input.
fn read_barcode(barcode: std::result::Result<Path<String>, PathRejection>) -> Result<String> {
    barcode
        .map(|Path(barcode)| barcode)
        .map_err(|e| Error::Validation(format!("invalid barcode in path: {}", e)))
}

/// Over-limit and truncated bodies count as malformed payloads.
fn read_body(body: std::result::Result<Bytes, BytesRejection>) -> Result<Bytes> {
    body.map_err(|e| Error::Validation(format!("unreadable request body: {}", e)))
}

fn read_failure(err: Error) -> Response {
    let status = match err {
        Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::NOT_FOUND,
    };
    error_response(status, err.kind(), &err.to_string())
}

fn write_failure(err: Error) -> Response {
    let status = match err {
        Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    error_response(status, err.kind(), &err.to_string())
}

/// Serialize `value` as the response body, or answer 500 if that fails.
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], bytes).into_response(),
        Err(e) => {
            error!("Failed to encode response: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "failed to encode response",
            )
        }
    }
}

pub fn error_response(status: StatusCode, kind: &str, message: &str) -> Response {
    let body = json!({ "error": kind, "message": message }).to_string();
    (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response()
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "request handler panicked",
    )
}
