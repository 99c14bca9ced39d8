//! HTTP request handlers.

pub(crate) mod forms;
pub(crate) mod index;
pub(crate) mod pages;

use axum::http::StatusCode;

/// Fallback for unknown paths and unsupported methods.
pub(crate) async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
