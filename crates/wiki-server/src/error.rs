//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use wiki_renderer::RenderError;
use wiki_store::StoreError;

/// Request handling error.
///
/// Store and render failures are opaque to the client: the cause is logged
/// and the response is a bare 500.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Page store failure (connection, constraint, missing row).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Markdown or template rendering failure.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Form `id` field is not an integer.
    #[error("Invalid page id: {0:?}")]
    InvalidId(String),

    /// Form `title` field is blank.
    #[error("Page title is blank")]
    BlankTitle,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidId(_) | Self::BlankTitle => {
                tracing::warn!(error = %self, "Rejected request");
                StatusCode::BAD_REQUEST
            }
            Self::Store(_) | Self::Render(_) => {
                tracing::error!(error = %self, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, status.canonical_reason().unwrap_or_default()).into_response()
    }
}
