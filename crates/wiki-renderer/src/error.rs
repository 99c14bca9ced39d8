//! Rendering error types.

/// Rendering error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Writing Markdown output failed.
    #[error("Markdown rendering failed: {0}")]
    Markdown(#[from] std::fmt::Error),
}
