//! Application state.
//!
//! Shared state for all request handlers.

use wiki_renderer::MarkdownRenderer;
use wiki_store::PageStore;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Page store backed by the shared connection pool.
    pub(crate) store: PageStore,
    /// Markdown to HTML renderer.
    pub(crate) markdown: MarkdownRenderer,
}
