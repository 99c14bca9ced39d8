//! Page view endpoint.
//!
//! Looks a page up by name and renders it with its edit form. Names with
//! no stored row get placeholder content and the new-page id, and are only
//! persisted once the form is submitted.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;
use chrono::Utc;
use maud::Render;
use wiki_renderer::{NEW_PAGE_ID, PLACEHOLDER_MARKDOWN, PageView};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /wiki/{page}.
pub(crate) async fn get_page(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    let stored = state.store.get_by_name(&name).await?;
    let new_page = stored.is_none();
    let (id, raw_content) = stored.map_or_else(
        || (NEW_PAGE_ID, PLACEHOLDER_MARKDOWN.to_owned()),
        |page| (page.id, page.content),
    );
    tracing::info!(page = %name, id, new_page, "Rendering page");

    let content = state.markdown.render(&raw_content)?;

    let view = PageView {
        title: name,
        id,
        new_page,
        raw_content,
        content,
        timestamp: timestamp(),
    };
    Ok(Html(view.render().into_string()))
}

/// Current time, e.g. `Mon Jan 05 10:00:00 UTC 2026`.
fn timestamp() -> String {
    Utc::now().format("%a %b %d %H:%M:%S UTC %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp();
        let parts: Vec<&str> = ts.split(' ').collect();

        assert_eq!(parts.len(), 6, "unexpected timestamp: {ts}");
        assert_eq!(parts[4], "UTC");
        assert_eq!(parts[3].len(), 8);
    }
}
