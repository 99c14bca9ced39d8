//! Home page.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use maud::Render;
use wiki_renderer::IndexView;

use crate::error::ServerError;
use crate::state::AppState;

/// Title of the home page.
const INDEX_TITLE: &str = "Wiki Home";

/// Handle GET /.
pub(crate) async fn get_index(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    let pages = state.store.list_names().await?;
    tracing::info!(pages = pages.len(), "Rendering index");

    let view = IndexView {
        title: INDEX_TITLE.to_owned(),
        pages,
    };
    Ok(Html(view.render().into_string()))
}
