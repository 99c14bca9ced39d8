//! Form endpoints: create, save, delete.
//!
//! All three answer with `303 See Other` on success.

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;
use wiki_renderer::page_path;

use crate::error::ServerError;
use crate::state::AppState;

/// Form value marking a save as the first one for its name.
const NEW_PAGE_YES: &str = "yes";

/// Body of POST /create.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateForm {
    #[serde(default)]
    name: String,
}

/// Body of POST /save.
#[derive(Debug, Deserialize)]
pub(crate) struct SaveForm {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    markdown: String,
    #[serde(default, rename = "newPage")]
    new_page: String,
}

/// Body of POST /delete.
#[derive(Debug, Deserialize)]
pub(crate) struct DeleteForm {
    #[serde(default)]
    id: String,
}

/// Handle POST /create.
///
/// Only computes the target URL; nothing is stored until the page is saved.
pub(crate) async fn create_page(Form(form): Form<CreateForm>) -> Redirect {
    if form.name.trim().is_empty() {
        return home();
    }
    tracing::info!(page = %form.name, "Creating page");
    Redirect::to(&page_path(&form.name))
}

/// Handle POST /save.
///
/// Inserts a row for new pages and replaces the content of existing ones.
/// A blank title is rejected since no page route can reach it.
pub(crate) async fn save_page(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SaveForm>,
) -> Result<Redirect, ServerError> {
    if form.title.trim().is_empty() {
        return Err(ServerError::BlankTitle);
    }

    if form.new_page == NEW_PAGE_YES {
        let id = state.store.insert(&form.title, &form.markdown).await?;
        tracing::info!(page = %form.title, id, "Created page");
    } else {
        let id = parse_id(&form.id).ok_or_else(|| ServerError::InvalidId(form.id.clone()))?;
        state.store.update_by_id(id, &form.markdown).await?;
        tracing::info!(page = %form.title, id, "Saved page");
    }

    Ok(Redirect::to(&page_path(&form.title)))
}

/// Handle POST /delete.
///
/// Redirects home whether or not the row existed.
pub(crate) async fn delete_page(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect, ServerError> {
    match parse_id(&form.id) {
        Some(id) => {
            state.store.delete_by_id(id).await?;
            tracing::info!(id, "Deleted page");
        }
        // No row can have a non-numeric id
        None => tracing::debug!(id = %form.id, "Ignoring delete of unparsable id"),
    }

    Ok(home())
}

/// Parse a form `id` field.
fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Redirect to the home page.
fn home() -> Redirect {
    Redirect::to("/")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id(" -1 "), Some(-1));
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("abc"), None);
    }

    #[test]
    fn test_save_form_field_names() {
        let form: SaveForm =
            serde_urlencoded::from_str("id=3&title=Home&markdown=%23+Hi&newPage=yes").unwrap();

        assert_eq!(form.id, "3");
        assert_eq!(form.title, "Home");
        assert_eq!(form.markdown, "# Hi");
        assert_eq!(form.new_page, "yes");
    }

    #[test]
    fn test_forms_default_missing_fields() {
        let form: SaveForm = serde_urlencoded::from_str("").unwrap();
        assert_eq!(form.new_page, "");

        let form: CreateForm = serde_urlencoded::from_str("").unwrap();
        assert_eq!(form.name, "");
    }
}
