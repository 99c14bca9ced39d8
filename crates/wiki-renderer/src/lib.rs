//! Markdown and page template rendering for the wiki server.
//!
//! - [`MarkdownRenderer`] turns raw page content into an HTML fragment
//!   using `pulldown-cmark` with GFM extensions.
//! - [`IndexView`] and [`PageView`] are typed `maud` templates for the two
//!   documents the wiki serves.
//!
//! # Example
//!
//! ```
//! use maud::Render;
//! use wiki_renderer::{MarkdownRenderer, PageView, PLACEHOLDER_MARKDOWN};
//!
//! let content = MarkdownRenderer::new().render(PLACEHOLDER_MARKDOWN).unwrap();
//! let view = PageView {
//!     title: "Sandbox".to_owned(),
//!     id: -1,
//!     new_page: true,
//!     raw_content: PLACEHOLDER_MARKDOWN.to_owned(),
//!     content,
//!     timestamp: String::new(),
//! };
//! assert!(view.render().into_string().contains("A new page"));
//! ```

mod error;
mod markdown;
mod templates;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

pub use error::RenderError;
pub use markdown::MarkdownRenderer;
pub use templates::{IndexView, PageView};

/// Markdown shown for a page that has not been saved yet.
pub const PLACEHOLDER_MARKDOWN: &str = "# A new page\n\nFeel-free to write in Markdown!~\n";

/// Id given to a page that has no stored row.
pub const NEW_PAGE_ID: i64 = -1;

/// Characters escaped in a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// URL path of the page called `name`.
///
/// Names made only of dots are fully escaped so clients do not collapse them
/// as `.` or `..` path segments.
///
/// # Examples
///
/// ```
/// use wiki_renderer::page_path;
///
/// assert_eq!(page_path("Home"), "/wiki/Home");
/// assert_eq!(page_path("a b/c"), "/wiki/a%20b%2Fc");
/// assert_eq!(page_path(".."), "/wiki/%2E%2E");
/// ```
pub fn page_path(name: &str) -> String {
    if !name.is_empty() && name.bytes().all(|b| b == b'.') {
        return format!("/wiki/{}", "%2E".repeat(name.len()));
    }
    format!("/wiki/{}", utf8_percent_encode(name, PATH_SEGMENT))
}
