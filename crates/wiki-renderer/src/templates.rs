//! Typed page templates.
//!
//! Each view struct carries exactly the fields its document needs and
//! implements [`maud::Render`]; call `.render().into_string()` for the
//! finished HTML document.

use maud::{DOCTYPE, Markup, PreEscaped, Render, html};

use crate::page_path;

/// Home page listing all page names.
#[derive(Clone, Debug)]
pub struct IndexView {
    /// Document title.
    pub title: String,
    /// Page names, in display order.
    pub pages: Vec<String>,
}

/// Single page view with edit and delete forms.
#[derive(Clone, Debug)]
pub struct PageView {
    /// Page name, used as the document title.
    pub title: String,
    /// Row id, or the new-page sentinel.
    pub id: i64,
    /// True when no row exists for this name yet.
    pub new_page: bool,
    /// Markdown source shown in the editor.
    pub raw_content: String,
    /// Rendered HTML, inserted without escaping.
    pub content: String,
    /// Render time shown in the footer.
    pub timestamp: String,
}

impl PageView {
    /// Form value of the `newPage` field.
    #[must_use]
    pub fn new_page_flag(&self) -> &'static str {
        if self.new_page { "yes" } else { "no" }
    }
}

/// Shared document shell.
fn layout(title: &str, body: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
            }
            body {
                header {
                    nav { a href="/" { "Home" } }
                    h1 { (title) }
                }
                main { (body) }
            }
        }
    }
}

impl Render for IndexView {
    fn render(&self) -> Markup {
        let body = html! {
            form method="post" action="/create" {
                input type="text" name="name" placeholder="New page name";
                " "
                button type="submit" { "Create" }
            }
            @if self.pages.is_empty() {
                p { "No pages yet." }
            } @else {
                ul {
                    @for name in &self.pages {
                        li { a href=(page_path(name)) { (name) } }
                    }
                }
            }
        };
        layout(&self.title, &body)
    }
}

impl Render for PageView {
    fn render(&self) -> Markup {
        let body = html! {
            article { (PreEscaped(&self.content)) }
            hr;
            form method="post" action="/save" {
                input type="hidden" name="id" value=(self.id);
                input type="hidden" name="title" value=(self.title);
                input type="hidden" name="newPage" value=(self.new_page_flag());
                textarea name="markdown" rows="20" cols="80" { (self.raw_content) }
                br;
                button type="submit" { "Save" }
            }
            @if !self.new_page {
                form method="post" action="/delete" {
                    input type="hidden" name="id" value=(self.id);
                    button type="submit" { "Delete" }
                }
            }
            footer {
                p { "Rendered " (self.timestamp) }
            }
        };
        layout(&self.title, &body)
    }
}
