//! SQLite page store for the wiki server.
//!
//! A [`PageStore`] wraps a shared connection pool over a single `Pages`
//! table. Every operation checks out a pooled connection for its own
//! duration only; there are no transactions spanning operations and no
//! retries.
//!
//! # Example
//!
//! ```ignore
//! use wiki_store::PageStore;
//!
//! let store = PageStore::connect("db/wiki.sqlite", 33).await?;
//! store.ensure_schema().await?;
//! let id = store.insert("Home", "# Welcome").await?;
//! store.update_by_id(id, "# Welcome back").await?;
//! ```

mod error;
mod store;

pub use error::StoreError;
pub use store::{PageStore, StoredPage};
