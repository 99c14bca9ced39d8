//! HTTP server for the wiki.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - `GET /` - index of all page names
//! - `GET /wiki/{page}` - a rendered page with its edit form
//! - `POST /create`, `POST /save`, `POST /delete` - form endpoints that
//!   answer with `303 See Other`
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use wiki_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 8080,
//!         database_path: PathBuf::from("db/wiki.sqlite"),
//!         pool_size: 33,
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (wiki-server)
//!                        │
//!                        ├─► handlers ──► PageStore (wiki-store) ──► SQLite pool
//!                        │
//!                        └─► MarkdownRenderer + IndexView/PageView (wiki-renderer)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use wiki_renderer::MarkdownRenderer;
use wiki_store::PageStore;

use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Maximum number of pooled database connections.
    pub pool_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            database_path: PathBuf::from("db/wiki.sqlite"),
            pool_size: 33,
        }
    }
}

/// Run the server.
///
/// The database is opened and its schema prepared before the listener is
/// bound; if either step fails the server never starts listening.
///
/// # Errors
///
/// Returns an error if the database cannot be prepared or the server fails
/// to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(path = %config.database_path.display(), "Preparing database");
    let store = PageStore::connect(&config.database_path, config.pool_size)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Could not open a database connection"))?;
    store
        .ensure_schema()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Database preparation error"))?;

    let state = Arc::new(AppState {
        store: store.clone(),
        markdown: MarkdownRenderer::new(),
    });
    let app = app::create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Could not start HTTP server"))?;
    tracing::info!(address = %listener.local_addr()?, "HTTP server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from wiki config.
#[must_use]
pub fn server_config_from_wiki_config(config: &wiki_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        database_path: config.database_resolved.path.clone(),
        pool_size: config.database_resolved.pool_size,
    }
}
