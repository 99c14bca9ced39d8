//! `wiki serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use wiki_config::{CliSettings, Config};
use wiki_server::{run_server, server_config_from_wiki_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover wiki.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file (overrides config).
    #[arg(short, long, env = "WIKI_DATABASE")]
    database: Option<PathBuf>,

    /// Maximum number of pooled database connections (overrides config).
    #[arg(long)]
    pool_size: Option<u32>,

    /// Enable verbose output (request and store logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::info!(
            host = %config.server.host,
            port = config.server.port,
            config_file = ?config.config_path,
            "Configuration loaded"
        );

        output.highlight(&format!(
            "Starting wiki on http://{}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Database: {}",
            config.database_resolved.path.display()
        ));
        output.info(&format!(
            "Connection pool size: {}",
            config.database_resolved.pool_size
        ));
        if let Some(path) = &config.config_path {
            output.info(&format!("Config file: {}", path.display()));
        }

        let server_config = server_config_from_wiki_config(&config);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Build config overrides from command-line flags.
    pub(crate) fn cli_settings(&self) -> CliSettings {
        CliSettings {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            pool_size: self.pool_size,
        }
    }
}
