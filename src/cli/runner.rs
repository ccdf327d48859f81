//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{Catalog, ConnectorConfig};
use crate::connector::FreshdeskConnector;
use crate::error::{Error, Result, ResultExt};
use crate::output::JsonLinesWriter;
use crate::state::StateManager;
use serde_json::{json, Value};
use std::path::Path;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Discover => self.discover().await,
            Commands::Sync { catalog } => self.sync(catalog.as_deref()).await,
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<ConnectorConfig> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Config file not specified (use --config)"))?;
        ConnectorConfig::from_file(path)
    }

    /// Load state
    fn load_state(&self) -> Result<StateManager> {
        // Inline state takes precedence
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
                .with_context(|| format!("Failed to load state {}", path.display()))
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Load catalog
    fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
        match path {
            Some(path) => Catalog::from_file(path),
            None => {
                warn!("No catalog given, nothing will be synced");
                Ok(Catalog::default())
            }
        }
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let connector = FreshdeskConnector::new(self.load_config()?)?;
        let result = connector.check().await;

        let (status, message) = if result.success {
            ("SUCCEEDED", "Connection successful".to_string())
        } else {
            (
                "FAILED",
                format!(
                    "Connection failed: {}",
                    result.message.unwrap_or_default()
                ),
            )
        };

        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": status,
                "message": message
            }
        }));

        Ok(())
    }

    /// Discover streams
    async fn discover(&self) -> Result<()> {
        let connector = FreshdeskConnector::new(self.load_config()?)?;
        let catalog = connector.discover().await?;
        self.output_message(&serde_json::to_value(&catalog)?);
        Ok(())
    }

    /// Sync selected streams
    async fn sync(&self, catalog_path: Option<&Path>) -> Result<()> {
        let connector = FreshdeskConnector::new(self.load_config()?)?;
        let catalog = Self::load_catalog(catalog_path)?;
        let state = self.load_state()?;

        let mut writer = JsonLinesWriter::stdout();
        let stats = connector.sync(&catalog, state, &mut writer).await?;

        info!(
            messages = writer.messages_written(),
            records = stats.records_synced,
            "Finished sync"
        );
        Ok(())
    }

    /// Print a message on stdout
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
