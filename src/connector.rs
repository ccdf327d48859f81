//! Freshdesk connector
//!
//! Ties the configuration, the API client and the sync engine together
//! behind the three connector operations: check, discover and sync.

use crate::config::{Catalog, ConnectorConfig};
use crate::engine::{SyncEngine, SyncStats};
use crate::error::Result;
use crate::http::HttpClient;
use crate::output::MessageSink;
use crate::schema;
use crate::state::StateManager;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ============================================================================
// Check Result
// ============================================================================

/// Result of a connection check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// Connector
// ============================================================================

/// A configured Freshdesk connector
pub struct FreshdeskConnector {
    config: ConnectorConfig,
    client: HttpClient,
}

impl FreshdeskConnector {
    /// Create a connector, validating the config and building the client
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::from_connector_config(&config)?;
        Ok(Self { config, client })
    }

    /// Create a connector around an existing client
    pub fn with_client(config: ConnectorConfig, client: HttpClient) -> Self {
        Self { config, client }
    }

    /// The connector configuration
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// The API client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Tests if the credentials are accepted by the API
    pub async fn check(&self) -> CheckResult {
        match self.client.check().await {
            Ok(()) => CheckResult::success(),
            Err(e) => {
                warn!(error = %e, "Connection check failed");
                CheckResult::failure(e.to_string())
            }
        }
    }

    /// Lists every stream with its schema and metadata
    pub async fn discover(&self) -> Result<Catalog> {
        info!("Starting discovery mode");
        schema::discover(&self.client).await
    }

    /// Build the sync engine for this connector
    pub fn into_engine(self, state: StateManager) -> Result<SyncEngine> {
        let start_date = self.config.start_cursor()?;
        Ok(SyncEngine::new(self.client, state, start_date))
    }

    /// Syncs the selected streams of `catalog` into `sink`
    pub async fn sync(
        self,
        catalog: &Catalog,
        state: StateManager,
        sink: &mut dyn MessageSink,
    ) -> Result<SyncStats> {
        info!("Starting sync mode");
        let mut engine = self.into_engine(state)?;
        engine.sync(catalog, sink).await
    }
}

impl std::fmt::Debug for FreshdeskConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreshdeskConnector")
            .field("domain", &self.config.domain)
            .field("start_date", &self.config.start_date)
            .field("client", &self.client)
            .finish()
    }
}
