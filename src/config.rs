//! Configuration and catalog types
//!
//! This module contains the connector configuration loaded from the
//! user's config file and the catalog structures that describe which
//! streams (and which fields) are selected for sync.

use crate::error::{Error, Result};
use crate::state::Cursor;
use crate::types::{JsonObject, JsonValue, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Connector Config
// ============================================================================

/// Connector configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Freshdesk API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Freshdesk subdomain (the `acme` in `acme.freshdesk.com`)
    #[serde(default)]
    pub domain: Option<String>,

    /// Cursor used by incremental streams without saved state
    pub start_date: String,

    /// User agent sent with every request
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,

    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Highest page number the API serves before a filter reset is needed
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Request budget
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

fn default_timeout() -> u64 {
    300
}

fn default_page_size() -> u32 {
    100
}

fn default_page_limit() -> u32 {
    300
}

impl ConnectorConfig {
    /// Create a config with the required fields and defaults for the rest
    pub fn new(
        domain: impl Into<String>,
        api_key: impl Into<String>,
        start_date: impl Into<String>,
    ) -> Self {
        Self {
            api_key: Some(api_key.into()),
            domain: Some(domain.into()),
            start_date: start_date.into(),
            user_agent: None,
            request_timeout_seconds: default_timeout(),
            page_size: default_page_size(),
            page_limit: default_page_limit(),
            rate_limit: RateLimitSettings::default(),
        }
    }

    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate config JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;

        let missing: Vec<&str> = ["api_key", "domain", "start_date"]
            .into_iter()
            .filter(|key| value.get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::missing_field(missing.join(", ")));
        }

        let config: Self = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate value ranges and the start date
    pub fn validate(&self) -> Result<()> {
        self.start_cursor()?;

        if self.page_size == 0 {
            return Err(Error::InvalidConfigValue {
                field: "page_size".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.page_limit == 0 {
            return Err(Error::InvalidConfigValue {
                field: "page_limit".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.rate_limit.limit == 0 {
            return Err(Error::InvalidConfigValue {
                field: "rate_limit.limit".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// The configured start date as a cursor
    pub fn start_cursor(&self) -> Result<Cursor> {
        self.start_date
            .parse()
            .map_err(|_| Error::InvalidConfigValue {
                field: "start_date".to_string(),
                message: format!("'{}' is not an ISO-8601 timestamp", self.start_date),
            })
    }

    /// Credentials, failing if either part is absent
    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::new(
            self.domain.clone().unwrap_or_default(),
            self.api_key.clone().unwrap_or_default(),
        )
    }
}

/// Requests allowed per interval
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Requests allowed in one interval
    #[serde(default = "default_rate_limit")]
    pub limit: usize,

    /// Interval length in seconds
    #[serde(default = "default_rate_every")]
    pub every_seconds: f64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            limit: default_rate_limit(),
            every_seconds: default_rate_every(),
        }
    }
}

fn default_rate_limit() -> usize {
    1
}

fn default_rate_every() -> f64 {
    2.0
}

// ============================================================================
// Credentials
// ============================================================================

/// Subdomain and API key for HTTP Basic authentication
#[derive(Clone)]
pub struct Credentials {
    domain: String,
    api_key: String,
}

impl Credentials {
    /// Create credentials; both parts must be non-empty
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let domain = domain
            .into()
            .none_if_empty()
            .ok_or_else(|| Error::missing_field("domain"))?;
        let api_key = api_key
            .into()
            .none_if_empty()
            .ok_or_else(|| Error::missing_field("api_key"))?;
        Ok(Self { domain, api_key })
    }

    /// The account subdomain
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The API key (sent as the Basic auth username)
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("domain", &self.domain)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Catalog of streams (discovered or selected)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog entries
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    /// Load a catalog file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read catalog file {}: {e}", path.display()))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::config(format!("Invalid catalog JSON: {e}")))
    }

    /// Entries marked as selected, in catalog order
    pub fn selected_streams(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.streams.iter().filter(|s| s.is_selected())
    }

    /// Find an entry by stream id
    pub fn get_stream(&self, tap_stream_id: &str) -> Option<&CatalogEntry> {
        self.streams
            .iter()
            .find(|s| s.tap_stream_id == tap_stream_id)
    }
}

/// One stream in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stream name
    pub stream: String,

    /// Stream id used for state and message routing
    pub tap_stream_id: String,

    /// JSON schema for the stream's records
    #[serde(default)]
    pub schema: JsonValue,

    /// Primary key fields
    #[serde(default)]
    pub key_properties: Vec<String>,

    /// Breadcrumb metadata
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

impl CatalogEntry {
    /// Metadata for a breadcrumb (empty breadcrumb = stream level)
    pub fn metadata_for(&self, breadcrumb: &[&str]) -> Option<&JsonObject> {
        self.metadata
            .iter()
            .find(|m| m.breadcrumb.iter().map(String::as_str).eq(breadcrumb.iter().copied()))
            .map(|m| &m.metadata)
    }

    /// Stream-level metadata
    pub fn root_metadata(&self) -> Option<&JsonObject> {
        self.metadata_for(&[])
    }

    /// Whether the stream is selected for sync
    pub fn is_selected(&self) -> bool {
        self.root_metadata()
            .and_then(|m| m.get("selected"))
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }

    /// Whether a top-level property should be emitted
    ///
    /// Fields are kept unless explicitly deselected; `automatic` fields are
    /// always kept.
    pub fn is_property_selected(&self, property: &str) -> bool {
        let Some(meta) = self.metadata_for(&["properties", property]) else {
            return true;
        };
        match meta.get("inclusion").and_then(JsonValue::as_str) {
            Some("automatic") => true,
            Some("unsupported") => false,
            _ => meta
                .get("selected")
                .and_then(JsonValue::as_bool)
                .unwrap_or(true),
        }
    }

    /// Mark the stream as selected
    pub fn select(&mut self) {
        if let Some(entry) = self.metadata.iter_mut().find(|m| m.breadcrumb.is_empty()) {
            entry
                .metadata
                .insert("selected".to_string(), JsonValue::Bool(true));
        } else {
            let mut metadata = JsonObject::new();
            metadata.insert("selected".to_string(), JsonValue::Bool(true));
            self.metadata.push(MetadataEntry {
                breadcrumb: Vec::new(),
                metadata,
            });
        }
    }
}

/// Metadata attached to a breadcrumb path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Path into the schema (empty = stream level)
    #[serde(default)]
    pub breadcrumb: Vec<String>,

    /// Metadata values
    #[serde(default)]
    pub metadata: JsonObject,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_config() {
        let config = ConnectorConfig::from_json(
            r#"{"api_key": "key", "domain": "acme", "start_date": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(config.domain.as_deref(), Some("acme"));
        assert_eq!(config.page_size, 100);
        assert_eq!(config.page_limit, 300);
        assert_eq!(config.rate_limit.limit, 1);
        assert!((config.rate_limit.every_seconds - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_missing_keys() {
        let err = ConnectorConfig::from_json(r#"{"api_key": "key"}"#).unwrap_err();
        assert!(
            matches!(err, Error::MissingConfigField { ref field } if field == "domain, start_date")
        );
        assert_eq!(
            err.to_string(),
            "Missing required config field: domain, start_date"
        );
    }

    #[test]
    fn test_config_invalid_start_date() {
        let err = ConnectorConfig::from_json(
            r#"{"api_key": "key", "domain": "acme", "start_date": "yesterday"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "start_date"));
    }

    #[test]
    fn test_credentials_require_both_parts() {
        let err = Credentials::new("", "key").unwrap_err();
        assert_eq!(err.to_string(), "Missing required config field: domain");

        let err = Credentials::new("acme", " ").unwrap_err();
        assert_eq!(err.to_string(), "Missing required config field: api_key");

        let creds = Credentials::new("acme", "key").unwrap();
        assert_eq!(creds.domain(), "acme");
        assert!(!format!("{creds:?}").contains("\"key\""));
    }

    #[test]
    fn test_catalog_selection() {
        let catalog: Catalog = serde_json::from_value(json!({
            "streams": [
                {
                    "stream": "agents",
                    "tap_stream_id": "agents",
                    "schema": {"type": "object"},
                    "key_properties": ["id"],
                    "metadata": [
                        {"breadcrumb": [], "metadata": {"selected": true}},
                        {"breadcrumb": ["properties", "email"], "metadata": {"selected": false}},
                        {"breadcrumb": ["properties", "id"], "metadata": {"inclusion": "automatic", "selected": false}}
                    ]
                },
                {
                    "stream": "groups",
                    "tap_stream_id": "groups",
                    "schema": {"type": "object"},
                    "metadata": []
                }
            ]
        }))
        .unwrap();

        let selected: Vec<_> = catalog.selected_streams().map(|s| s.stream.as_str()).collect();
        assert_eq!(selected, vec!["agents"]);

        let agents = catalog.get_stream("agents").unwrap();
        assert!(!agents.is_property_selected("email"));
        assert!(agents.is_property_selected("id"));
        assert!(agents.is_property_selected("name"));
    }

    #[test]
    fn test_catalog_entry_select() {
        let mut entry = CatalogEntry {
            stream: "roles".to_string(),
            tap_stream_id: "roles".to_string(),
            schema: json!({}),
            key_properties: vec!["id".to_string()],
            metadata: Vec::new(),
        };
        assert!(!entry.is_selected());
        entry.select();
        assert!(entry.is_selected());
    }
}
