//! Catalog discovery
//!
//! Builds the catalog from the embedded stream schemas. Streams with
//! account-specific custom fields get one schema property per custom field,
//! typed from the field's Freshdesk type.

use super::embedded::load_schema;
use super::types::{JsonType, JsonTypeOrArray};
use crate::config::{Catalog, CatalogEntry, MetadataEntry};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::PageRequest;
use crate::streams::{all_streams, StreamDefinition};
use crate::types::{JsonObject, JsonValue, ReplicationMethod};
use serde_json::json;
use tracing::{debug, info, warn};

/// Schema for a custom field of the given Freshdesk type
///
/// Unrecognised types are treated as strings.
pub fn map_type(field_type: &str) -> JsonValue {
    let json_type = match field_type {
        "custom_number" | "custom_decimal" => JsonType::Number,
        "custom_checkbox" => JsonType::Boolean,
        _ => JsonType::String,
    };
    json!({ "type": JsonTypeOrArray::nullable(json_type) })
}

/// Add custom field properties to a stream schema
///
/// Built-in (`default`) fields are skipped, nested fields contribute each of
/// their levels, and the `custom_fields` container property is removed since
/// records are flattened before emission.
pub fn apply_custom_fields(schema: &mut JsonValue, fields: &[JsonValue]) -> Result<()> {
    let properties = schema
        .get_mut("properties")
        .and_then(JsonValue::as_object_mut)
        .ok_or_else(|| Error::Other("Stream schema has no properties".to_string()))?;

    for field in fields {
        if field.get("default").and_then(JsonValue::as_bool).unwrap_or(false) {
            continue;
        }
        let Some(name) = field.get("name").and_then(JsonValue::as_str) else {
            warn!(?field, "Skipping custom field without a name");
            continue;
        };
        let field_type = field.get("type").and_then(JsonValue::as_str).unwrap_or_default();
        properties.insert(name.to_string(), map_type(field_type));

        if field_type == "nested_field" {
            let nested = field
                .get("nested_ticket_fields")
                .and_then(JsonValue::as_array)
                .into_iter()
                .flatten();
            for nested_field in nested {
                if let Some(nested_name) = nested_field.get("name").and_then(JsonValue::as_str) {
                    properties.insert(nested_name.to_string(), map_type(field_type));
                }
            }
        }
    }

    properties.remove("custom_fields");
    Ok(())
}

/// Standard stream and property metadata
///
/// Key properties and replication keys are `automatic`; every other
/// property is `available`.
pub fn standard_metadata(
    schema: &JsonValue,
    key_properties: &[&str],
    replication_keys: &[&str],
    replication_method: ReplicationMethod,
) -> Vec<MetadataEntry> {
    let mut root = JsonObject::new();
    root.insert("table-key-properties".to_string(), json!(key_properties));
    root.insert(
        "forced-replication-method".to_string(),
        json!(replication_method.as_str()),
    );
    if !replication_keys.is_empty() {
        root.insert("valid-replication-keys".to_string(), json!(replication_keys));
    }

    let mut entries = vec![MetadataEntry {
        breadcrumb: Vec::new(),
        metadata: root,
    }];

    if let Some(properties) = schema.get("properties").and_then(JsonValue::as_object) {
        for name in properties.keys() {
            let automatic = key_properties.contains(&name.as_str())
                || replication_keys.contains(&name.as_str());
            let mut metadata = JsonObject::new();
            metadata.insert(
                "inclusion".to_string(),
                json!(if automatic { "automatic" } else { "available" }),
            );
            entries.push(MetadataEntry {
                breadcrumb: vec!["properties".to_string(), name.clone()],
                metadata,
            });
        }
    }

    entries
}

/// Catalog entry for a stream with the given schema
pub fn catalog_entry(definition: &dyn StreamDefinition, schema: JsonValue) -> CatalogEntry {
    let metadata = standard_metadata(
        &schema,
        definition.key_properties(),
        definition.replication_keys(),
        definition.replication_method(),
    );
    CatalogEntry {
        stream: definition.stream_id().to_string(),
        tap_stream_id: definition.stream_id().to_string(),
        schema,
        key_properties: definition
            .key_properties()
            .iter()
            .map(ToString::to_string)
            .collect(),
        metadata,
    }
}

/// Discover every stream, fetching custom fields from the account
pub async fn discover(client: &HttpClient) -> Result<Catalog> {
    let mut streams = Vec::new();

    for definition in all_streams() {
        let stream_id = definition.stream_id();
        let mut schema = load_schema(stream_id)?;

        if let Some(endpoint) = definition.custom_fields_endpoint() {
            let fields = client.get_all(PageRequest::new(endpoint)).await?;
            debug!(stream = stream_id, endpoint, count = fields.len(), "Fetched custom fields");
            apply_custom_fields(&mut schema, &fields)?;
        }

        streams.push(catalog_entry(definition.as_ref(), schema));
    }

    info!(streams = streams.len(), "Discovery complete");
    Ok(Catalog { streams })
}
