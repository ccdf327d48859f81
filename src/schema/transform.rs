//! Schema conformance for outgoing records
//!
//! Records are reshaped to the catalog schema before they are emitted:
//! fields the schema does not know are dropped, deselected fields are
//! dropped, and scalar values are coerced to the declared type where that is
//! lossless (numeric strings, `0`/`1` booleans, and so on).

use super::types::{JsonType, JsonTypeOrArray};
use crate::config::CatalogEntry;
use crate::error::{Error, Result};
use crate::state::Cursor;
use crate::types::{JsonObject, JsonValue};

/// Transform a record to match its catalog entry
pub fn transform_record(record: JsonValue, entry: &CatalogEntry) -> Result<JsonValue> {
    let JsonValue::Object(fields) = record else {
        return Err(Error::transform(
            "",
            format!("expected a record object, got {}", JsonType::of(&record)),
        ));
    };

    let Some(properties) = entry.schema.get("properties").and_then(JsonValue::as_object) else {
        return Ok(JsonValue::Object(fields));
    };

    let mut out = JsonObject::new();
    for (name, value) in fields {
        let Some(property) = properties.get(&name) else {
            continue;
        };
        if !entry.is_property_selected(&name) {
            continue;
        }
        let value = transform_value(value, property, &name)?;
        out.insert(name, value);
    }

    Ok(JsonValue::Object(out))
}

/// Transform one value against a schema node
///
/// Nodes without a readable `type` keyword accept any value unchanged.
pub fn transform_value(value: JsonValue, schema: &JsonValue, path: &str) -> Result<JsonValue> {
    let Some(types) = JsonTypeOrArray::from_schema(schema) else {
        return Ok(value);
    };

    if value.is_null() {
        return if types.is_nullable() {
            Ok(JsonValue::Null)
        } else {
            Err(Error::transform(path, format!("null is not a {types}")))
        };
    }

    for json_type in types.types() {
        if let Some(coerced) = coerce(&value, *json_type, schema, path)? {
            return Ok(coerced);
        }
    }

    Err(Error::transform(
        path,
        format!("expected {types}, got {}", JsonType::of(&value)),
    ))
}

/// Try to express `value` as `json_type`
///
/// `Ok(None)` means the value does not fit this type; errors come from
/// nested values that fit no alternative.
fn coerce(
    value: &JsonValue,
    json_type: JsonType,
    schema: &JsonValue,
    path: &str,
) -> Result<Option<JsonValue>> {
    let coerced = match (json_type, value) {
        (JsonType::Null, _) => None,

        (JsonType::Integer, JsonValue::Number(n)) => {
            if n.is_i64() || n.is_u64() {
                Some(value.clone())
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| JsonValue::from(f as i64))
            }
        }
        (JsonType::Integer, JsonValue::String(s)) => {
            s.trim().parse::<i64>().ok().map(JsonValue::from)
        }

        (JsonType::Number, JsonValue::Number(_)) => Some(value.clone()),
        (JsonType::Number, JsonValue::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(JsonValue::Number),

        (JsonType::Boolean, JsonValue::Bool(_)) => Some(value.clone()),
        (JsonType::Boolean, JsonValue::String(s)) => match s.trim().to_ascii_lowercase().as_str()
        {
            "true" => Some(JsonValue::Bool(true)),
            "false" => Some(JsonValue::Bool(false)),
            _ => None,
        },
        (JsonType::Boolean, JsonValue::Number(n)) => match n.as_i64() {
            Some(0) => Some(JsonValue::Bool(false)),
            Some(1) => Some(JsonValue::Bool(true)),
            _ => None,
        },

        (JsonType::String, JsonValue::String(s)) => {
            if is_date_time(schema) && s.parse::<Cursor>().is_err() {
                None
            } else {
                Some(value.clone())
            }
        }
        (JsonType::String, JsonValue::Number(n)) if !is_date_time(schema) => {
            Some(JsonValue::String(n.to_string()))
        }
        (JsonType::String, JsonValue::Bool(b)) if !is_date_time(schema) => {
            Some(JsonValue::String(b.to_string()))
        }

        (JsonType::Object, JsonValue::Object(map)) => Some(transform_object(map, schema, path)?),

        (JsonType::Array, JsonValue::Array(items)) => {
            let item_schema = schema.get("items");
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                out.push(match item_schema {
                    Some(s) => transform_value(item.clone(), s, &item_path)?,
                    None => item.clone(),
                });
            }
            Some(JsonValue::Array(out))
        }

        _ => None,
    };

    Ok(coerced)
}

fn transform_object(map: &JsonObject, schema: &JsonValue, path: &str) -> Result<JsonValue> {
    let properties = match schema.get("properties").and_then(JsonValue::as_object) {
        Some(p) if !p.is_empty() => p,
        _ => return Ok(JsonValue::Object(map.clone())),
    };

    let mut out = JsonObject::new();
    for (name, value) in map {
        if let Some(property) = properties.get(name) {
            let child = format!("{path}.{name}");
            out.insert(name.clone(), transform_value(value.clone(), property, &child)?);
        }
    }
    Ok(JsonValue::Object(out))
}

fn is_date_time(schema: &JsonValue) -> bool {
    schema.get("format").and_then(JsonValue::as_str) == Some("date-time")
}
