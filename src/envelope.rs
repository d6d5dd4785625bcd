//! Decoding of server payloads into products.
//!
//! The "list all" response shape depends on the backend flavour:
//!
//! - local REST: a bare array
//! - document store: `{"record": {"products": [...]}}`
//! - hosted REST: a bare array, or the array under `products` or `data`

use serde_json::Value;

use crate::config::Backend;
use crate::error::{CatalogError, Result};
use crate::models::Product;

/// Decode a "list all" payload for the given backend.
pub fn decode_collection(backend: Backend, payload: Value) -> Result<Vec<Product>> {
    let array = match backend {
        Backend::LocalRest => payload,
        Backend::DocumentStore => take_path(payload, &["record", "products"])?,
        Backend::HostedRest => match payload {
            Value::Array(_) => payload,
            Value::Object(mut obj) => obj
                .remove("products")
                .or_else(|| obj.remove("data"))
                .ok_or_else(|| {
                    CatalogError::Envelope("expected an array, 'products' or 'data'".into())
                })?,
            other => other,
        },
    };

    if !array.is_array() {
        return Err(CatalogError::Envelope(format!(
            "expected a product array for {backend} backend, got {}",
            kind_of(&array)
        )));
    }
    Ok(serde_json::from_value(array)?)
}

/// Decode a single-product response (create, update, replace).
///
/// The document store may wrap the record as `{"record": {...}}`.
pub fn decode_item(backend: Backend, payload: Value) -> Result<Product> {
    let item = match (backend, payload) {
        (Backend::DocumentStore, Value::Object(mut obj)) if obj.contains_key("record") => {
            obj.remove("record").unwrap_or(Value::Null)
        }
        (_, other) => other,
    };
    Ok(serde_json::from_value(item)?)
}

fn take_path(mut value: Value, path: &[&str]) -> Result<Value> {
    for key in path {
        value = match value {
            Value::Object(mut obj) => obj.remove(*key).ok_or_else(|| {
                CatalogError::Envelope(format!("missing key '{key}' in {}", path.join(".")))
            })?,
            other => {
                return Err(CatalogError::Envelope(format!(
                    "expected an object at '{key}', got {}",
                    kind_of(&other)
                )))
            }
        };
    }
    Ok(value)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
