//! Deterministic cache key construction.
//!
//! Keys are built from a namespace, an entity id, and an optional parameter
//! bag. The parameter bag is encoded as canonical JSON (object keys sorted
//! recursively, compact form) so the same logical request always yields the
//! same key regardless of how the caller assembled its parameters.
//!
//! ## Key Format
//!
//! `namespace:id` or `namespace:id:{"param":...}` — e.g.
//! `progresso_usuario:42` or `questoes_semana:tjsp-2026:{"semana":12}`.

use std::fmt::Display;

use serde_json::Value;

use crate::error::{CacheError, Result};

/// Builds a cache key from a namespace and an entity id.
pub fn cache_key(namespace: &str, id: impl Display) -> Result<String> {
    let id = id.to_string();
    validate_component(namespace, "namespace")?;
    if id.is_empty() {
        return Err(CacheError::invalid_key("id must not be empty"));
    }
    Ok(format!("{namespace}:{id}"))
}

/// Builds a cache key from a namespace, an entity id, and a parameter bag.
///
/// The parameters are appended in canonical JSON form. `Value::Null` is
/// treated as "no parameters" so callers can thread an `Option`-like value
/// through without branching.
pub fn cache_key_with_params(namespace: &str, id: impl Display, params: &Value) -> Result<String> {
    let base = cache_key(namespace, id)?;
    if params.is_null() {
        return Ok(base);
    }
    Ok(format!("{base}:{}", canonical_json(params)))
}

/// Serializes a JSON value with object keys sorted recursively.
///
/// `serde_json::Map` preserves insertion order, so two structurally equal
/// objects built in different orders would otherwise stringify differently.
#[must_use]
pub fn canonical_json(value: &Value) -> String {
    fn write(value: &Value, out: &mut String) {
        match value {
            Value::Object(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                out.push('{');
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    // Key serialization through serde_json handles escaping.
                    out.push_str(&Value::String((*key).clone()).to_string());
                    out.push(':');
                    write(&map[*key], out);
                }
                out.push('}');
            }
            Value::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write(item, out);
                }
                out.push(']');
            }
            other => out.push_str(&other.to_string()),
        }
    }

    let mut out = String::new();
    write(value, &mut out);
    out
}

fn validate_component(component: &str, name: &str) -> Result<()> {
    if component.trim().is_empty() {
        return Err(CacheError::invalid_key(format!("{name} must not be empty")));
    }
    if component.contains(':') {
        return Err(CacheError::invalid_key(format!(
            "{name} must not contain ':' (got {component:?})"
        )));
    }
    Ok(())
}
