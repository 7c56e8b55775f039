// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Serialization back to plain data.
//!
//! Generated `to_map` impls dump every declared field in declaration order;
//! [`apply`] then shapes that map according to the class's (or caller's)
//! [`ToArrayConfig`]: field selection, hidden-field filtering, null
//! dropping, empty-array conversion and the single-key shortcut.

use serde_json::{Map, Value};

use crate::{config, schema::ClassSchema};

/// Which fields get their empty arrays rendered as empty objects.
///
/// JSON cannot distinguish an empty list from an empty string-keyed map;
/// this opt-in forces `{}` where the consumer expects a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyArrayAsObject {
    /// Every field.
    All,

    /// Only the named fields.
    Fields(Vec<String>)
}

/// Per-class serialization configuration.
///
/// Every option defaults to "off"; unset `ignore_null` and `date_format`
/// fall back to the `to_array.*` configuration keys.
#[derive(Debug, Clone, Default)]
pub struct ToArrayConfig {
    /// Exhaustive field selection, in the given order. Overrides the
    /// declared list entirely, hidden fields included.
    pub only: Option<Vec<String>>,

    /// Extra fields appended to the declared list; re-admits hidden fields.
    pub include: Vec<String>,

    /// Fields removed from the output.
    pub exclude: Vec<String>,

    /// Drop fields whose value is `null`.
    pub ignore_null: Option<bool>,

    /// Render empty arrays as empty objects.
    pub empty_array_as_object: Option<EmptyArrayAsObject>,

    /// Collapse the output to this single field's bare value.
    pub single_key: Option<String>,

    /// chrono format for timezone-aware temporal fields.
    pub date_format: Option<String>
}

/// Resolved per-serialization context handed down to leaf values.
#[derive(Debug, Clone)]
pub struct SerializeCx {
    date_format: String
}

impl SerializeCx {
    /// Resolve the context from a class configuration, falling back to the
    /// `to_array.date_format` configuration key (RFC 3339).
    #[must_use]
    pub fn resolve(config: &ToArrayConfig) -> Self {
        let date_format = config
            .date_format
            .clone()
            .unwrap_or_else(|| config::get_str("to_array.date_format", "%+"));
        Self {
            date_format
        }
    }

    /// The chrono format string for timezone-aware temporal fields.
    #[must_use]
    pub fn date_format(&self) -> &str {
        &self.date_format
    }
}

impl Default for SerializeCx {
    fn default() -> Self {
        Self::resolve(&ToArrayConfig::default())
    }
}

/// Shape a full field dump into the configured output.
///
/// `map` must contain every declared field (hidden ones included); the
/// configuration decides which survive and in what form.
#[must_use]
pub fn apply(schema: &ClassSchema, mut map: Map<String, Value>, config: &ToArrayConfig) -> Value {
    if let Some(key) = &config.single_key {
        return map.remove(key).unwrap_or(Value::Null);
    }

    let selected: Vec<String> = match &config.only {
        Some(only) => only.clone(),
        None => {
            let mut fields: Vec<String> = schema
                .fields()
                .iter()
                .filter(|field| !field.is_hidden())
                .map(|field| field.name().to_string())
                .collect();
            for name in &config.include {
                if !fields.contains(name) {
                    fields.push(name.clone());
                }
            }
            fields
        }
    };

    let ignore_null = config
        .ignore_null
        .unwrap_or_else(|| config::get_bool("to_array.ignore_null", false));

    let mut out = Map::new();
    for name in selected {
        if config.exclude.contains(&name) {
            continue;
        }
        let Some(value) = map.remove(&name) else {
            continue;
        };
        if ignore_null && value.is_null() {
            continue;
        }
        let value = match &config.empty_array_as_object {
            Some(scope) if is_empty_array(&value) && scope_matches(scope, &name) => {
                Value::Object(Map::new())
            }
            _ => value
        };
        out.insert(name, value);
    }
    Value::Object(out)
}

fn is_empty_array(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.is_empty())
}

fn scope_matches(scope: &EmptyArrayAsObject, name: &str) -> bool {
    match scope {
        EmptyArrayAsObject::All => true,
        EmptyArrayAsObject::Fields(fields) => fields.iter().any(|field| field == name)
    }
}
