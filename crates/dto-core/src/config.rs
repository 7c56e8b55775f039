// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Process-wide configuration provider.
//!
//! A flat key/value store consulted for library defaults. Hosts set values
//! once at startup; unset keys fall back to the static defaults documented
//! below. Tests may overwrite and [`reset`] freely.
//!
//! # Recognized keys
//!
//! | Key | Type | Default | Meaning |
//! |-----|------|---------|---------|
//! | `coerce.null_empty_string` | bool | `true` | empty strings short-circuit nullable coercion like `null` |
//! | `to_array.ignore_null` | bool | `false` | default null-filtering for serialization |
//! | `to_array.date_format` | string | `"%+"` | chrono format for temporal fields (RFC 3339) |
//! | `config.validate` | bool | `false` | whether `ConfigDto::from_config` validates |
//! | `from_data.request.ignore_null` … | bool | `false` | `FromDataConfig` profile defaults, see [`crate::dto::FromDataConfig::profile`] |

use std::{
    collections::BTreeMap,
    sync::{OnceLock, RwLock}
};

use serde_json::Value;

fn store() -> &'static RwLock<BTreeMap<String, Value>> {
    static STORE: OnceLock<RwLock<BTreeMap<String, Value>>> = OnceLock::new();
    STORE.get_or_init(|| RwLock::new(BTreeMap::new()))
}

/// Get a configuration value, if set.
#[must_use]
pub fn get(key: &str) -> Option<Value> {
    store()
        .read()
        .ok()
        .and_then(|map| map.get(key).cloned())
}

/// Get a boolean configuration value with a default.
#[must_use]
pub fn get_bool(key: &str, default: bool) -> bool {
    match get(key) {
        Some(Value::Bool(b)) => b,
        _ => default
    }
}

/// Get a string configuration value with a default.
#[must_use]
pub fn get_str(key: &str, default: &str) -> String {
    match get(key) {
        Some(Value::String(s)) => s,
        _ => default.to_string()
    }
}

/// Set a configuration value.
pub fn set(key: impl Into<String>, value: impl Into<Value>) {
    if let Ok(mut map) = store().write() {
        map.insert(key.into(), value.into());
    }
}

/// Clear every configured value, restoring static defaults.
pub fn reset() {
    if let Ok(mut map) = store().write() {
        map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_keys_fall_back_to_defaults() {
        reset();
        assert_eq!(get("no.such.key"), None);
        assert!(get_bool("coerce.missing", true));
        assert_eq!(get_str("to_array.missing", "%+"), "%+");
    }

    #[test]
    fn set_values_round_trip() {
        set("test.round_trip", true);
        assert!(get_bool("test.round_trip", false));
        reset();
        assert!(!get_bool("test.round_trip", false));
    }
}
