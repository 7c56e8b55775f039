// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Small value utilities shared across the crate.

use serde_json::Value;

/// Merge `overlay` into `base`.
///
/// Objects merge key-by-key recursively; any other pairing replaces the
/// base value. Arrays replace wholesale, matching configuration-file
/// override semantics.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay
    }
}
