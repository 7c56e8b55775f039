// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Validation seam and the built-in rule interpreter.
//!
//! DTO construction hands the synthesized [`RuleTable`] and the raw input
//! to whatever [`Validator`] is registered. [`RuleEngine`] is the built-in
//! interpreter covering the directives the rule compiler emits; hosts with
//! their own validation stack replace it via [`set_validator`] and receive
//! the same table.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, OnceLock, RwLock}
};

use serde_json::{Map, Value};

use crate::{
    error::ValidationErrors,
    rules::{Rule, RuleTable},
    value::{backing_eq, parse_naive_datetime}
};

/// Per-call validation options.
#[derive(Debug, Default, Clone)]
pub struct ValidateOptions {
    /// Abort after the first failing directive anywhere.
    pub stop_on_first_failure: bool,

    /// Message overrides, keyed by `path.directive` or bare `path`.
    pub messages: BTreeMap<String, String>,

    /// Display-name overrides, keyed by rule path.
    pub attributes: BTreeMap<String, String>
}

/// A validation backend.
///
/// On success returns the validated data: the input restricted to the
/// top-level keys the rule table covers.
pub trait Validator: Send + Sync {
    /// Check `data` against `rules`.
    ///
    /// # Errors
    ///
    /// Returns the collected [`ValidationErrors`] when any directive fails.
    fn validate(
        &self,
        data: &Map<String, Value>,
        rules: &RuleTable,
        options: &ValidateOptions
    ) -> Result<Map<String, Value>, ValidationErrors>;
}

fn registry() -> &'static RwLock<Arc<dyn Validator>> {
    static REGISTRY: OnceLock<RwLock<Arc<dyn Validator>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Arc::new(RuleEngine)))
}

/// The currently registered validator.
#[must_use]
pub fn current() -> Arc<dyn Validator> {
    registry()
        .read()
        .map(|guard| Arc::clone(&guard))
        .unwrap_or_else(|_| Arc::new(RuleEngine))
}

/// Replace the process-wide validator.
pub fn set_validator(validator: Arc<dyn Validator>) {
    if let Ok(mut guard) = registry().write() {
        *guard = validator;
    }
}

/// Built-in interpreter for the synthesized directive set.
///
/// Covers presence (`required`, `required_with`), `nullable`, the
/// primitive categories, `date`, polymorphic `min`/`max` (numeric value,
/// string length or element count), `in`, enum membership and `bail`.
/// Unknown extra directives are skipped, so host-specific extras only
/// carry meaning for a host-provided validator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleEngine;

impl Validator for RuleEngine {
    fn validate(
        &self,
        data: &Map<String, Value>,
        rules: &RuleTable,
        options: &ValidateOptions
    ) -> Result<Map<String, Value>, ValidationErrors> {
        let root = Value::Object(data.clone());
        let mut errors = ValidationErrors::new();

        'rules: for (pattern, directives) in rules {
            let has_bail = directives.iter().any(|d| d.is("bail"));
            let numeric_field = directives.iter().any(|d| d.is("integer") || d.is("numeric"));

            for (path, value) in expand(&root, pattern) {
                let Some(value) = value.filter(|v| is_filled(v)) else {
                    if let Some(message) =
                        presence_failure(directives, &root, pattern, &path, options)
                    {
                        errors.add(path.clone(), message);
                        if options.stop_on_first_failure {
                            break 'rules;
                        }
                    }
                    continue;
                };

                for directive in directives {
                    let Some(message) =
                        check(directive, value, numeric_field, pattern, &path, options)
                    else {
                        continue;
                    };
                    errors.add(path.clone(), message);
                    if options.stop_on_first_failure {
                        break 'rules;
                    }
                    if has_bail {
                        break;
                    }
                }
            }
        }

        if !errors.is_empty() {
            tracing::debug!(failed = errors.len(), "validation rejected input");
            return Err(errors);
        }

        let covered: BTreeSet<&str> = rules
            .keys()
            .map(|key| key.split('.').next().unwrap_or(key))
            .collect();
        Ok(data
            .iter()
            .filter(|(key, _)| covered.contains(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

/// Expand a rule pattern against the data tree into concrete targets.
///
/// `*` fans out over array indices and contributes no targets when the
/// array itself is absent. A missing plain path still yields one valueless
/// target so presence directives can fire.
fn expand<'a>(root: &'a Value, pattern: &str) -> Vec<(String, Option<&'a Value>)> {
    let segments: Vec<&str> = pattern.split('.').collect();
    let mut out = Vec::new();
    walk(root, &segments, String::new(), &mut out);
    out
}

fn walk<'a>(
    value: &'a Value,
    segments: &[&str],
    prefix: String,
    out: &mut Vec<(String, Option<&'a Value>)>
) {
    let Some((head, rest)) = segments.split_first() else {
        out.push((prefix, Some(value)));
        return;
    };

    if *head == "*" {
        if let Value::Array(items) = value {
            for (index, item) in items.iter().enumerate() {
                walk(item, rest, join(&prefix, &index.to_string()), out);
            }
        }
        return;
    }

    match value.get(*head) {
        Some(child) => walk(child, rest, join(&prefix, head), out),
        None => {
            if !rest.contains(&"*") {
                let mut full = join(&prefix, head);
                for segment in rest {
                    full = join(&full, segment);
                }
                out.push((full, None));
            }
        }
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

/// `null`, the empty string and the empty array all count as absent.
fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true
    }
}

fn path_is_filled(root: &Value, path: &str) -> bool {
    expand(root, path)
        .iter()
        .any(|(_, value)| value.is_some_and(is_filled))
}

fn presence_failure(
    directives: &[Rule],
    root: &Value,
    pattern: &str,
    path: &str,
    options: &ValidateOptions
) -> Option<String> {
    let attr = attribute(options, pattern, path);
    for directive in directives {
        if directive.is("required") {
            return Some(message(
                options,
                pattern,
                "required",
                format!("{attr} is required")
            ));
        }
        if directive.is("required_with")
            && let Some(other) = directive.arg()
            && path_is_filled(root, other)
        {
            return Some(message(
                options,
                pattern,
                "required_with",
                format!("{attr} is required when {other} is present")
            ));
        }
    }
    None
}

fn check(
    directive: &Rule,
    value: &Value,
    numeric_field: bool,
    pattern: &str,
    path: &str,
    options: &ValidateOptions
) -> Option<String> {
    let attr = attribute(options, pattern, path);
    match directive {
        Rule::Text(_) => {
            let name = directive.name();
            let ok = match name {
                // Presence directives are settled before this point.
                "bail" | "required" | "required_with" | "nullable" => true,
                "string" => value.is_string(),
                "integer" => is_integer(value),
                "numeric" => numeric_value(value).is_some(),
                "boolean" => is_boolean(value),
                "array" => value.is_array() || value.is_object(),
                "date" => is_date(value),
                "min" => match bound(directive) {
                    Some(min) => size(value, numeric_field).is_none_or(|s| s >= min),
                    None => true
                },
                "max" => match bound(directive) {
                    Some(max) => size(value, numeric_field).is_none_or(|s| s <= max),
                    None => true
                },
                // Host-specific extras carry no meaning here.
                _ => true
            };
            if ok {
                return None;
            }
            let default = match name {
                "string" => format!("{attr} must be a string"),
                "integer" => format!("{attr} must be an integer"),
                "numeric" => format!("{attr} must be a number"),
                "boolean" => format!("{attr} must be a boolean"),
                "array" => format!("{attr} must be an array"),
                "date" => format!("{attr} must be a valid date"),
                "min" => format!(
                    "{attr} must be at least {}",
                    directive.arg().unwrap_or_default()
                ),
                "max" => format!(
                    "{attr} may not be greater than {}",
                    directive.arg().unwrap_or_default()
                ),
                other => format!("{attr} failed the {other} rule")
            };
            Some(message(options, pattern, name, default))
        }
        Rule::In(list) => {
            if list.iter().any(|candidate| backing_eq(candidate, value)) {
                None
            } else {
                Some(message(
                    options,
                    pattern,
                    "in",
                    format!("{attr} is invalid")
                ))
            }
        }
        Rule::Enum {
            values,
            only,
            except
        } => {
            let member = values.iter().any(|candidate| backing_eq(candidate, value));
            let allowed = only
                .as_ref()
                .is_none_or(|list| list.iter().any(|candidate| backing_eq(candidate, value)));
            let denied = except
                .as_ref()
                .is_some_and(|list| list.iter().any(|candidate| backing_eq(candidate, value)));
            if member && allowed && !denied {
                None
            } else {
                Some(message(
                    options,
                    pattern,
                    "enum",
                    format!("{attr} is invalid")
                ))
            }
        }
    }
}

fn attribute(options: &ValidateOptions, pattern: &str, path: &str) -> String {
    options
        .attributes
        .get(pattern)
        .cloned()
        .unwrap_or_else(|| path.to_string())
}

fn message(options: &ValidateOptions, pattern: &str, rule: &str, default: String) -> String {
    options
        .messages
        .get(&format!("{pattern}.{rule}"))
        .or_else(|| options.messages.get(pattern))
        .cloned()
        .unwrap_or(default)
}

fn bound(directive: &Rule) -> Option<f64> {
    directive.arg().and_then(|arg| arg.parse().ok())
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_i64().is_some() || n.as_u64().is_some(),
        Value::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None
    }
}

fn is_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_i64(), Some(0 | 1)),
        Value::String(s) => matches!(s.as_str(), "0" | "1" | "true" | "false"),
        _ => false
    }
}

fn is_date(value: &Value) -> bool {
    match value {
        Value::String(s) => parse_naive_datetime(s).is_some(),
        Value::Number(n) => n.as_i64().is_some(),
        _ => false
    }
}

/// Polymorphic size: numeric value for numeric fields, character count for
/// strings, element count for arrays and objects.
fn size(value: &Value, numeric_field: bool) -> Option<f64> {
    if numeric_field {
        return numeric_value(value);
    }
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(entries) => Some(entries.len() as f64),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("object expected")
        }
    }

    fn table(entries: &[(&str, &[&str])]) -> RuleTable {
        entries
            .iter()
            .map(|(path, rules)| {
                (
                    path.to_string(),
                    rules.iter().map(|r| Rule::text(*r)).collect()
                )
            })
            .collect()
    }

    fn run(
        data_value: Value,
        rules: &RuleTable
    ) -> Result<Map<String, Value>, ValidationErrors> {
        RuleEngine.validate(&data(data_value), rules, &ValidateOptions::default())
    }

    #[test]
    fn required_fails_on_missing_null_and_empty() {
        let rules = table(&[("name", &["required", "string"])]);

        for payload in [json!({}), json!({"name": null}), json!({"name": ""})] {
            let errors = run(payload, &rules).unwrap_err();
            assert_eq!(errors.first(), Some("name is required"));
        }
        assert!(run(json!({"name": "ok"}), &rules).is_ok());
    }

    #[test]
    fn absent_optional_fields_skip_type_checks() {
        let rules = table(&[("age", &["integer", "min:18"])]);

        assert!(run(json!({}), &rules).is_ok());
        assert!(run(json!({"age": "17"}), &rules).is_err());
        assert!(run(json!({"age": "21"}), &rules).is_ok());
    }

    #[test]
    fn required_with_only_fires_when_parent_is_present() {
        let rules = table(&[
            ("address", &["array"]),
            ("address.city", &["required_with:address", "string"]),
        ]);

        assert!(run(json!({}), &rules).is_ok());

        let errors = run(json!({"address": {"zip": "123"}}), &rules).unwrap_err();
        assert_eq!(
            errors.get("address.city").and_then(|m| m.first()).map(String::as_str),
            Some("address.city is required when address is present")
        );
    }

    #[test]
    fn wildcard_paths_report_concrete_indices() {
        let rules = table(&[("items.*.name", &["required", "string"])]);

        let errors = run(
            json!({"items": [{"name": "a"}, {"name": 5}, {}]}),
            &rules
        )
        .unwrap_err();

        assert!(errors.get("items.0.name").is_none());
        assert!(errors.get("items.1.name").is_some());
        assert!(errors.get("items.2.name").is_some());
    }

    #[test]
    fn min_max_are_polymorphic() {
        let numeric = table(&[("age", &["integer", "min:18", "max:99"])]);
        assert!(run(json!({"age": 50}), &numeric).is_ok());
        assert!(run(json!({"age": 120}), &numeric).is_err());

        let text = table(&[("name", &["string", "min:3"])]);
        assert!(run(json!({"name": "ab"}), &text).is_err());
        assert!(run(json!({"name": "abc"}), &text).is_ok());

        let list = table(&[("tags", &["array", "max:2"])]);
        assert!(run(json!({"tags": ["a", "b", "c"]}), &list).is_err());
    }

    #[test]
    fn bail_reports_only_the_first_failure_per_field() {
        let rules = table(&[("age", &["bail", "integer", "min:18"])]);

        let errors = run(json!({"age": "soon"}), &rules).unwrap_err();
        assert_eq!(errors.get("age").map(<[String]>::len), Some(1));
    }

    #[test]
    fn stop_on_first_failure_halts_everything() {
        let rules = table(&[
            ("a", &["required"]),
            ("b", &["required"]),
        ]);
        let options = ValidateOptions {
            stop_on_first_failure: true,
            ..ValidateOptions::default()
        };

        let errors = RuleEngine
            .validate(&data(json!({})), &rules, &options)
            .unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn enum_membership_honors_only_and_except() {
        let mut rules = RuleTable::new();
        rules.insert(
            "status".to_string(),
            vec![Rule::Enum {
                values: vec![json!("active"), json!("inactive"), json!("banned")],
                only: None,
                except: Some(vec![json!("banned")])
            }]
        );

        assert!(run(json!({"status": "active"}), &rules).is_ok());
        assert!(run(json!({"status": "banned"}), &rules).is_err());
        assert!(run(json!({"status": "unknown"}), &rules).is_err());
    }

    #[test]
    fn validated_data_is_restricted_to_covered_keys() {
        let rules = table(&[("name", &["required", "string"])]);

        let validated = run(json!({"name": "ok", "noise": 1}), &rules).unwrap();
        assert_eq!(validated.len(), 1);
        assert!(validated.contains_key("name"));
    }

    #[test]
    fn custom_messages_and_attributes_apply() {
        let rules = table(&[("name", &["required"])]);
        let options = ValidateOptions {
            messages: BTreeMap::from([(
                "name.required".to_string(),
                "give us a name".to_string()
            )]),
            ..ValidateOptions::default()
        };

        let errors = RuleEngine
            .validate(&data(json!({})), &rules, &options)
            .unwrap_err();
        assert_eq!(errors.first(), Some("give us a name"));

        let options = ValidateOptions {
            attributes: BTreeMap::from([("name".to_string(), "display name".to_string())]),
            ..ValidateOptions::default()
        };
        let errors = RuleEngine
            .validate(&data(json!({})), &rules, &options)
            .unwrap_err();
        assert_eq!(errors.first(), Some("display name is required"));
    }
}
