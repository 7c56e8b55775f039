// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error taxonomy for DTO construction and validation.
//!
//! Three families of failures exist at runtime:
//!
//! - [`DtoError::Validate`] — the validator rejected the raw input. This is
//!   the expected "bad input" signal and carries the full field/message map.
//! - [`DtoError::NewInstance`] — validated data could not be turned into the
//!   target type. Wraps the originating cause and names the class.
//! - [`DtoError::MissingField`] — a required field was absent at construction
//!   time. Should not happen when validation rules mirror the schema; if it
//!   does, it signals a schema/validation mismatch bug.
//!
//! Configuration errors (malformed rule descriptors) are not represented
//! here: they panic during schema compilation and are never caught by the
//! facade.

use std::{
    collections::BTreeMap,
    fmt::{self, Display}
};

use serde_json::Value;
use thiserror::Error;

/// Structured validation failure: field path mapped to ordered messages.
///
/// Paths follow the rule-table conventions (`name`, `address.city`,
/// `items.2.name`). Each path carries every message produced for it, in
/// directive order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>
}

impl ValidationErrors {
    /// Create an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for a field path.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(path.into()).or_default().push(message.into());
    }

    /// The first message of the first failing field, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.errors
            .values()
            .next()
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Only the first message per field.
    ///
    /// This is the default shape surfaced to HTTP callers.
    #[must_use]
    pub fn first_messages(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .filter_map(|(path, messages)| {
                messages.first().map(|m| (path.clone(), m.clone()))
            })
            .collect()
    }

    /// All messages for one field path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.errors.get(path).map(Vec::as_slice)
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failing field paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over `(path, messages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.errors.iter()
    }

    /// Consume into the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first() {
            Some(message) => write!(f, "{message}"),
            None => write!(f, "validation failed")
        }
    }
}

/// Failure to coerce a raw value into its declared field type.
///
/// Coercion errors arise after validation (or with validation disabled) and
/// are wrapped into [`DtoError::NewInstance`] at the facade boundary.
#[derive(Debug, Error)]
pub enum CoerceError {
    /// Enum coercion received a value that is neither string nor integer.
    #[error("cannot make enum {enum_name}: value not string or int")]
    EnumSource {
        /// Enum type name.
        enum_name: &'static str
    },

    /// Enum coercion received a value outside the backing-value set.
    #[error("cannot make enum {enum_name}: {value} is not a member")]
    EnumValue {
        /// Enum type name.
        enum_name: &'static str,
        /// The offending raw value.
        value: Value
    },

    /// A nested object field received a non-object value.
    #[error("cannot make object {class}: value not an object")]
    NotObject {
        /// Target class name.
        class: &'static str
    },

    /// An array field received a non-array value.
    #[error("cannot make array of {item}: value not an array")]
    NotArray {
        /// Item description (class name or `rules`).
        item: &'static str
    },

    /// A scalar field received a value of the wrong shape.
    #[error("expected {expected}, got {found}")]
    Type {
        /// Expected type category.
        expected: &'static str,
        /// Short description of the received value.
        found: String
    },

    /// A temporal field received an unparseable value.
    #[error("cannot parse {value:?} as date/time")]
    Date {
        /// The raw text that failed to parse.
        value: String
    },

    /// Recursive construction of a nested DTO failed.
    #[error("cannot make nested {class}")]
    Nested {
        /// Nested class name.
        class: &'static str,
        /// Originating construction failure.
        #[source]
        source: Box<DtoError>
    }
}

impl CoerceError {
    /// Build a [`CoerceError::Nested`] wrapper.
    #[must_use]
    pub fn nested(class: &'static str, source: DtoError) -> Self {
        Self::Nested {
            class,
            source: Box::new(source)
        }
    }

    /// Build a [`CoerceError::Type`] from the received value.
    #[must_use]
    pub fn type_mismatch(expected: &'static str, found: &Value) -> Self {
        Self::Type {
            expected,
            found: describe(found)
        }
    }
}

/// Short human description of a JSON value's shape, for error messages.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("bool {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string()
    }
}

/// Top-level DTO failure.
#[derive(Debug, Error)]
pub enum DtoError {
    /// The external validator rejected the input.
    #[error("{0}")]
    Validate(ValidationErrors),

    /// Construction of the target type failed; wraps the original cause.
    #[error("new {class} failed")]
    NewInstance {
        /// Target class name.
        class: &'static str,
        /// Originating failure.
        #[source]
        source: Box<DtoError>
    },

    /// A required field was missing from the (validated) data set.
    #[error("{class} field {field} is missing")]
    MissingField {
        /// Target class name.
        class: &'static str,
        /// Missing field name.
        field: String
    },

    /// A raw value could not be coerced into its field type.
    #[error(transparent)]
    Coerce(#[from] CoerceError)
}

impl DtoError {
    /// Wrap a failure into [`DtoError::NewInstance`] for `class`.
    ///
    /// Validation errors pass through unwrapped: they short-circuit before
    /// construction and must keep their structured shape.
    #[must_use]
    pub fn new_instance(class: &'static str, source: DtoError) -> Self {
        match source {
            err @ DtoError::Validate(_) => err,
            other => DtoError::NewInstance {
                class,
                source: Box::new(other)
            }
        }
    }

    /// The validation error set, when this is a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            DtoError::Validate(errors) => Some(errors),
            _ => None
        }
    }
}
