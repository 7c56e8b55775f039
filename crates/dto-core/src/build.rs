// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field extraction helpers for generated `from_map` impls.
//!
//! Each declared field pulls its raw value out of the input map exactly
//! once and runs it through the field's compiled descriptor. Fields with a
//! construction-time default go through [`optional`]; all others through
//! [`required`].

use serde_json::{Map, Value};

use crate::{error::DtoError, schema::ClassSchema, value::DtoValue};

/// Extract and coerce a field that must be present.
///
/// # Errors
///
/// [`DtoError::MissingField`] when the key is absent, [`DtoError::Coerce`]
/// when the value cannot become `T`.
pub fn required<T: DtoValue>(
    schema: &ClassSchema,
    map: &mut Map<String, Value>,
    name: &str
) -> Result<T, DtoError> {
    let Some(value) = map.remove(name) else {
        return Err(DtoError::MissingField {
            class: schema.name(),
            field: name.to_string()
        });
    };
    Ok(T::from_raw(value, schema.rules(name))?)
}

/// Extract and coerce a field that falls back to a default when absent.
///
/// A missing key, a `null` value and (by default) an empty string all
/// yield `None` so the declared default takes over.
///
/// # Errors
///
/// [`DtoError::Coerce`] when a present value cannot become `T`.
pub fn optional<T: DtoValue>(
    schema: &ClassSchema,
    map: &mut Map<String, Value>,
    name: &str
) -> Result<Option<T>, DtoError> {
    match map.remove(name) {
        Some(value) => Ok(T::from_raw_opt(value, schema.rules(name))?),
        None => Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        rules::RuleSet,
        schema::{ClassSchema, FieldSchema, compile_field}
    };

    fn schema() -> ClassSchema {
        ClassSchema::builder("Sample")
            .field(FieldSchema::new(
                "name",
                compile_field::<String>(RuleSet::default(), false)
            ))
            .field(
                FieldSchema::new("age", compile_field::<u32>(RuleSet::default(), true))
                    .with_default()
            )
            .build()
    }

    fn input(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("object expected")
        }
    }

    #[test]
    fn required_field_is_extracted_and_coerced() {
        let schema = schema();
        let mut map = input(json!({"name": "alice"}));
        let name: String = required(&schema, &mut map, "name").unwrap();
        assert_eq!(name, "alice");
        assert!(map.is_empty());
    }

    #[test]
    fn missing_required_field_names_class_and_field() {
        let schema = schema();
        let mut map = input(json!({}));
        let err = required::<String>(&schema, &mut map, "name").unwrap_err();
        assert!(
            matches!(err, DtoError::MissingField { class: "Sample", ref field } if field == "name")
        );
    }

    #[test]
    fn optional_field_absent_yields_none() {
        let schema = schema();
        let mut map = input(json!({}));
        let age: Option<u32> = optional(&schema, &mut map, "age").unwrap();
        assert_eq!(age, None);
    }

    #[test]
    fn optional_field_null_yields_none() {
        let schema = schema();
        let mut map = input(json!({"age": null}));
        let age: Option<u32> = optional(&schema, &mut map, "age").unwrap();
        assert_eq!(age, None);
    }

    #[test]
    fn optional_field_present_is_coerced() {
        let schema = schema();
        let mut map = input(json!({"age": "30"}));
        let age: Option<u32> = optional(&schema, &mut map, "age").unwrap();
        assert_eq!(age, Some(30));
    }

    #[test]
    fn coercion_failures_propagate() {
        let schema = schema();
        let mut map = input(json!({"age": "soon"}));
        let err = optional::<u32>(&schema, &mut map, "age").unwrap_err();
        assert!(matches!(err, DtoError::Coerce(_)));
    }
}
