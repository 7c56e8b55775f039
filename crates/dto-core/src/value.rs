// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Value-level coercion between raw JSON data and typed fields.
//!
//! [`DtoValue`] is implemented by every type usable as a DTO field. It
//! supplies the type-derived rule defaults consumed by
//! [`crate::schema::compile_field`] and the two runtime directions:
//! coercion from raw input ([`DtoValue::from_raw`]) and serialization back
//! to plain data ([`DtoValue::to_raw`]).
//!
//! Coercion is deliberately lenient the way web input demands: numeric
//! strings coerce into numbers, `"1"`/`"true"`/`"on"`/`"yes"` coerce into
//! booleans, and several common date layouts parse into temporal types.
//! Shape mismatches that leniency cannot absorb surface as [`CoerceError`].

use std::{
    any::type_name,
    collections::{BTreeMap, HashMap}
};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Value};

use crate::{
    config,
    error::CoerceError,
    rules::{ArrayItem, EnumDescriptor, RuleSet, TemporalKind},
    serialize::SerializeCx
};

/// A type that can live in a DTO field.
pub trait DtoValue: Sized {
    /// Rule defaults derived from the type itself (category, nullability,
    /// nested references). Merged with explicit annotations by
    /// [`crate::schema::compile_field`].
    fn base_rules() -> RuleSet;

    /// Coerce a raw value into this type.
    ///
    /// # Errors
    ///
    /// Returns a [`CoerceError`] when the raw value's shape cannot be
    /// reconciled with the type.
    fn from_raw(value: Value, rules: &RuleSet) -> Result<Self, CoerceError>;

    /// Coerce a raw value that may stand for "absent".
    ///
    /// `null` yields `None`; an empty string does too while the
    /// `coerce.null_empty_string` configuration key is on (the default).
    /// DTO types extend this with "empty object yields `None`".
    ///
    /// # Errors
    ///
    /// Returns a [`CoerceError`] when the value is present but cannot be
    /// coerced.
    fn from_raw_opt(value: Value, rules: &RuleSet) -> Result<Option<Self>, CoerceError> {
        if null_like(&value) {
            return Ok(None);
        }
        Self::from_raw(value, rules).map(Some)
    }

    /// Serialize this value back into plain data.
    fn to_raw(&self, cx: &SerializeCx) -> Value;
}

/// A fieldable enum backed by scalar values.
///
/// Implemented by `#[derive(DtoEnum)]`; the descriptor feeds rule
/// generation, the conversion pair feeds coercion and serialization.
pub trait BackedEnum: Sized {
    /// Enum metadata: name and full backing-value list.
    fn descriptor() -> &'static EnumDescriptor;

    /// Find the member whose backing value loosely equals `value`.
    fn from_backing(value: &Value) -> Option<Self>;

    /// The member's backing value.
    fn backing(&self) -> Value;
}

/// Whether a raw value stands for "absent" in optional coercion.
fn null_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty() && config::get_bool("coerce.null_empty_string", true),
        _ => false
    }
}

/// Whether a raw value counts as absent for a nested object field.
///
/// The null-likes plus the empty object and the empty array: form encoders
/// commonly send `[]` or `{}` for an untouched sub-form.
#[must_use]
pub fn absent_for_object(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => null_like(value)
    }
}

/// Coerce a raw value into a backed enum member.
///
/// Used by generated enum impls. Only strings and numbers are acceptable
/// sources; membership uses [`backing_eq`] so `"1"` finds a member backed
/// by `1`.
///
/// # Errors
///
/// Returns [`CoerceError::EnumSource`] for non-scalar sources and
/// [`CoerceError::EnumValue`] for non-members.
pub fn enum_from_raw<T: BackedEnum>(value: Value) -> Result<T, CoerceError> {
    let name = T::descriptor().name();
    if !matches!(value, Value::String(_) | Value::Number(_)) {
        return Err(CoerceError::EnumSource {
            enum_name: name
        });
    }
    T::from_backing(&value).ok_or(CoerceError::EnumValue {
        enum_name: name,
        value
    })
}

/// Loose equality between raw values: numeric strings compare with numbers,
/// integers compare with equal-valued floats.
#[must_use]
pub fn backing_eq(left: &Value, right: &Value) -> bool {
    if left == right {
        return true;
    }
    match (as_number(left), as_number(right)) {
        (Some(l), Some(r)) => l == r,
        _ => false
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None
    }
}

/// Parse a date/time from the accepted textual layouts.
///
/// RFC 3339 first, then `Y-m-d H:M:S`, `Y-m-dTH:M:S`, finally a bare date
/// at midnight.
pub(crate) fn parse_naive_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| parse_naive_date(text).map(|date| date.and_time(NaiveTime::MIN)))
}

/// Parse a calendar date from the accepted textual layouts.
pub(crate) fn parse_naive_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y/%m/%d"))
        .ok()
}

impl DtoValue for String {
    fn base_rules() -> RuleSet {
        RuleSet {
            string: Some(true),
            ..RuleSet::default()
        }
    }

    fn from_raw(value: Value, _rules: &RuleSet) -> Result<Self, CoerceError> {
        match value {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(CoerceError::type_mismatch("string", &other))
        }
    }

    fn to_raw(&self, _cx: &SerializeCx) -> Value {
        Value::String(self.clone())
    }
}

impl DtoValue for bool {
    fn base_rules() -> RuleSet {
        RuleSet {
            boolean: Some(true),
            ..RuleSet::default()
        }
    }

    fn from_raw(value: Value, _rules: &RuleSet) -> Result<Self, CoerceError> {
        match &value {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Ok(true),
                Some(0) => Ok(false),
                _ => Err(CoerceError::type_mismatch("boolean", &value))
            },
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => Ok(true),
                "0" | "false" | "off" | "no" | "" => Ok(false),
                _ => Err(CoerceError::type_mismatch("boolean", &value))
            },
            _ => Err(CoerceError::type_mismatch("boolean", &value))
        }
    }

    fn to_raw(&self, _cx: &SerializeCx) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! impl_dto_value_int {
    ($($ty:ty),* $(,)?) => {$(
        impl DtoValue for $ty {
            fn base_rules() -> RuleSet {
                RuleSet {
                    integer: Some(true),
                    ..RuleSet::default()
                }
            }

            fn from_raw(value: Value, _rules: &RuleSet) -> Result<Self, CoerceError> {
                match &value {
                    Value::Number(n) => {
                        if let Some(i) = n.as_i64()
                            && let Ok(out) = <$ty>::try_from(i)
                        {
                            return Ok(out);
                        }
                        if let Some(u) = n.as_u64()
                            && let Ok(out) = <$ty>::try_from(u)
                        {
                            return Ok(out);
                        }
                        Err(CoerceError::type_mismatch("integer", &value))
                    }
                    Value::String(s) => s
                        .trim()
                        .parse::<$ty>()
                        .map_err(|_| CoerceError::type_mismatch("integer", &value)),
                    _ => Err(CoerceError::type_mismatch("integer", &value))
                }
            }

            fn to_raw(&self, _cx: &SerializeCx) -> Value {
                Value::from(*self)
            }
        }
    )*};
}

impl_dto_value_int!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! impl_dto_value_float {
    ($($ty:ty),* $(,)?) => {$(
        impl DtoValue for $ty {
            fn base_rules() -> RuleSet {
                RuleSet {
                    numeric: Some(true),
                    ..RuleSet::default()
                }
            }

            fn from_raw(value: Value, _rules: &RuleSet) -> Result<Self, CoerceError> {
                match &value {
                    Value::Number(n) => n
                        .as_f64()
                        .map(|f| f as $ty)
                        .ok_or_else(|| CoerceError::type_mismatch("numeric", &value)),
                    Value::String(s) => s
                        .trim()
                        .parse::<$ty>()
                        .map_err(|_| CoerceError::type_mismatch("numeric", &value)),
                    _ => Err(CoerceError::type_mismatch("numeric", &value))
                }
            }

            fn to_raw(&self, _cx: &SerializeCx) -> Value {
                Value::from(*self)
            }
        }
    )*};
}

impl_dto_value_float!(f32, f64);

impl DtoValue for Value {
    fn base_rules() -> RuleSet {
        RuleSet::untyped()
    }

    fn from_raw(value: Value, _rules: &RuleSet) -> Result<Self, CoerceError> {
        Ok(value)
    }

    fn to_raw(&self, _cx: &SerializeCx) -> Value {
        self.clone()
    }
}

impl<T: DtoValue> DtoValue for Option<T> {
    fn base_rules() -> RuleSet {
        RuleSet {
            nullable: Some(true),
            ..T::base_rules()
        }
    }

    fn from_raw(value: Value, rules: &RuleSet) -> Result<Self, CoerceError> {
        T::from_raw_opt(value, rules)
    }

    fn to_raw(&self, cx: &SerializeCx) -> Value {
        match self {
            Some(inner) => inner.to_raw(cx),
            None => Value::Null
        }
    }
}

/// The descriptor governing array items: inline item rules when declared,
/// otherwise the item type's own defaults.
fn item_rules<T: DtoValue>(rules: &RuleSet) -> RuleSet {
    match &rules.array_item {
        Some(ArrayItem::Rules(inner)) => (**inner).clone(),
        _ => {
            let mut derived = T::base_rules();
            derived.normalize();
            derived
        }
    }
}

impl<T: DtoValue> DtoValue for Vec<T> {
    fn base_rules() -> RuleSet {
        RuleSet {
            array: Some(true),
            array_item: T::base_rules().into_array_item(),
            ..RuleSet::default()
        }
    }

    fn from_raw(value: Value, rules: &RuleSet) -> Result<Self, CoerceError> {
        let Value::Array(items) = value else {
            return Err(CoerceError::NotArray {
                item: type_name::<T>()
            });
        };
        let rules = item_rules::<T>(rules);
        items
            .into_iter()
            .map(|item| T::from_raw(item, &rules))
            .collect()
    }

    fn to_raw(&self, cx: &SerializeCx) -> Value {
        Value::Array(self.iter().map(|item| item.to_raw(cx)).collect())
    }
}

macro_rules! impl_dto_value_string_map {
    ($($map:ident),* $(,)?) => {$(
        impl<T: DtoValue> DtoValue for $map<String, T> {
            fn base_rules() -> RuleSet {
                RuleSet {
                    array: Some(true),
                    ..RuleSet::default()
                }
            }

            fn from_raw(value: Value, rules: &RuleSet) -> Result<Self, CoerceError> {
                let Value::Object(entries) = value else {
                    return Err(CoerceError::type_mismatch("object", &value));
                };
                let rules = item_rules::<T>(rules);
                entries
                    .into_iter()
                    .map(|(key, item)| Ok((key, T::from_raw(item, &rules)?)))
                    .collect()
            }

            fn to_raw(&self, cx: &SerializeCx) -> Value {
                Value::Object(
                    self.iter()
                        .map(|(key, item)| (key.clone(), item.to_raw(cx)))
                        .collect::<Map<String, Value>>()
                )
            }
        }
    )*};
}

impl_dto_value_string_map!(HashMap, BTreeMap);

impl DtoValue for DateTime<Utc> {
    fn base_rules() -> RuleSet {
        RuleSet::for_temporal(TemporalKind::DateTime)
    }

    fn from_raw(value: Value, _rules: &RuleSet) -> Result<Self, CoerceError> {
        match &value {
            Value::String(s) => parse_naive_datetime(s)
                .map(|naive| naive.and_utc())
                .ok_or_else(|| CoerceError::Date {
                    value: s.clone()
                }),
            // Unix timestamps pass straight through.
            Value::Number(n) => n
                .as_i64()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .ok_or_else(|| CoerceError::type_mismatch("date", &value)),
            _ => Err(CoerceError::type_mismatch("date", &value))
        }
    }

    fn to_raw(&self, cx: &SerializeCx) -> Value {
        Value::String(self.format(cx.date_format()).to_string())
    }
}

impl DtoValue for DateTime<FixedOffset> {
    fn base_rules() -> RuleSet {
        RuleSet::for_temporal(TemporalKind::DateTime)
    }

    fn from_raw(value: Value, _rules: &RuleSet) -> Result<Self, CoerceError> {
        match &value {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .or_else(|| parse_naive_datetime(s).map(|naive| naive.and_utc().fixed_offset()))
                .ok_or_else(|| CoerceError::Date {
                    value: s.clone()
                }),
            _ => Err(CoerceError::type_mismatch("date", &value))
        }
    }

    fn to_raw(&self, cx: &SerializeCx) -> Value {
        Value::String(self.format(cx.date_format()).to_string())
    }
}

impl DtoValue for NaiveDateTime {
    fn base_rules() -> RuleSet {
        RuleSet::for_temporal(TemporalKind::DateTime)
    }

    fn from_raw(value: Value, _rules: &RuleSet) -> Result<Self, CoerceError> {
        match &value {
            Value::String(s) => parse_naive_datetime(s).ok_or_else(|| CoerceError::Date {
                value: s.clone()
            }),
            _ => Err(CoerceError::type_mismatch("date", &value))
        }
    }

    // Naive timestamps carry no offset, so the configurable RFC 3339
    // format cannot apply.
    fn to_raw(&self, _cx: &SerializeCx) -> Value {
        Value::String(self.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

impl DtoValue for NaiveDate {
    fn base_rules() -> RuleSet {
        RuleSet::for_temporal(TemporalKind::Date)
    }

    fn from_raw(value: Value, _rules: &RuleSet) -> Result<Self, CoerceError> {
        match &value {
            Value::String(s) => parse_naive_date(s)
                .or_else(|| parse_naive_datetime(s).map(|naive| naive.date()))
                .ok_or_else(|| CoerceError::Date {
                    value: s.clone()
                }),
            _ => Err(CoerceError::type_mismatch("date", &value))
        }
    }

    fn to_raw(&self, _cx: &SerializeCx) -> Value {
        Value::String(self.format("%Y-%m-%d").to_string())
    }
}
