// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field rule descriptors and validator directive synthesis.
//!
//! [`RuleSet`] is the compiled per-field specification: type category,
//! nullability, required-ness, bounds, enum/object/array-item references and
//! free-form extra directives. It produces two things:
//!
//! - [`RuleSet::parse_rules`] — the ordered, deduplicated scalar directive
//!   list for the field itself;
//! - [`RuleSet::collect_rules`] — the full path-keyed [`RuleTable`] for the
//!   field, recursing into nested schemas (`a.b`) and array items (`a.*.b`)
//!   and rewriting `required` into `required_with:<parent>` across nesting
//!   boundaries.
//!
//! Descriptors are immutable after [`RuleSet::normalize`], which runs once
//! and panics on configuration errors (conflicting primitive categories).
//! Directive lists are memoized after first computation.

use std::{collections::BTreeMap, sync::OnceLock};

use serde_json::Value;

use crate::schema::SchemaRef;

/// Path-keyed mapping of validator directives covering a whole schema.
///
/// Keys use `.` for nested objects and `*` for array items: `name`,
/// `address.city`, `tags.*`, `items.*.name`.
pub type RuleTable = BTreeMap<String, Vec<Rule>>;

/// Prefix of the conditional-requiredness directive.
const REQUIRED_WITH: &str = "required_with:";

/// A single validator directive.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Plain text directive: `required`, `nullable`, `min:5`, `bail`, or any
    /// engine-specific extra.
    Text(String),

    /// Backed-enum membership check, optionally narrowed by allow/deny
    /// lists over backing values.
    Enum {
        /// All backing values of the enum.
        values: Vec<Value>,
        /// When set, only these members are valid.
        only: Option<Vec<Value>>,
        /// When set, these members are invalid.
        except: Option<Vec<Value>>
    },

    /// Inclusion-list check over raw values.
    In(Vec<Value>)
}

impl Rule {
    /// Build a text directive.
    #[must_use]
    pub fn text(directive: impl Into<String>) -> Self {
        Self::Text(directive.into())
    }

    /// The directive's dedup key: the text before `:` for text directives,
    /// `enum` / `in` for the structured ones.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text(text) => text.split(':').next().unwrap_or(text),
            Self::Enum { .. } => "enum",
            Self::In(_) => "in"
        }
    }

    /// Whether this is the given text directive (compared by name).
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name() == name
    }

    /// The argument text after `:`, for text directives like `min:5`.
    #[must_use]
    pub fn arg(&self) -> Option<&str> {
        match self {
            Self::Text(text) => text.split_once(':').map(|(_, arg)| arg),
            _ => None
        }
    }
}

/// Backed-enum metadata used for rule generation.
///
/// Carries the enum's name and the full backing-value list. Obtained from
/// [`crate::value::BackedEnum::descriptor`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    name: &'static str,
    values: Vec<Value>
}

impl EnumDescriptor {
    /// Create a descriptor from the enum's name and backing values.
    #[must_use]
    pub fn new(name: &'static str, values: Vec<Value>) -> Self {
        Self {
            name,
            values
        }
    }

    /// Enum type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All backing values, in declaration order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Kind of temporal object reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    /// Date and time (with or without timezone).
    DateTime,

    /// Calendar date only.
    Date
}

/// Closed set of object-reference kinds, resolved at schema-compile time.
///
/// Replaces per-value runtime type checks: the coercer and the rule builder
/// dispatch on this tag instead of probing type hierarchies.
#[derive(Debug, Clone, Copy)]
pub enum ObjectRef {
    /// Reference to another schema-bearing DTO type.
    Schema(SchemaRef),

    /// Date/time-like type; contributes a `date` directive and multi-format
    /// parsing at coercion time.
    Temporal(TemporalKind),

    /// Opaque passthrough type (e.g. an upload handle). No directives, no
    /// coercion.
    Opaque
}

/// Array item reference: either a nested schema or a nested descriptor.
#[derive(Debug, Clone)]
pub enum ArrayItem {
    /// Items are instances of another DTO type; its rules merge under
    /// `path.*.<child>`.
    Schema(SchemaRef),

    /// Items follow an inline descriptor; its scalar rules merge at
    /// `path.*`.
    Rules(Box<RuleSet>)
}

/// Compiled per-field validation/coercion specification.
///
/// Tri-state flags are `None` (unset) or `Some(true)`; explicit descriptors
/// and type-derived defaults only ever assert, never negate, matching the
/// source annotation model.
#[derive(Debug, Default)]
pub struct RuleSet {
    /// Field must be present (and non-empty) in the input.
    pub required: Option<bool>,

    /// Field accepts `null`.
    pub nullable: Option<bool>,

    /// Primitive category: string.
    pub string: Option<bool>,

    /// Primitive category: boolean.
    pub boolean: Option<bool>,

    /// Primitive category: integer.
    pub integer: Option<bool>,

    /// Primitive category: numeric (integer or float).
    pub numeric: Option<bool>,

    /// Primitive category: array.
    pub array: Option<bool>,

    /// Backed-enum reference.
    pub enum_ref: Option<&'static EnumDescriptor>,

    /// Allow-list over enum backing values.
    pub enum_only: Option<Vec<Value>>,

    /// Deny-list over enum backing values.
    pub enum_except: Option<Vec<Value>>,

    /// Object reference (nested schema, temporal, or opaque).
    pub object: Option<ObjectRef>,

    /// Array item reference.
    pub array_item: Option<ArrayItem>,

    /// Numeric lower bound (`min:`).
    pub min: Option<f64>,

    /// Numeric upper bound (`max:`).
    pub max: Option<f64>,

    /// String length lower bound. Implies the string category.
    pub min_length: Option<u64>,

    /// String length upper bound. Implies the string category.
    pub max_length: Option<u64>,

    /// Inclusion list.
    pub in_list: Option<Vec<Value>>,

    /// Free-form extra directives, already split on `|`.
    pub extra: Vec<String>,

    /// Suppress recursive expansion of nested schema rules.
    pub shallow: bool,

    /// Field has no declared type: never inferred required, always nullable.
    pub untyped: bool,

    pub(crate) normalized: bool,
    pub(crate) parsed: OnceLock<Vec<Rule>>
}

impl Clone for RuleSet {
    fn clone(&self) -> Self {
        Self {
            required: self.required,
            nullable: self.nullable,
            string: self.string,
            boolean: self.boolean,
            integer: self.integer,
            numeric: self.numeric,
            array: self.array,
            enum_ref: self.enum_ref,
            enum_only: self.enum_only.clone(),
            enum_except: self.enum_except.clone(),
            object: self.object,
            array_item: self.array_item.clone(),
            min: self.min,
            max: self.max,
            min_length: self.min_length,
            max_length: self.max_length,
            in_list: self.in_list.clone(),
            extra: self.extra.clone(),
            shallow: self.shallow,
            untyped: self.untyped,
            normalized: self.normalized,
            // memoized directives are rebuilt on demand
            parsed: OnceLock::new()
        }
    }
}

impl RuleSet {
    /// Descriptor for a nested schema-bearing type.
    #[must_use]
    pub fn for_schema(schema: SchemaRef) -> Self {
        Self {
            object: Some(ObjectRef::Schema(schema)),
            ..Self::default()
        }
    }

    /// Descriptor for a backed enum.
    #[must_use]
    pub fn for_enum(descriptor: &'static EnumDescriptor) -> Self {
        Self {
            enum_ref: Some(descriptor),
            ..Self::default()
        }
    }

    /// Descriptor for a temporal type.
    #[must_use]
    pub fn for_temporal(kind: TemporalKind) -> Self {
        Self {
            object: Some(ObjectRef::Temporal(kind)),
            ..Self::default()
        }
    }

    /// Descriptor for an opaque passthrough type.
    #[must_use]
    pub fn opaque() -> Self {
        Self {
            object: Some(ObjectRef::Opaque),
            ..Self::default()
        }
    }

    /// Descriptor for a field with no declared type.
    #[must_use]
    pub fn untyped() -> Self {
        Self {
            untyped: true,
            nullable: Some(true),
            ..Self::default()
        }
    }

    /// Split a pipe-delimited directive string into [`RuleSet::extra`] form.
    #[must_use]
    pub fn split_extra(directives: &str) -> Vec<String> {
        directives
            .split('|')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Derive an [`ArrayItem`] from this descriptor, used when this is the
    /// type-derived descriptor of an array's item type.
    ///
    /// Only schema items carry sub-rules; scalar items contribute none (their
    /// coercion is type-driven and needs no descriptor).
    #[must_use]
    pub fn into_array_item(self) -> Option<ArrayItem> {
        match self.object {
            Some(ObjectRef::Schema(schema)) => Some(ArrayItem::Schema(schema)),
            _ => None
        }
    }

    /// Normalize the descriptor. Idempotent; runs at most once.
    ///
    /// Folding rules: an array-item reference forces the array category, a
    /// length bound forces the string category.
    ///
    /// # Panics
    ///
    /// Panics when more than one primitive category is set — a configuration
    /// error surfaced at schema-compile time, never at request time.
    pub fn normalize(&mut self) {
        if self.normalized {
            return;
        }
        self.normalized = true;

        if let Some(ArrayItem::Rules(inner)) = &mut self.array_item {
            inner.normalize();
        }
        if self.array_item.is_some() {
            self.array = Some(true);
        }
        if self.min_length.is_some() || self.max_length.is_some() {
            self.string = Some(true);
        }

        let categories = [
            self.string,
            self.boolean,
            self.integer,
            self.numeric,
            self.array
        ]
        .iter()
        .filter(|flag| **flag == Some(true))
        .count();
        assert!(
            categories <= 1,
            "rule descriptor error: only one primitive type can be set"
        );
    }

    /// The ordered, deduplicated scalar directive list for this field.
    ///
    /// Order: required, nullable, primitive category (`date` for temporal
    /// references, `array` for schema references), numeric bounds, length
    /// bounds, enum constraint, inclusion list, extra directives. Duplicates
    /// are dropped by directive name, first occurrence wins; a `bail`
    /// directive anywhere is hoisted to the front. Memoized after the first
    /// call.
    #[must_use]
    pub fn parse_rules(&self) -> &[Rule] {
        self.parsed.get_or_init(|| self.build_rules())
    }

    fn build_rules(&self) -> Vec<Rule> {
        let mut all: Vec<Rule> = Vec::new();

        if self.required == Some(true) {
            all.push(Rule::text("required"));
        }
        if self.nullable == Some(true) {
            all.push(Rule::text("nullable"));
        }

        if self.string == Some(true) || self.min_length.is_some() || self.max_length.is_some() {
            all.push(Rule::text("string"));
        }
        if self.boolean == Some(true) {
            all.push(Rule::text("boolean"));
        }
        if self.integer == Some(true) {
            all.push(Rule::text("integer"));
        }
        if self.numeric == Some(true) {
            all.push(Rule::text("numeric"));
        }
        if self.array == Some(true) {
            all.push(Rule::text("array"));
        }
        match self.object {
            Some(ObjectRef::Temporal(_)) => all.push(Rule::text("date")),
            Some(ObjectRef::Schema(_)) => all.push(Rule::text("array")),
            Some(ObjectRef::Opaque) | None => {}
        }

        if let Some(min) = self.min {
            all.push(Rule::text(format!("min:{}", fmt_num(min))));
        }
        if let Some(max) = self.max {
            all.push(Rule::text(format!("max:{}", fmt_num(max))));
        }
        if let Some(min_length) = self.min_length {
            all.push(Rule::text(format!("min:{min_length}")));
        }
        if let Some(max_length) = self.max_length {
            all.push(Rule::text(format!("max:{max_length}")));
        }

        if let Some(descriptor) = self.enum_ref {
            all.push(Rule::Enum {
                values: descriptor.values().to_vec(),
                only: self.enum_only.clone(),
                except: self.enum_except.clone()
            });
        }
        if let Some(in_list) = &self.in_list {
            all.push(Rule::In(in_list.clone()));
        }

        for directive in &self.extra {
            all.push(Rule::text(directive.clone()));
        }

        // Dedup by directive name, first occurrence wins.
        let mut result: Vec<Rule> = Vec::with_capacity(all.len());
        for rule in all {
            if result.iter().any(|kept| kept.name() == rule.name()) {
                continue;
            }
            result.push(rule);
        }

        // A bail directive anywhere moves to the front.
        if let Some(position) = result.iter().position(|rule| rule.is("bail"))
            && position > 0
        {
            let bail = result.remove(position);
            result.insert(0, bail);
        }

        result
    }

    /// Build the full path-keyed rule table for this field at `key`.
    ///
    /// Recurses into nested schemas (`key.child`) and array items
    /// (`key.*.child` / `key.*`), rewriting `required` directives of nested
    /// object children into `required_with:<key>` so a child's presence is
    /// only demanded when its parent is present.
    #[must_use]
    pub fn collect_rules(&self, key: &str) -> RuleTable {
        let mut table = RuleTable::new();

        let own = self.parse_rules();
        if !own.is_empty() {
            table.insert(key.to_string(), own.to_vec());
        }

        if let Some(ObjectRef::Schema(schema)) = &self.object
            && !self.shallow
        {
            for (child_key, child_rules) in schema.rules() {
                table.insert(
                    format!("{key}.{child_key}"),
                    fix_required_with(child_rules, key)
                );
            }
        }

        match &self.array_item {
            Some(ArrayItem::Schema(schema)) if !self.shallow => {
                // The asterisk already scopes the child rules to present
                // items, so no required_with rewrite is needed.
                for (child_key, child_rules) in schema.rules() {
                    table.insert(format!("{key}.*.{child_key}"), child_rules);
                }
            }
            Some(ArrayItem::Rules(item)) => {
                let item_rules = item.parse_rules();
                if !item_rules.is_empty() {
                    table.insert(format!("{key}.*"), item_rules.to_vec());
                }
            }
            Some(ArrayItem::Schema(_)) | None => {}
        }

        table
    }
}

/// Merge `extra` into `base`.
///
/// Lists concatenate per path, then dedup by directive name with the
/// earlier occurrence winning; a `bail` gained through the merge is
/// hoisted to the front like in [`RuleSet::parse_rules`].
pub fn merge_tables(base: &mut RuleTable, extra: RuleTable) {
    for (key, rules) in extra {
        let entry = base.entry(key).or_default();
        for rule in rules {
            if entry.iter().all(|kept| kept.name() != rule.name()) {
                entry.push(rule);
            }
        }
        if let Some(position) = entry.iter().position(|rule| rule.is("bail"))
            && position > 0
        {
            let bail = entry.remove(position);
            entry.insert(0, bail);
        }
    }
}

/// Rewrite a nested child's directives for inclusion under `parent_key`.
///
/// `required` becomes `required_with:<parent_key>`; an existing
/// `required_with:X` becomes `required_with:<parent_key>.X`.
fn fix_required_with(rules: Vec<Rule>, parent_key: &str) -> Vec<Rule> {
    rules
        .into_iter()
        .map(|rule| match rule {
            Rule::Text(text) if text == "required" => {
                Rule::Text(format!("{REQUIRED_WITH}{parent_key}"))
            }
            Rule::Text(text) if text.starts_with(REQUIRED_WITH) => {
                let original = &text[REQUIRED_WITH.len()..];
                Rule::Text(format!("{REQUIRED_WITH}{parent_key}.{original}"))
            }
            other => other
        })
        .collect()
}

/// Format a bound like the source annotations do: integral values print
/// without a fractional part.
fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
