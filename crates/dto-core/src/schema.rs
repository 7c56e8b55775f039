// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Compiled class schemas and the field rule compiler.
//!
//! A [`ClassSchema`] is the per-type compilation result: every declared
//! field with its [`RuleSet`] descriptor, plus the class-level construction
//! and serialization configuration. Schemas are built once per type inside a
//! `OnceLock` owned by the generated `Dto::class_schema` impl — lazy,
//! append-only for the process lifetime, and race-tolerant (a redundant
//! concurrent compilation is idempotent and side-effect-free).
//!
//! [`compile_field`] is the rule compiler: it merges an explicit descriptor
//! (from `#[dto(rules(...))]` or a builder call) with the defaults derived
//! from the field's Rust type, then normalizes the result.

use std::fmt;

use crate::{
    dto::FromDataConfig,
    integrations::request::PropertySource,
    rules::{RuleSet, RuleTable},
    serialize::ToArrayConfig,
    value::DtoValue
};

/// Lazy reference to another type's schema and rule table.
///
/// Both accessors are plain function pointers into the referenced type's
/// generated impl, so building a schema never forces nested schemas eagerly.
#[derive(Clone, Copy)]
pub struct SchemaRef {
    name: &'static str,
    schema: fn() -> &'static ClassSchema,
    rules: fn() -> RuleTable
}

impl SchemaRef {
    /// Create a reference from the target type's name and accessors.
    #[must_use]
    pub fn new(
        name: &'static str,
        schema: fn() -> &'static ClassSchema,
        rules: fn() -> RuleTable
    ) -> Self {
        Self {
            name,
            schema,
            rules
        }
    }

    /// Referenced type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The referenced type's compiled schema.
    #[must_use]
    pub fn schema(&self) -> &'static ClassSchema {
        (self.schema)()
    }

    /// The referenced type's full rule table (fields plus extra rules).
    #[must_use]
    pub fn rules(&self) -> RuleTable {
        (self.rules)()
    }
}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SchemaRef").field(&self.name).finish()
    }
}

/// Where a request-bound field reads its raw value from.
#[derive(Debug, Clone, Copy)]
pub struct FieldSource {
    /// Request source (query, path, header, cookie, body).
    pub source: PropertySource,

    /// Alternate name in that source; defaults to the field's wire name.
    pub name: Option<&'static str>
}

/// One declared field of a schema.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: &'static str,
    rules: RuleSet,
    has_default: bool,
    hidden: bool,
    source: Option<FieldSource>
}

impl FieldSchema {
    /// Create a field schema from its wire name and compiled descriptor.
    #[must_use]
    pub fn new(name: &'static str, rules: RuleSet) -> Self {
        Self {
            name,
            rules,
            has_default: false,
            hidden: false,
            source: None
        }
    }

    /// Mark the field as carrying a construction-time default.
    #[must_use]
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Hide the field from serialization unless re-included explicitly.
    #[must_use]
    pub fn hide(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Bind the field to a request source.
    #[must_use]
    pub fn with_source(mut self, source: PropertySource, name: Option<&'static str>) -> Self {
        self.source = Some(FieldSource {
            source,
            name
        });
        self
    }

    /// Wire name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Compiled rule descriptor.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Whether the field carries a construction-time default.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.has_default
    }

    /// Whether the field is hidden from serialization.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Request binding, when declared.
    #[must_use]
    pub fn source(&self) -> Option<&FieldSource> {
        self.source.as_ref()
    }
}

/// Compiled schema of one DTO type.
#[derive(Debug)]
pub struct ClassSchema {
    name: &'static str,
    fields: Vec<FieldSchema>,
    from_data: Option<FromDataConfig>,
    to_array: ToArrayConfig
}

impl ClassSchema {
    /// Start building a schema for the named type.
    #[must_use]
    pub fn builder(name: &'static str) -> ClassSchemaBuilder {
        ClassSchemaBuilder {
            name,
            fields: Vec::new(),
            from_data: None,
            to_array: None
        }
    }

    /// Type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Look up a field by wire name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// A field's rule descriptor.
    ///
    /// # Panics
    ///
    /// Panics when the field is not part of the schema. Generated code only
    /// asks for fields it registered itself.
    #[must_use]
    pub fn rules(&self, name: &str) -> &RuleSet {
        self.field(name)
            .map(FieldSchema::rules)
            .expect("field registered in schema")
    }

    /// Class-declared construction pre-processing configuration. `None`
    /// when the class declared nothing, so profile defaults can apply.
    #[must_use]
    pub fn from_data(&self) -> Option<&FromDataConfig> {
        self.from_data.as_ref()
    }

    /// Serialization configuration.
    #[must_use]
    pub fn to_array(&self) -> &ToArrayConfig {
        &self.to_array
    }
}

/// Builder used by generated `class_schema` impls and manual registrations.
#[derive(Debug)]
pub struct ClassSchemaBuilder {
    name: &'static str,
    fields: Vec<FieldSchema>,
    from_data: Option<FromDataConfig>,
    to_array: Option<ToArrayConfig>
}

impl ClassSchemaBuilder {
    /// Set the construction pre-processing configuration.
    #[must_use]
    pub fn from_data(mut self, config: FromDataConfig) -> Self {
        self.from_data = Some(config);
        self
    }

    /// Set the serialization configuration.
    #[must_use]
    pub fn to_array(mut self, config: ToArrayConfig) -> Self {
        self.to_array = Some(config);
        self
    }

    /// Register a field. Declaration order is preserved.
    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Finish the schema, normalizing every descriptor.
    ///
    /// # Panics
    ///
    /// Panics on descriptor configuration errors (see
    /// [`RuleSet::normalize`]).
    #[must_use]
    pub fn build(mut self) -> ClassSchema {
        for field in &mut self.fields {
            field.rules.normalize();
        }
        tracing::debug!(
            class = self.name,
            fields = self.fields.len(),
            "compiled dto schema"
        );
        ClassSchema {
            name: self.name,
            fields: self.fields,
            from_data: self.from_data,
            to_array: self.to_array.unwrap_or_default()
        }
    }
}

/// Compile one field's descriptor: explicit annotations merged with
/// type-derived defaults, then normalized.
///
/// Inference, mirroring the source annotation semantics:
///
/// - `required` — set iff the type is declared (not [`RuleSet::untyped`])
///   and the field carries no default;
/// - `nullable` — set when the type admits null (`Option`, untyped);
/// - primitive category, enum/object/array-item references — from the
///   type's [`DtoValue::base_rules`]; explicit references win.
///
/// Explicit flags combine with (never negate) type-derived flags: an
/// explicit category conflicting with the declared type is a configuration
/// error caught by normalization.
#[must_use]
pub fn compile_field<T: DtoValue>(explicit: RuleSet, has_default: bool) -> RuleSet {
    let base = T::base_rules();
    let mut merged = explicit;

    if merged.required.is_none() && !base.untyped && !has_default {
        merged.required = Some(true);
    }
    if merged.nullable.is_none() && (base.nullable == Some(true) || base.untyped) {
        merged.nullable = Some(true);
    }

    for (flag, derived) in [
        (&mut merged.string, base.string),
        (&mut merged.boolean, base.boolean),
        (&mut merged.integer, base.integer),
        (&mut merged.numeric, base.numeric),
        (&mut merged.array, base.array)
    ] {
        if derived == Some(true) {
            *flag = Some(true);
        }
    }

    if merged.enum_ref.is_none() {
        merged.enum_ref = base.enum_ref;
    }
    if merged.object.is_none() {
        merged.object = base.object;
    }
    if merged.array_item.is_none() {
        merged.array_item = base.array_item;
    }
    merged.untyped = base.untyped;

    merged.normalize();
    merged
}

/// Build the rule table covering every field of a schema.
///
/// Walks fields in declaration order and merges each field's
/// [`RuleSet::collect_rules`] expansion. Extra class-level rules are
/// appended by `Dto::validation_rules`, not here.
#[must_use]
pub fn class_rules(schema: &ClassSchema) -> RuleTable {
    let mut table = RuleTable::new();
    for field in schema.fields() {
        table.extend(field.rules().collect_rules(field.name()));
    }
    table
}
