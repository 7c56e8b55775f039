// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! # Attribute Quick Reference
//!
//! ## Class-Level `#[dto(...)]`
//!
//! ```rust,ignore
//! #[derive(Dto)]
//! #[dto(
//!     rename_all = "camelCase",        // Optional: wire name convention
//!     request,                         // Optional: RequestDto marker impl
//!     response,                        // Optional: ResponseDto marker impl
//!     config,                          // Optional: ConfigDto marker impl
//!     extra_rules = "user_rules",      // Optional: fn() -> RuleTable with extra rules
//!     from_data(trim, ignore_null),    // Optional: input pre-processing
//!     to_array(exclude(secret))        // Optional: serialization config
//! )]
//! pub struct CreateUser { /* ... */ }
//! ```
//!
//! ## Field-Level Attributes
//!
//! ```rust,ignore
//! pub struct CreateUser {
//!     #[dto(rules(min_length = 2, max_length = 50))]  // Explicit rule annotations
//!     pub name: String,
//!
//!     #[dto(default = 18)]              // Construction-time default literal
//!     pub age: u32,
//!
//!     #[dto(default)]                   // Default::default() fallback
//!     pub note: Option<String>,
//!
//!     #[dto(rename = "userEmail")]      // Explicit wire name
//!     pub email: String,
//!
//!     #[dto(hidden)]                    // Excluded from serialization
//!     pub password: String,
//!
//!     #[dto(source(query))]             // Request binding: read from query string
//!     pub page: u32,
//!
//!     #[dto(source(header, name = "x-trace-id"))]  // Alternate name in the source
//!     pub trace: Option<String>,
//!
//!     #[dto(item(integer, min = 1))]    // Inline descriptor for array items
//!     pub scores: Vec<i64>,
//! }
//! ```
//!
//! # Generated Code Overview
//!
//! For a `CreateUser` struct, the macro generates:
//!
//! | Impl | Description |
//! |------|-------------|
//! | `impl Dto` | `class_schema` (compiled once per process), `from_map`, `to_map` |
//! | `impl DtoValue` | Lets `CreateUser` be a field of other DTOs |
//! | `impl RequestDto` | From `#[dto(request)]`: construction from HTTP requests |
//! | `impl ResponseDto` | From `#[dto(response)]`: serialization into HTTP responses |
//! | `impl ConfigDto` | From `#[dto(config)]`: construction from configuration trees |
//!
//! # Rule Synthesis
//!
//! Validator directives come from three merged layers, in priority order:
//!
//! 1. explicit `#[dto(rules(...))]` annotations;
//! 2. defaults derived from the field's Rust type (`String` contributes
//!    `string`, `Option<T>` contributes `nullable`, a field without a
//!    default contributes `required`);
//! 3. class-level extra rules from `extra_rules`, which never override the
//!    first two layers.
//!
//! Nested DTO fields expand their own rule tables under dotted paths
//! (`address.city`) and array-item paths (`items.*.name`).

mod dto;
mod dto_enum;

use proc_macro::TokenStream;

/// Derive macro generating schema, construction and serialization impls for
/// a declarative data-transfer struct.
///
/// # Overview
///
/// A `Dto` struct declares its fields once; the macro compiles a per-type
/// schema from the declarations and implements conversion in both
/// directions: untyped map in, untyped map out. Validation directives are
/// synthesized from the same declarations and handed to the registered
/// validator before construction.
///
/// # Class Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `rename_all = "..."` | Wire name convention: `camelCase`, `snake_case`, `PascalCase`, `kebab-case` |
/// | `request` / `response` / `config` | Facade marker impls |
/// | `extra_rules = "path"` | `fn() -> RuleTable` merged into the synthesized rules |
/// | `from_data(...)` | Input pre-processing: `ignore_null`, `ignore_empty`, `trim`, `validate_all_with_bail` |
/// | `to_array(...)` | Serialization: `only`, `include`, `exclude`, `ignore_null`, `empty_array_as_object`, `single_key`, `date_format` |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `rename = "..."` | Explicit wire name, wins over `rename_all` |
/// | `default` / `default = <lit>` | Construction fallback; suppresses the inferred `required` |
/// | `hidden` | Excluded from serialization unless re-included via `to_array` |
/// | `source(kind)` / `source(kind, name = "...")` | Request binding: `query`, `path`, `header`, `cookie`, `body`, `form`, `json` |
/// | `rules(...)` | Explicit rule annotations; see below |
/// | `item(...)` | Inline rule descriptor applied to each array element |
///
/// # Rule Annotations
///
/// Inside `rules(...)` and `item(...)`:
///
/// | Annotation | Directive |
/// |------------|-----------|
/// | `required`, `nullable` | Presence and null admission |
/// | `string`, `boolean`, `integer`, `numeric`, `array` | Primitive category (at most one) |
/// | `min = n`, `max = n` | Numeric bounds |
/// | `min_length = n`, `max_length = n` | String length bounds (imply `string`) |
/// | `one_of(a, b, ...)` | Inclusion list |
/// | `enum_only(...)`, `enum_except(...)` | Narrow a backed-enum membership check |
/// | `bail` | Stop at the field's first failing directive |
/// | `shallow` | Suppress recursive expansion of a nested schema's rules |
/// | `extra = "a\|b"` / `extra("a", "b")` | Free-form engine directives |
///
/// # Examples
///
/// ```rust,ignore
/// use dto_derive::Dto;
/// use serde_json::json;
///
/// #[derive(Dto)]
/// pub struct CreateUser {
///     #[dto(rules(min_length = 2, max_length = 50))]
///     pub name: String,
///     #[dto(default)]
///     pub age: Option<u32>,
/// }
///
/// let user = CreateUser::from_data(json!({"name": "alice"}))?;
/// assert_eq!(user.name, "alice");
/// assert_eq!(user.age, None);
/// ```
#[proc_macro_derive(Dto, attributes(dto))]
pub fn derive_dto(input: TokenStream) -> TokenStream {
    dto::derive(input)
}

/// Derive macro for enums backed by scalar wire values.
///
/// # Overview
///
/// A backed enum maps each unit variant to a scalar backing value. Derived
/// impls let the enum be used as a DTO field: raw input is matched against
/// the backing values with loose scalar equality (`"1"` matches `1`), and
/// rule synthesis contributes an enum membership directive.
///
/// # Attributes
///
/// | Attribute | Level | Description |
/// |-----------|-------|-------------|
/// | `rename_all = "..."` | Enum | Case convention for derived string values |
/// | `value = <lit>` | Variant | Explicit backing value (string, integer or boolean) |
///
/// Without annotations, each variant's backing value is its name as a
/// string.
///
/// # Examples
///
/// ```rust,ignore
/// use dto_derive::{Dto, DtoEnum};
///
/// #[derive(DtoEnum, Debug, PartialEq)]
/// pub enum Status {
///     #[dto(value = 1)]
///     Active,
///     #[dto(value = 0)]
///     Disabled,
/// }
///
/// #[derive(Dto)]
/// pub struct UpdateUser {
///     pub status: Status,
/// }
/// ```
#[proc_macro_derive(DtoEnum, attributes(dto))]
pub fn derive_dto_enum(input: TokenStream) -> TokenStream {
    dto_enum::derive(input)
}
