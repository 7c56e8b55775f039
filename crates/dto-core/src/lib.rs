// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Core traits and runtime engine for dto-derive.
//!
//! This crate holds everything the `#[derive(Dto)]` generated code calls
//! into: rule descriptors and their directive synthesis, class schemas,
//! raw-value coercion, serialization shaping and the framework seams. It
//! can also be used standalone for manual trait implementations.
//!
//! # Overview
//!
//! - [`dto::Dto`] — the facade trait: validated construction from raw data
//!   and serialization back to plain values
//! - [`rules::RuleSet`] — compiled per-field descriptors and the
//!   synthesized [`rules::RuleTable`]
//! - [`value::DtoValue`] — per-type coercion between raw JSON and fields
//! - [`integrations`] — request, response and validator seams
//! - [`prelude`] — convenient re-exports
//!
//! # Usage
//!
//! Most users should use `dto-derive` directly, which re-exports this
//! crate. For manual implementations:
//!
//! ```rust,ignore
//! use dto_core::prelude::*;
//!
//! impl Dto for Manual {
//!     fn class_schema() -> &'static ClassSchema { /* ... */ }
//!     // ...
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod build;
pub mod config;
pub mod dto;
pub mod error;
pub mod integrations;
pub mod prelude;
pub mod rules;
pub mod schema;
pub mod serialize;
pub mod util;
pub mod value;

/// Re-export serde_json for generated code.
pub use serde_json;
