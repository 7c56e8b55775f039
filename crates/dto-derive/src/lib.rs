// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # dto-derive
//!
//! One crate, all features. Re-exports:
//! - [`Dto`] and [`DtoEnum`] derive macros from `dto-derive-impl`
//! - All runtime modules from `dto-core` ([`dto::Dto`], [`rules::RuleSet`],
//!   [`integrations`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dto_derive::{Dto, prelude::*};
//! use serde_json::json;
//!
//! #[derive(Dto)]
//! pub struct CreateUser {
//!     #[dto(rules(min_length = 2))]
//!     pub name: String,
//!     #[dto(default)]
//!     pub age: Option<u32>,
//! }
//!
//! let user = CreateUser::from_data(json!({"name": "alice", "age": "30"}))?;
//! assert_eq!(user.age, Some(30));
//! ```

// Re-export derive macros
// Re-export all runtime modules
pub use dto_core::*;
pub use dto_derive_impl::{Dto, DtoEnum};
