// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dto_core::prelude::*;
//! ```

pub use crate::{
    dto::{ConfigDto, Dto, FromDataConfig, FromDataOptions, RequestDto, ResponseDto},
    error::{CoerceError, DtoError, ValidationErrors},
    integrations::{
        request::{DtoRequest, PropertySource, SimpleRequest},
        response::DtoResponse,
        validator::{RuleEngine, ValidateOptions, Validator}
    },
    rules::{ArrayItem, EnumDescriptor, ObjectRef, Rule, RuleSet, RuleTable, TemporalKind},
    schema::{ClassSchema, FieldSchema, SchemaRef},
    serialize::{EmptyArrayAsObject, SerializeCx, ToArrayConfig},
    value::{BackedEnum, DtoValue}
};
