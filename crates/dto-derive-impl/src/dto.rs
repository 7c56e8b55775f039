// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Dto derive macro implementation.
//!
//! # Architecture
//!
//! ```text
//! dto.rs (orchestrator)
//! │
//! ├── parse.rs     → ClassAttrs, FieldDef, DtoDef
//! ├── schema.rs    → class_schema (compiled field descriptors)
//! ├── construct.rs → from_map (field extraction and coercion)
//! └── serialize.rs → to_map, DtoValue impl, facade marker impls
//! ```
//!
//! # Generated Code
//!
//! For a struct like:
//!
//! ```rust,ignore
//! #[derive(Dto)]
//! #[dto(request)]
//! pub struct CreateUser {
//!     #[dto(rules(min_length = 2))]
//!     pub name: String,
//!     #[dto(default)]
//!     pub age: Option<u32>,
//! }
//! ```
//!
//! the macro generates:
//!
//! | Impl | Purpose |
//! |------|---------|
//! | `impl Dto` | `class_schema`, `from_map`, `to_map` |
//! | `impl DtoValue` | usable as a nested field of other DTOs |
//! | `impl RequestDto` | facade marker from `#[dto(request)]` |

mod construct;
pub mod parse;
mod schema;
mod serialize;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use self::parse::DtoDef;

/// Main entry point for the Dto derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match DtoDef::from_derive_input(&input) {
        Ok(def) => generate(&def).into(),
        Err(err) => err.write_errors().into()
    }
}

fn generate(def: &DtoDef) -> TokenStream2 {
    let ident = &def.attrs.ident;
    let class_schema = schema::class_schema_fn(def);
    let from_map = construct::from_map_fn(def);
    let to_map = serialize::to_map_fn(def);
    let extra_rules = def.attrs.extra_rules.as_ref().map(|path| {
        quote! {
            fn extra_rules() -> ::dto_core::rules::RuleTable {
                #path()
            }
        }
    });
    let value_impl = serialize::value_impl(def);
    let markers = marker_impls(def);

    quote! {
        impl ::dto_core::dto::Dto for #ident {
            #class_schema
            #from_map
            #to_map
            #extra_rules
        }

        #value_impl

        #markers
    }
}

fn marker_impls(def: &DtoDef) -> TokenStream2 {
    let ident = &def.attrs.ident;
    let mut markers = TokenStream2::new();
    if def.attrs.request {
        markers.extend(quote! {
            impl ::dto_core::dto::RequestDto for #ident {}
        });
    }
    if def.attrs.response {
        markers.extend(quote! {
            impl ::dto_core::dto::ResponseDto for #ident {}
        });
    }
    if def.attrs.config {
        markers.extend(quote! {
            impl ::dto_core::dto::ConfigDto for #ident {}
        });
    }
    markers
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn expand(input: DeriveInput) -> String {
        let def = DtoDef::from_derive_input(&input).expect("parse");
        generate(&def).to_string()
    }

    #[test]
    fn generates_all_three_trait_members() {
        let code = expand(parse_quote! {
            struct User {
                name: String
            }
        });

        assert!(code.contains("fn class_schema"));
        assert!(code.contains("fn from_map"));
        assert!(code.contains("fn to_map"));
        assert!(code.contains("impl :: dto_core :: value :: DtoValue for User"));
    }

    #[test]
    fn facade_flags_emit_marker_impls() {
        let code = expand(parse_quote! {
            #[dto(request, response)]
            struct User {
                name: String
            }
        });

        assert!(code.contains(":: dto_core :: dto :: RequestDto for User"));
        assert!(code.contains(":: dto_core :: dto :: ResponseDto for User"));
        assert!(!code.contains("ConfigDto for User"));
    }

    #[test]
    fn extra_rules_delegates_to_named_function() {
        let code = expand(parse_quote! {
            #[dto(extra_rules = "user_rules")]
            struct User {
                name: String
            }
        });

        assert!(code.contains("fn extra_rules"));
        assert!(code.contains("user_rules ()"));
    }
}
