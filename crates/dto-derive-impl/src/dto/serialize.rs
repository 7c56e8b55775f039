// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `to_map` generation and the nested-value impl.
//!
//! `to_map` dumps every declared field in declaration order, hidden fields
//! included; visibility filtering happens in the serialization pipeline, not
//! here. The `DtoValue` impl makes the derived type usable as a field of
//! other DTOs: coercion goes through `from_map`, serialization through
//! `to_value`.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::DtoDef;

/// Generate the `to_map` trait fn.
pub fn to_map_fn(def: &DtoDef) -> TokenStream {
    let inserts = def.fields.iter().map(|field| {
        let ident = &field.ident;
        let wire = field.wire_name(def.case);
        quote! {
            map.insert(
                ::std::string::String::from(#wire),
                ::dto_core::value::DtoValue::to_raw(&self.#ident, cx)
            );
        }
    });

    quote! {
        fn to_map(
            &self,
            cx: &::dto_core::serialize::SerializeCx
        ) -> ::dto_core::serde_json::Map<
            ::std::string::String,
            ::dto_core::serde_json::Value
        > {
            let mut map = ::dto_core::serde_json::Map::new();
            #(#inserts)*
            map
        }
    }
}

/// Generate the `DtoValue` impl for the derived type.
pub fn value_impl(def: &DtoDef) -> TokenStream {
    let ident = &def.attrs.ident;
    let name_str = def.name_str();

    quote! {
        impl ::dto_core::value::DtoValue for #ident {
            fn base_rules() -> ::dto_core::rules::RuleSet {
                ::dto_core::rules::RuleSet::for_schema(::dto_core::schema::SchemaRef::new(
                    #name_str,
                    || <#ident as ::dto_core::dto::Dto>::class_schema(),
                    || <#ident as ::dto_core::dto::Dto>::validation_rules()
                ))
            }

            fn from_raw(
                value: ::dto_core::serde_json::Value,
                _rules: &::dto_core::rules::RuleSet
            ) -> ::core::result::Result<Self, ::dto_core::error::CoerceError> {
                match value {
                    ::dto_core::serde_json::Value::Object(map) => {
                        <Self as ::dto_core::dto::Dto>::from_map(map).map_err(|source| {
                            ::dto_core::error::CoerceError::nested(#name_str, source)
                        })
                    }
                    _ => ::core::result::Result::Err(
                        ::dto_core::error::CoerceError::NotObject {
                            class: #name_str
                        }
                    )
                }
            }

            fn from_raw_opt(
                value: ::dto_core::serde_json::Value,
                rules: &::dto_core::rules::RuleSet
            ) -> ::core::result::Result<
                ::core::option::Option<Self>,
                ::dto_core::error::CoerceError
            > {
                if ::dto_core::value::absent_for_object(&value) {
                    return ::core::result::Result::Ok(::core::option::Option::None);
                }
                <Self as ::dto_core::value::DtoValue>::from_raw(value, rules)
                    .map(::core::option::Option::Some)
            }

            fn to_raw(
                &self,
                _cx: &::dto_core::serialize::SerializeCx
            ) -> ::dto_core::serde_json::Value {
                ::dto_core::dto::Dto::to_value(self)
            }
        }
    }
}
