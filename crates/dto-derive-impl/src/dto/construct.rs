// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `from_map` generation: per-field extraction and coercion from the
//! validated raw map.
//!
//! Fields without a default go through `build::required` and surface
//! `MissingField` when absent. Defaulted fields go through `build::optional`
//! so an absent, null, or empty-string value falls back to the default.

use proc_macro2::TokenStream;
use quote::quote;
use syn::Lit;

use super::parse::{DefaultSpec, DtoDef};

/// Generate the `from_map` trait fn.
pub fn from_map_fn(def: &DtoDef) -> TokenStream {
    let assignments = def.fields.iter().map(|field| {
        let ident = &field.ident;
        let ty = &field.ty;
        let wire = field.wire_name(def.case);
        match &field.default {
            None => quote! {
                #ident: ::dto_core::build::required::<#ty>(schema, &mut map, #wire)?,
            },
            Some(spec) => {
                let fallback = default_expr(spec);
                quote! {
                    #ident: match ::dto_core::build::optional::<#ty>(
                        schema, &mut map, #wire
                    )? {
                        ::core::option::Option::Some(value) => value,
                        ::core::option::Option::None => #fallback
                    },
                }
            }
        }
    });

    quote! {
        fn from_map(
            map: ::dto_core::serde_json::Map<
                ::std::string::String,
                ::dto_core::serde_json::Value
            >
        ) -> ::core::result::Result<Self, ::dto_core::error::DtoError> {
            let schema = <Self as ::dto_core::dto::Dto>::class_schema();
            let mut map = map;
            ::core::result::Result::Ok(Self {
                #(#assignments)*
            })
        }
    }
}

fn default_expr(spec: &DefaultSpec) -> TokenStream {
    match spec {
        DefaultSpec::Trait => quote! { ::core::default::Default::default() },
        DefaultSpec::Lit(Lit::Str(text)) => quote! { ::std::string::String::from(#text) },
        DefaultSpec::Lit(lit) => quote! { #lit }
    }
}

#[cfg(test)]
mod tests {
    use syn::{DeriveInput, parse_quote};

    use super::*;

    fn expand(input: DeriveInput) -> String {
        let def = DtoDef::from_derive_input(&input).expect("parse");
        from_map_fn(&def).to_string()
    }

    #[test]
    fn plain_fields_are_required() {
        let code = expand(parse_quote! {
            struct User {
                name: String
            }
        });

        assert!(code.contains("build :: required :: < String > (schema , & mut map , \"name\")"));
    }

    #[test]
    fn defaulted_fields_fall_back() {
        let code = expand(parse_quote! {
            struct Paged {
                #[dto(default = 1)]
                page: u32,
                #[dto(default)]
                trace: Option<String>,
                #[dto(default = "guest")]
                role: String
            }
        });

        assert!(code.contains("build :: optional :: < u32 >"));
        assert!(code.contains(":: core :: option :: Option :: None => 1"));
        assert!(code.contains("None => :: core :: default :: Default :: default ()"));
        assert!(code.contains("String :: from (\"guest\")"));
    }

    #[test]
    fn wire_names_respect_rename_all() {
        let code = expand(parse_quote! {
            #[dto(rename_all = "camelCase")]
            struct User {
                first_name: String
            }
        });

        assert!(code.contains("\"firstName\""));
    }
}
