// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! DtoEnum derive macro implementation.
//!
//! Derives [`BackedEnum`] and `DtoValue` for a unit-variant enum so it can
//! be used as a DTO field. Each variant maps to a backing value: an explicit
//! `#[dto(value = <lit>)]`, else the (optionally case-converted) variant
//! name as a string.
//!
//! [`BackedEnum`]: https://docs.rs/dto-core

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Fields, Ident, Lit, LitStr, parse_macro_input};

use crate::dto::parse::RenameRule;

/// Main entry point for the DtoEnum derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match EnumDef::from_derive_input(&input) {
        Ok(def) => generate(&def).into(),
        Err(err) => err.to_compile_error().into()
    }
}

/// One variant with its resolved backing value.
#[derive(Debug)]
struct VariantDef {
    ident: Ident,
    value: Lit
}

/// Fully parsed enum derive input.
#[derive(Debug)]
struct EnumDef {
    ident: Ident,
    variants: Vec<VariantDef>
}

impl EnumDef {
    fn from_derive_input(input: &DeriveInput) -> syn::Result<Self> {
        let syn::Data::Enum(data) = &input.data else {
            return Err(syn::Error::new_spanned(
                input,
                "DtoEnum can only be derived for enums"
            ));
        };

        let case = class_case(input)?;

        let variants = data
            .variants
            .iter()
            .map(|variant| {
                if !matches!(variant.fields, Fields::Unit) {
                    return Err(syn::Error::new_spanned(
                        variant,
                        "DtoEnum variants must be unit variants"
                    ));
                }
                let value = variant_value(variant, case)?;
                Ok(VariantDef {
                    ident: variant.ident.clone(),
                    value
                })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        if variants.is_empty() {
            return Err(syn::Error::new_spanned(
                input,
                "DtoEnum requires at least one variant"
            ));
        }

        Ok(Self {
            ident: input.ident.clone(),
            variants
        })
    }
}

fn class_case(input: &DeriveInput) -> syn::Result<Option<RenameRule>> {
    let mut case = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("dto") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let name: LitStr = meta.value()?.parse()?;
                case = Some(RenameRule::parse(&name.value()).ok_or_else(|| {
                    syn::Error::new(
                        name.span(),
                        format!("unsupported rename_all convention `{}`", name.value())
                    )
                })?);
                return Ok(());
            }
            Err(meta.error("unknown dto enum attribute"))
        })?;
    }
    Ok(case)
}

fn variant_value(variant: &syn::Variant, case: Option<RenameRule>) -> syn::Result<Lit> {
    let mut explicit = None;
    for attr in &variant.attrs {
        if !attr.path().is_ident("dto") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("value") {
                explicit = Some(meta.value()?.parse()?);
                return Ok(());
            }
            Err(meta.error("unknown dto variant attribute"))
        })?;
    }
    if let Some(lit) = explicit {
        return Ok(lit);
    }

    let name = variant.ident.to_string();
    let name = match case {
        Some(rule) => rule.apply(&name),
        None => name
    };
    Ok(Lit::Str(LitStr::new(&name, variant.ident.span())))
}

fn generate(def: &EnumDef) -> TokenStream2 {
    let ident = &def.ident;
    let name_str = ident.to_string();
    let variants: Vec<&Ident> = def.variants.iter().map(|v| &v.ident).collect();
    let values: Vec<&Lit> = def.variants.iter().map(|v| &v.value).collect();

    quote! {
        impl ::dto_core::value::BackedEnum for #ident {
            fn descriptor() -> &'static ::dto_core::rules::EnumDescriptor {
                static DESCRIPTOR: ::std::sync::OnceLock<::dto_core::rules::EnumDescriptor> =
                    ::std::sync::OnceLock::new();
                DESCRIPTOR.get_or_init(|| {
                    ::dto_core::rules::EnumDescriptor::new(
                        #name_str,
                        ::std::vec![#(::dto_core::serde_json::json!(#values)),*]
                    )
                })
            }

            fn from_backing(
                value: &::dto_core::serde_json::Value
            ) -> ::core::option::Option<Self> {
                #(
                    if ::dto_core::value::backing_eq(
                        value,
                        &::dto_core::serde_json::json!(#values)
                    ) {
                        return ::core::option::Option::Some(Self::#variants);
                    }
                )*
                ::core::option::Option::None
            }

            fn backing(&self) -> ::dto_core::serde_json::Value {
                match self {
                    #(Self::#variants => ::dto_core::serde_json::json!(#values)),*
                }
            }
        }

        impl ::dto_core::value::DtoValue for #ident {
            fn base_rules() -> ::dto_core::rules::RuleSet {
                ::dto_core::rules::RuleSet::for_enum(
                    <Self as ::dto_core::value::BackedEnum>::descriptor()
                )
            }

            fn from_raw(
                value: ::dto_core::serde_json::Value,
                _rules: &::dto_core::rules::RuleSet
            ) -> ::core::result::Result<Self, ::dto_core::error::CoerceError> {
                ::dto_core::value::enum_from_raw(value)
            }

            fn to_raw(
                &self,
                _cx: &::dto_core::serialize::SerializeCx
            ) -> ::dto_core::serde_json::Value {
                ::dto_core::value::BackedEnum::backing(self)
            }
        }
    }
}
