// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `class_schema` generation: one `OnceLock`-backed compiled schema per
//! derived type.
//!
//! Rule annotations become a mutate-a-default block rather than a struct
//! literal because the descriptor type carries private memoization fields.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::parse::{DtoDef, EmptyArrayAttr, FieldDef, RuleAttrs, ToArrayAttrs};

/// Generate the `class_schema` trait fn.
pub fn class_schema_fn(def: &DtoDef) -> TokenStream {
    let name_str = def.name_str();
    let fields = def.fields.iter().map(|field| field_expr(def, field));
    let from_data = def.attrs.from_data.as_ref().map(|attrs| {
        let ignore_null = attrs.ignore_null;
        let ignore_empty = attrs.ignore_empty;
        let trim = attrs.trim;
        let validate_all_with_bail = attrs.validate_all_with_bail;
        quote! {
            .from_data(::dto_core::dto::FromDataConfig {
                ignore_null: #ignore_null,
                ignore_empty: #ignore_empty,
                trim: #trim,
                validate_all_with_bail: #validate_all_with_bail
            })
        }
    });
    let to_array = def.attrs.to_array.as_ref().map(to_array_expr);

    quote! {
        fn class_schema() -> &'static ::dto_core::schema::ClassSchema {
            static SCHEMA: ::std::sync::OnceLock<::dto_core::schema::ClassSchema> =
                ::std::sync::OnceLock::new();
            SCHEMA.get_or_init(|| {
                ::dto_core::schema::ClassSchema::builder(#name_str)
                    #(.field(#fields))*
                    #from_data
                    #to_array
                    .build()
            })
        }
    }
}

fn field_expr(def: &DtoDef, field: &FieldDef) -> TokenStream {
    let wire = field.wire_name(def.case);
    let ty = &field.ty;
    let rules = rule_set_expr(&field.rules, field.item.as_ref());
    let has_default = field.has_default();

    let mut expr = quote! {
        ::dto_core::schema::FieldSchema::new(
            #wire,
            ::dto_core::schema::compile_field::<#ty>(#rules, #has_default)
        )
    };
    if has_default {
        expr = quote! { #expr.with_default() };
    }
    if field.hidden {
        expr = quote! { #expr.hide() };
    }
    if let Some(source) = &field.source {
        let variant = format_ident!(
            "{}",
            capitalize(&source.kind.to_string()),
            span = source.kind.span()
        );
        let name = match &source.name {
            Some(name) => quote! { ::core::option::Option::Some(#name) },
            None => quote! { ::core::option::Option::None }
        };
        expr = quote! {
            #expr.with_source(
                ::dto_core::integrations::request::PropertySource::#variant,
                #name
            )
        };
    }
    expr
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new()
    }
}

/// Lower explicit rule annotations into a descriptor expression.
pub fn rule_set_expr(rules: &RuleAttrs, item: Option<&RuleAttrs>) -> TokenStream {
    let mut setters = Vec::new();

    for (set, field) in [
        (rules.required, quote! { required }),
        (rules.nullable, quote! { nullable }),
        (rules.string, quote! { string }),
        (rules.boolean, quote! { boolean }),
        (rules.integer, quote! { integer }),
        (rules.numeric, quote! { numeric }),
        (rules.array, quote! { array })
    ] {
        if set {
            setters.push(quote! {
                rules.#field = ::core::option::Option::Some(true);
            });
        }
    }
    if rules.shallow {
        setters.push(quote! { rules.shallow = true; });
    }
    if let Some(min) = &rules.min {
        setters.push(quote! {
            rules.min = ::core::option::Option::Some(#min as f64);
        });
    }
    if let Some(max) = &rules.max {
        setters.push(quote! {
            rules.max = ::core::option::Option::Some(#max as f64);
        });
    }
    if let Some(min_length) = &rules.min_length {
        setters.push(quote! {
            rules.min_length = ::core::option::Option::Some(#min_length);
        });
    }
    if let Some(max_length) = &rules.max_length {
        setters.push(quote! {
            rules.max_length = ::core::option::Option::Some(#max_length);
        });
    }
    if !rules.one_of.is_empty() {
        let values = &rules.one_of;
        setters.push(quote! {
            rules.in_list = ::core::option::Option::Some(::std::vec![
                #(::dto_core::serde_json::json!(#values)),*
            ]);
        });
    }
    if !rules.enum_only.is_empty() {
        let values = &rules.enum_only;
        setters.push(quote! {
            rules.enum_only = ::core::option::Option::Some(::std::vec![
                #(::dto_core::serde_json::json!(#values)),*
            ]);
        });
    }
    if !rules.enum_except.is_empty() {
        let values = &rules.enum_except;
        setters.push(quote! {
            rules.enum_except = ::core::option::Option::Some(::std::vec![
                #(::dto_core::serde_json::json!(#values)),*
            ]);
        });
    }

    let mut extra = rules.extra.clone();
    if rules.bail {
        extra.insert(0, "bail".to_string());
    }
    if !extra.is_empty() {
        setters.push(quote! {
            rules.extra = ::std::vec![#(::std::string::String::from(#extra)),*];
        });
    }

    if let Some(item) = item {
        let inner = rule_set_expr(item, None);
        setters.push(quote! {
            rules.array_item = ::core::option::Option::Some(
                ::dto_core::rules::ArrayItem::Rules(::std::boxed::Box::new(#inner))
            );
        });
    }

    quote! {
        {
            let mut rules = ::dto_core::rules::RuleSet::default();
            #(#setters)*
            rules
        }
    }
}

fn to_array_expr(attrs: &ToArrayAttrs) -> TokenStream {
    let mut setters = Vec::new();

    if let Some(only) = &attrs.only {
        let names = &only.0;
        setters.push(quote! {
            config.only = ::core::option::Option::Some(::std::vec![
                #(::std::string::String::from(#names)),*
            ]);
        });
    }
    if let Some(include) = &attrs.include {
        let names = &include.0;
        setters.push(quote! {
            config.include = ::std::vec![#(::std::string::String::from(#names)),*];
        });
    }
    if let Some(exclude) = &attrs.exclude {
        let names = &exclude.0;
        setters.push(quote! {
            config.exclude = ::std::vec![#(::std::string::String::from(#names)),*];
        });
    }
    if let Some(ignore_null) = attrs.ignore_null {
        setters.push(quote! {
            config.ignore_null = ::core::option::Option::Some(#ignore_null);
        });
    }
    match &attrs.empty_array_as_object {
        Some(EmptyArrayAttr::All) => setters.push(quote! {
            config.empty_array_as_object = ::core::option::Option::Some(
                ::dto_core::serialize::EmptyArrayAsObject::All
            );
        }),
        Some(EmptyArrayAttr::Fields(names)) => setters.push(quote! {
            config.empty_array_as_object = ::core::option::Option::Some(
                ::dto_core::serialize::EmptyArrayAsObject::Fields(::std::vec![
                    #(::std::string::String::from(#names)),*
                ])
            );
        }),
        None => {}
    }
    if let Some(single_key) = &attrs.single_key {
        setters.push(quote! {
            config.single_key = ::core::option::Option::Some(
                ::std::string::String::from(#single_key)
            );
        });
    }
    if let Some(date_format) = &attrs.date_format {
        setters.push(quote! {
            config.date_format = ::core::option::Option::Some(
                ::std::string::String::from(#date_format)
            );
        });
    }

    quote! {
        .to_array({
            let mut config = ::dto_core::serialize::ToArrayConfig::default();
            #(#setters)*
            config
        })
    }
}
