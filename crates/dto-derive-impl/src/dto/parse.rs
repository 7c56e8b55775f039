// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute parsing for `#[derive(Dto)]`.
//!
//! Class-level attributes go through darling ([`ClassAttrs`]); field-level
//! `#[dto(...)]` attributes are parsed by hand ([`FieldDef`]) because their
//! grammar (bare flags, nested rule lists, literal lists) does not map onto
//! darling's name/value model.

use convert_case::{Case, Casing};
use darling::{FromDeriveInput, FromMeta};
use syn::{
    DeriveInput, Field, Ident, Lit, LitInt, LitStr, Meta, Token, Type, punctuated::Punctuated
};

/// Wire-name case convention from `rename_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    /// `camelCase`.
    Camel,

    /// `snake_case`.
    Snake,

    /// `PascalCase`.
    Pascal,

    /// `kebab-case`.
    Kebab
}

impl RenameRule {
    /// Resolve the convention name used in the attribute.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "camelCase" => Some(Self::Camel),
            "snake_case" => Some(Self::Snake),
            "PascalCase" => Some(Self::Pascal),
            "kebab-case" => Some(Self::Kebab),
            _ => None
        }
    }

    /// Convert a field name into this convention.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        let case = match self {
            Self::Camel => Case::Camel,
            Self::Snake => Case::Snake,
            Self::Pascal => Case::Pascal,
            Self::Kebab => Case::Kebab
        };
        name.to_case(case)
    }
}

/// List of field names inside a class attribute, e.g. `only(id, name)`.
#[derive(Debug, Default, Clone)]
pub struct NameList(pub Vec<String>);

impl FromMeta for NameList {
    fn from_meta(item: &Meta) -> darling::Result<Self> {
        match item {
            Meta::List(list) => {
                let names = list
                    .parse_args_with(Punctuated::<Ident, Token![,]>::parse_terminated)
                    .map_err(darling::Error::from)?;
                Ok(Self(names.iter().map(ToString::to_string).collect()))
            }
            _ => Err(darling::Error::unsupported_format(
                "expected a field name list"
            ))
        }
    }
}

/// `empty_array_as_object` as a bare flag (all fields) or a name list.
#[derive(Debug, Clone)]
pub enum EmptyArrayAttr {
    /// Applies to every field.
    All,

    /// Applies to the named fields only.
    Fields(Vec<String>)
}

impl FromMeta for EmptyArrayAttr {
    fn from_word() -> darling::Result<Self> {
        Ok(Self::All)
    }

    fn from_meta(item: &Meta) -> darling::Result<Self> {
        match item {
            Meta::Path(_) => Ok(Self::All),
            Meta::List(_) => NameList::from_meta(item).map(|list| Self::Fields(list.0)),
            Meta::NameValue(_) => Err(darling::Error::unsupported_format(
                "expected a bare flag or a field name list"
            ))
        }
    }
}

/// `from_data(...)` class attribute.
#[derive(Debug, Default, Clone, Copy, FromMeta)]
pub struct FromDataAttrs {
    /// Drop top-level nulls before validation.
    #[darling(default)]
    pub ignore_null: bool,

    /// Drop top-level empty strings before validation.
    #[darling(default)]
    pub ignore_empty: bool,

    /// Trim top-level string values before validation.
    #[darling(default)]
    pub trim: bool,

    /// Prepend `bail` to every field's rules.
    #[darling(default)]
    pub validate_all_with_bail: bool
}

/// `to_array(...)` class attribute.
#[derive(Debug, Default, Clone, FromMeta)]
pub struct ToArrayAttrs {
    /// Exhaustive field selection.
    #[darling(default)]
    pub only: Option<NameList>,

    /// Extra fields appended to the declared list.
    #[darling(default)]
    pub include: Option<NameList>,

    /// Fields removed from the output.
    #[darling(default)]
    pub exclude: Option<NameList>,

    /// Drop null-valued fields.
    #[darling(default)]
    pub ignore_null: Option<bool>,

    /// Render empty arrays as empty objects.
    #[darling(default)]
    pub empty_array_as_object: Option<EmptyArrayAttr>,

    /// Collapse the output to one field's bare value.
    #[darling(default)]
    pub single_key: Option<String>,

    /// chrono format for timezone-aware temporal fields.
    #[darling(default)]
    pub date_format: Option<String>
}

/// Class-level attributes parsed from `#[dto(...)]` on the struct.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(dto), supports(struct_named), allow_unknown_fields)]
pub struct ClassAttrs {
    /// Struct identifier.
    pub ident: Ident,

    /// Case convention applied to all wire names: `camelCase`,
    /// `snake_case`, `PascalCase` or `kebab-case`.
    #[darling(default)]
    pub rename_all: Option<String>,

    /// Generate the `RequestDto` marker impl.
    #[darling(default)]
    pub request: bool,

    /// Generate the `ResponseDto` marker impl.
    #[darling(default)]
    pub response: bool,

    /// Generate the `ConfigDto` marker impl.
    #[darling(default)]
    pub config: bool,

    /// Path to a `fn() -> RuleTable` supplying class-level extra rules.
    #[darling(default)]
    pub extra_rules: Option<syn::Path>,

    /// Construction preprocessing declaration.
    #[darling(default)]
    pub from_data: Option<FromDataAttrs>,

    /// Serialization configuration declaration.
    #[darling(default)]
    pub to_array: Option<ToArrayAttrs>
}

impl ClassAttrs {
    /// Resolve `rename_all` into a case convention.
    ///
    /// # Errors
    ///
    /// Returns an error for unrecognized conventions.
    pub fn case(&self) -> darling::Result<Option<RenameRule>> {
        let Some(name) = &self.rename_all else {
            return Ok(None);
        };
        RenameRule::parse(name).map(Some).ok_or_else(|| {
            darling::Error::custom(format!("unsupported rename_all convention `{name}`"))
                .with_span(&self.ident)
        })
    }
}

/// Request source binding parsed from `#[dto(source(...))]`.
#[derive(Debug, Clone)]
pub struct SourceDef {
    /// Source kind ident: `query`, `path`, `header`, `cookie`, `body`,
    /// `form` or `json`.
    pub kind: Ident,

    /// Alternate name inside the source.
    pub name: Option<String>
}

/// Construction-time default parsed from `#[dto(default)]`.
#[derive(Debug, Clone)]
pub enum DefaultSpec {
    /// Bare flag: use `Default::default()`.
    Trait,

    /// Literal value. String literals apply to `String` fields; numeric
    /// and boolean literals infer the field type.
    Lit(Lit)
}

/// Explicit rule annotations parsed from `#[dto(rules(...))]` or an
/// `item(...)` descriptor.
#[derive(Debug, Default, Clone)]
pub struct RuleAttrs {
    /// `required` flag.
    pub required: bool,

    /// `nullable` flag.
    pub nullable: bool,

    /// `string` flag.
    pub string: bool,

    /// `boolean` flag.
    pub boolean: bool,

    /// `integer` flag.
    pub integer: bool,

    /// `numeric` flag.
    pub numeric: bool,

    /// `array` flag.
    pub array: bool,

    /// `shallow` flag: no recursive rule expansion.
    pub shallow: bool,

    /// `bail` flag: stop on the first failing directive.
    pub bail: bool,

    /// `min = <number>`.
    pub min: Option<Lit>,

    /// `max = <number>`.
    pub max: Option<Lit>,

    /// `min_length = <int>`.
    pub min_length: Option<LitInt>,

    /// `max_length = <int>`.
    pub max_length: Option<LitInt>,

    /// `one_of(<literals>)` inclusion list.
    pub one_of: Vec<Lit>,

    /// `enum_only(<literals>)` allow-list over enum backing values.
    pub enum_only: Vec<Lit>,

    /// `enum_except(<literals>)` deny-list over enum backing values.
    pub enum_except: Vec<Lit>,

    /// Free-form directives from `extra = "a|b"` or `extra("a", "b")`.
    pub extra: Vec<String>
}

impl RuleAttrs {
    fn parse(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<Self> {
        let mut rules = Self::default();
        meta.parse_nested_meta(|inner| {
            let flag = |target: &mut bool| {
                *target = true;
                Ok(())
            };
            if inner.path.is_ident("required") {
                return flag(&mut rules.required);
            }
            if inner.path.is_ident("nullable") {
                return flag(&mut rules.nullable);
            }
            if inner.path.is_ident("string") {
                return flag(&mut rules.string);
            }
            if inner.path.is_ident("boolean") {
                return flag(&mut rules.boolean);
            }
            if inner.path.is_ident("integer") {
                return flag(&mut rules.integer);
            }
            if inner.path.is_ident("numeric") {
                return flag(&mut rules.numeric);
            }
            if inner.path.is_ident("array") {
                return flag(&mut rules.array);
            }
            if inner.path.is_ident("shallow") {
                return flag(&mut rules.shallow);
            }
            if inner.path.is_ident("bail") {
                return flag(&mut rules.bail);
            }
            if inner.path.is_ident("min") {
                rules.min = Some(inner.value()?.parse()?);
                return Ok(());
            }
            if inner.path.is_ident("max") {
                rules.max = Some(inner.value()?.parse()?);
                return Ok(());
            }
            if inner.path.is_ident("min_length") {
                rules.min_length = Some(inner.value()?.parse()?);
                return Ok(());
            }
            if inner.path.is_ident("max_length") {
                rules.max_length = Some(inner.value()?.parse()?);
                return Ok(());
            }
            if inner.path.is_ident("one_of") {
                rules.one_of = parse_lit_list(&inner)?;
                return Ok(());
            }
            if inner.path.is_ident("enum_only") {
                rules.enum_only = parse_lit_list(&inner)?;
                return Ok(());
            }
            if inner.path.is_ident("enum_except") {
                rules.enum_except = parse_lit_list(&inner)?;
                return Ok(());
            }
            if inner.path.is_ident("extra") {
                if inner.input.peek(Token![=]) {
                    let directives: LitStr = inner.value()?.parse()?;
                    rules.extra.extend(
                        directives
                            .value()
                            .split('|')
                            .map(str::trim)
                            .filter(|part| !part.is_empty())
                            .map(str::to_string)
                    );
                } else {
                    let content;
                    syn::parenthesized!(content in inner.input);
                    let directives =
                        Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
                    rules.extra.extend(directives.iter().map(LitStr::value));
                }
                return Ok(());
            }
            Err(inner.error("unknown rule annotation"))
        })?;
        Ok(rules)
    }

    /// Whether anything was annotated at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let Self {
            required,
            nullable,
            string,
            boolean,
            integer,
            numeric,
            array,
            shallow,
            bail,
            min,
            max,
            min_length,
            max_length,
            one_of,
            enum_only,
            enum_except,
            extra
        } = self;
        !(*required
            || *nullable
            || *string
            || *boolean
            || *integer
            || *numeric
            || *array
            || *shallow
            || *bail)
            && min.is_none()
            && max.is_none()
            && min_length.is_none()
            && max_length.is_none()
            && one_of.is_empty()
            && enum_only.is_empty()
            && enum_except.is_empty()
            && extra.is_empty()
    }
}

fn parse_lit_list(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<Vec<Lit>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let literals = Punctuated::<Lit, Token![,]>::parse_terminated(&content)?;
    Ok(literals.into_iter().collect())
}

/// One struct field with all parsed `#[dto(...)]` annotations.
#[derive(Debug)]
pub struct FieldDef {
    /// Field identifier.
    pub ident: Ident,

    /// Field type.
    pub ty: Type,

    /// Explicit wire name from `rename = "..."`.
    pub rename: Option<String>,

    /// Construction-time default.
    pub default: Option<DefaultSpec>,

    /// Hidden from serialization.
    pub hidden: bool,

    /// Request source binding.
    pub source: Option<SourceDef>,

    /// Explicit rule annotations.
    pub rules: RuleAttrs,

    /// Inline descriptor for array items from `item(...)`.
    pub item: Option<RuleAttrs>
}

impl FieldDef {
    /// Parse one named field.
    ///
    /// # Errors
    ///
    /// Returns an error for tuple-struct fields or malformed annotations.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let ident = field.ident.clone().ok_or_else(|| {
            syn::Error::new_spanned(field, "Dto fields must be named")
        })?;

        let mut def = Self {
            ident,
            ty: field.ty.clone(),
            rename: None,
            default: None,
            hidden: false,
            source: None,
            rules: RuleAttrs::default(),
            item: None
        };

        for attr in &field.attrs {
            if !attr.path().is_ident("dto") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let name: LitStr = meta.value()?.parse()?;
                    def.rename = Some(name.value());
                    return Ok(());
                }
                if meta.path.is_ident("default") {
                    if meta.input.peek(Token![=]) {
                        def.default = Some(DefaultSpec::Lit(meta.value()?.parse()?));
                    } else {
                        def.default = Some(DefaultSpec::Trait);
                    }
                    return Ok(());
                }
                if meta.path.is_ident("hidden") {
                    def.hidden = true;
                    return Ok(());
                }
                if meta.path.is_ident("source") {
                    let content;
                    syn::parenthesized!(content in meta.input);
                    let kind: Ident = content.parse()?;
                    if !matches!(
                        kind.to_string().as_str(),
                        "query" | "path" | "header" | "cookie" | "body" | "form" | "json"
                    ) {
                        return Err(syn::Error::new(
                            kind.span(),
                            "expected query, path, header, cookie, body, form or json"
                        ));
                    }
                    let mut name = None;
                    if content.peek(Token![,]) {
                        content.parse::<Token![,]>()?;
                        let key: Ident = content.parse()?;
                        if key != "name" {
                            return Err(syn::Error::new(key.span(), "expected `name = \"...\"`"));
                        }
                        content.parse::<Token![=]>()?;
                        let value: LitStr = content.parse()?;
                        name = Some(value.value());
                    }
                    def.source = Some(SourceDef {
                        kind,
                        name
                    });
                    return Ok(());
                }
                if meta.path.is_ident("rules") {
                    def.rules = RuleAttrs::parse(&meta)?;
                    return Ok(());
                }
                if meta.path.is_ident("item") {
                    def.item = Some(RuleAttrs::parse(&meta)?);
                    return Ok(());
                }
                Err(meta.error("unknown dto field attribute"))
            })?;
        }

        Ok(def)
    }

    /// The wire name: explicit rename, else the (possibly case-converted)
    /// field name.
    #[must_use]
    pub fn wire_name(&self, case: Option<RenameRule>) -> String {
        if let Some(rename) = &self.rename {
            return rename.clone();
        }
        let name = self.ident.to_string();
        match case {
            Some(rule) => rule.apply(&name),
            None => name
        }
    }

    /// Whether the field carries a construction-time default.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Fully parsed derive input.
#[derive(Debug)]
pub struct DtoDef {
    /// Class-level attributes.
    pub attrs: ClassAttrs,

    /// Resolved case convention.
    pub case: Option<RenameRule>,

    /// All named fields, in declaration order.
    pub fields: Vec<FieldDef>
}

impl DtoDef {
    /// Parse the whole derive input.
    ///
    /// # Errors
    ///
    /// Returns darling errors for class attributes and syn errors
    /// (converted) for field attributes.
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let syn::Data::Struct(data) = &input.data else {
            return Err(
                darling::Error::custom("Dto can only be derived for structs").with_span(input)
            );
        };
        let syn::Fields::Named(named) = &data.fields else {
            return Err(darling::Error::custom("Dto requires named fields").with_span(input));
        };

        let attrs = ClassAttrs::from_derive_input(input)?;
        let case = attrs.case()?;

        let fields = named
            .named
            .iter()
            .map(|field| FieldDef::from_field(field).map_err(darling::Error::from))
            .collect::<darling::Result<Vec<_>>>()?;

        Ok(Self {
            attrs,
            case,
            fields
        })
    }

    /// The class name as a string literal value.
    #[must_use]
    pub fn name_str(&self) -> String {
        self.attrs.ident.to_string()
    }
}
