// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! The DTO facade traits.
//!
//! `#[derive(Dto)]` supplies the three generated members of [`Dto`]
//! (`class_schema`, `from_map`, `to_map`); everything else is provided
//! behavior layered on top: validated construction from raw data,
//! serialization through the class's [`ToArrayConfig`], and the
//! request/response/config specializations.

use serde_json::{Map, Value};

use crate::{
    config,
    error::{CoerceError, DtoError},
    integrations::{
        request::DtoRequest,
        response::DtoResponse,
        validator::{self, ValidateOptions}
    },
    rules::{Rule, RuleTable, merge_tables},
    schema::{ClassSchema, class_rules},
    serialize::{self, SerializeCx, ToArrayConfig},
    util::deep_merge
};

/// Input preprocessing applied before validation.
///
/// Declared per class, overridden per call, with unset classes falling
/// back to the `from_data.<profile>.*` configuration keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FromDataConfig {
    /// Drop top-level `null` entries.
    pub ignore_null: bool,

    /// Drop top-level empty-string entries.
    pub ignore_empty: bool,

    /// Trim top-level string values.
    pub trim: bool,

    /// Prepend `bail` to every field so each reports one failure at most.
    pub validate_all_with_bail: bool
}

impl FromDataConfig {
    /// Profile defaults from the `from_data.<kind>.*` configuration keys.
    ///
    /// Plain construction uses the `base` profile, request construction
    /// the `request` one.
    #[must_use]
    pub fn profile(kind: &str) -> Self {
        let flag = |name: &str| config::get_bool(&format!("from_data.{kind}.{name}"), false);
        Self {
            ignore_null: flag("ignore_null"),
            ignore_empty: flag("ignore_empty"),
            trim: flag("trim"),
            validate_all_with_bail: flag("validate_all_with_bail")
        }
    }
}

/// Per-call construction options.
#[derive(Debug, Clone)]
pub struct FromDataOptions {
    /// Run the registered validator before construction. On by default.
    pub validate: bool,

    /// Preprocessing override; beats the class declaration and the
    /// profile defaults.
    pub config: Option<FromDataConfig>,

    /// Configuration profile consulted when neither an override nor a
    /// class declaration exists.
    pub profile: &'static str
}

impl Default for FromDataOptions {
    fn default() -> Self {
        Self {
            validate: true,
            config: None,
            profile: "base"
        }
    }
}

impl FromDataOptions {
    /// Options that skip validation entirely. Data from trusted sources
    /// (storage, internal services) goes through coercion only.
    #[must_use]
    pub fn unvalidated() -> Self {
        Self {
            validate: false,
            ..Self::default()
        }
    }
}

fn preprocess(map: &mut Map<String, Value>, config: &FromDataConfig) {
    if config.trim {
        for value in map.values_mut() {
            if let Value::String(s) = value {
                *value = Value::String(s.trim().to_string());
            }
        }
    }
    if config.ignore_null || config.ignore_empty {
        map.retain(|_, value| match value {
            Value::Null => !config.ignore_null,
            Value::String(s) if s.is_empty() => !config.ignore_empty,
            _ => true
        });
    }
}

/// A declarative data transfer object.
pub trait Dto: Sized {
    /// The compiled schema, built once per process.
    fn class_schema() -> &'static ClassSchema;

    /// Construct from an already-validated (or trusted) field map.
    ///
    /// # Errors
    ///
    /// [`DtoError::MissingField`] or [`DtoError::Coerce`] when the map
    /// does not satisfy the schema.
    fn from_map(map: Map<String, Value>) -> Result<Self, DtoError>;

    /// Dump every declared field, hidden ones included, in declaration
    /// order.
    fn to_map(&self, cx: &SerializeCx) -> Map<String, Value>;

    /// Class-level rules merged on top of the field-derived table.
    #[must_use]
    fn extra_rules() -> RuleTable {
        RuleTable::new()
    }

    /// The full synthesized rule table for this type.
    #[must_use]
    fn validation_rules() -> RuleTable {
        let mut table = class_rules(Self::class_schema());
        merge_tables(&mut table, Self::extra_rules());
        table
    }

    /// Validate raw data and construct.
    ///
    /// # Errors
    ///
    /// [`DtoError::Validate`] with the full error map when validation
    /// rejects the input; [`DtoError::NewInstance`] when construction of
    /// accepted data fails.
    fn from_data(data: Value) -> Result<Self, DtoError> {
        Self::from_data_with(data, FromDataOptions::default())
    }

    /// Construct with explicit options.
    ///
    /// # Errors
    ///
    /// See [`Dto::from_data`]; with `validate` off only construction
    /// failures remain.
    fn from_data_with(data: Value, options: FromDataOptions) -> Result<Self, DtoError> {
        let schema = Self::class_schema();
        let mut map = match data {
            Value::Object(map) => map,
            other => {
                return Err(DtoError::new_instance(
                    schema.name(),
                    CoerceError::type_mismatch("object", &other).into()
                ));
            }
        };

        let config = options
            .config
            .or_else(|| schema.from_data().copied())
            .unwrap_or_else(|| FromDataConfig::profile(options.profile));
        preprocess(&mut map, &config);

        if options.validate {
            let mut rules = Self::validation_rules();
            if config.validate_all_with_bail {
                for directives in rules.values_mut() {
                    if directives.iter().all(|rule| !rule.is("bail")) {
                        directives.insert(0, Rule::text("bail"));
                    }
                }
            }
            map = validator::current()
                .validate(&map, &rules, &ValidateOptions::default())
                .map_err(DtoError::Validate)?;
        }

        Self::from_map(map).map_err(|err| DtoError::new_instance(schema.name(), err))
    }

    /// Serialize through the class's [`ToArrayConfig`].
    #[must_use]
    fn to_value(&self) -> Value {
        self.to_value_with(Self::class_schema().to_array())
    }

    /// Serialize through an explicit configuration.
    #[must_use]
    fn to_value_with(&self, config: &ToArrayConfig) -> Value {
        let cx = SerializeCx::resolve(config);
        serialize::apply(Self::class_schema(), self.to_map(&cx), config)
    }
}

/// A DTO constructed from an incoming request.
pub trait RequestDto: Dto {
    /// Build from a request: the payload selected by method and content
    /// type is the default source, fields with a declared binding read
    /// from it instead. A bound value that is absent from its source
    /// enters as `null` so presence rules still apply.
    ///
    /// # Errors
    ///
    /// See [`Dto::from_data`].
    fn from_request(request: &dyn DtoRequest) -> Result<Self, DtoError> {
        let schema = Self::class_schema();
        let mut map = request.all();
        for field in schema.fields() {
            if let Some(binding) = field.source() {
                let name = binding.name.unwrap_or(field.name());
                let value = request.read(binding.source, name).unwrap_or(Value::Null);
                map.insert(field.name().to_string(), value);
            }
        }
        Self::from_data_with(
            Value::Object(map),
            FromDataOptions {
                profile: "request",
                ..FromDataOptions::default()
            }
        )
    }
}

/// A DTO rendered as an outgoing response.
pub trait ResponseDto: Dto {
    /// Serialize and wrap into a JSON [`DtoResponse`].
    #[must_use]
    fn to_response(&self) -> DtoResponse {
        DtoResponse::json(&self.to_value())
    }
}

/// A DTO hydrated from configuration trees.
pub trait ConfigDto: Dto {
    /// Baseline configuration merged under the provided tree.
    #[must_use]
    fn config_defaults() -> Value {
        Value::Object(Map::new())
    }

    /// Merge `config` over [`ConfigDto::config_defaults`] and construct.
    ///
    /// Validation is off unless the `config.validate` configuration key
    /// turns it on: configuration errors should fail loudly in tests, not
    /// on every process start.
    ///
    /// # Errors
    ///
    /// See [`Dto::from_data`].
    fn from_config(config_tree: Value) -> Result<Self, DtoError> {
        let mut merged = Self::config_defaults();
        deep_merge(&mut merged, config_tree);
        Self::from_data_with(
            merged,
            FromDataOptions {
                validate: config::get_bool("config.validate", false),
                ..FromDataOptions::default()
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use serde_json::json;

    use super::*;
    use crate::{
        build,
        integrations::request::{PropertySource, SimpleRequest},
        rules::RuleSet,
        schema::{FieldSchema, compile_field},
        value::DtoValue
    };

    #[derive(Debug, PartialEq)]
    struct User {
        name: String,
        age: Option<u32>
    }

    impl Dto for User {
        fn class_schema() -> &'static ClassSchema {
            static SCHEMA: OnceLock<ClassSchema> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                ClassSchema::builder("User")
                    .field(FieldSchema::new(
                        "name",
                        compile_field::<String>(
                            RuleSet {
                                min_length: Some(2),
                                ..RuleSet::default()
                            },
                            false
                        )
                    ))
                    .field(
                        FieldSchema::new(
                            "age",
                            compile_field::<Option<u32>>(RuleSet::default(), true)
                        )
                        .with_default()
                    )
                    .build()
            })
        }

        fn from_map(map: Map<String, Value>) -> Result<Self, DtoError> {
            let schema = Self::class_schema();
            let mut map = map;
            Ok(Self {
                name: build::required(schema, &mut map, "name")?,
                age: build::optional(schema, &mut map, "age")?.unwrap_or(None)
            })
        }

        fn to_map(&self, cx: &SerializeCx) -> Map<String, Value> {
            let mut map = Map::new();
            map.insert("name".to_string(), self.name.to_raw(cx));
            map.insert("age".to_string(), self.age.to_raw(cx));
            map
        }

        fn extra_rules() -> RuleTable {
            RuleTable::from([("name".to_string(), vec![Rule::text("max:30")])])
        }
    }

    impl RequestDto for User {}
    impl ResponseDto for User {}

    #[test]
    fn from_data_validates_then_constructs() {
        let user = User::from_data(json!({"name": "alice", "age": "30"})).unwrap();
        assert_eq!(
            user,
            User {
                name: "alice".to_string(),
                age: Some(30)
            }
        );
    }

    #[test]
    fn from_data_surfaces_validation_errors() {
        let err = User::from_data(json!({"name": "a"})).unwrap_err();
        let errors = err.validation_errors().expect("validation failure");
        assert!(errors.get("name").is_some());
    }

    #[test]
    fn unvalidated_construction_skips_rules() {
        let user =
            User::from_data_with(json!({"name": "a"}), FromDataOptions::unvalidated()).unwrap();
        assert_eq!(user.name, "a");
    }

    #[test]
    fn non_object_input_is_a_construction_failure() {
        let err = User::from_data(json!([1, 2])).unwrap_err();
        assert!(matches!(err, DtoError::NewInstance { class: "User", .. }));
    }

    #[test]
    fn validation_rules_include_extra_rules() {
        let rules = User::validation_rules();
        let names: Vec<&str> = rules["name"].iter().map(Rule::name).collect();
        assert_eq!(names, ["required", "string", "min", "max"]);
    }

    #[test]
    fn trim_preprocessing_applies_before_validation() {
        let options = FromDataOptions {
            config: Some(FromDataConfig {
                trim: true,
                ..FromDataConfig::default()
            }),
            ..FromDataOptions::default()
        };
        let user = User::from_data_with(json!({"name": "  bob  "}), options).unwrap();
        assert_eq!(user.name, "bob");
    }

    #[test]
    fn serialization_round_trips_in_declaration_order() {
        let user = User {
            name: "alice".to_string(),
            age: None
        };
        assert_eq!(user.to_value(), json!({"name": "alice", "age": null}));

        let config = ToArrayConfig {
            ignore_null: Some(true),
            ..ToArrayConfig::default()
        };
        assert_eq!(user.to_value_with(&config), json!({"name": "alice"}));
    }

    #[test]
    fn response_wraps_serialized_payload() {
        let user = User {
            name: "alice".to_string(),
            age: Some(1)
        };
        let response = user.to_response();
        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), r#"{"name":"alice","age":1}"#);
    }

    #[derive(Debug)]
    struct Paged {
        page: u32,
        trace: Option<String>
    }

    impl Dto for Paged {
        fn class_schema() -> &'static ClassSchema {
            static SCHEMA: OnceLock<ClassSchema> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                ClassSchema::builder("Paged")
                    .field(
                        FieldSchema::new(
                            "page",
                            compile_field::<u32>(RuleSet::default(), true)
                        )
                        .with_default()
                        .with_source(PropertySource::Query, None)
                    )
                    .field(
                        FieldSchema::new(
                            "trace",
                            compile_field::<Option<String>>(RuleSet::default(), true)
                        )
                        .with_default()
                        .with_source(PropertySource::Header, Some("x-trace-id"))
                    )
                    .build()
            })
        }

        fn from_map(map: Map<String, Value>) -> Result<Self, DtoError> {
            let schema = Self::class_schema();
            let mut map = map;
            Ok(Self {
                page: build::optional(schema, &mut map, "page")?.unwrap_or(1),
                trace: build::optional(schema, &mut map, "trace")?.unwrap_or(None)
            })
        }

        fn to_map(&self, cx: &SerializeCx) -> Map<String, Value> {
            let mut map = Map::new();
            map.insert("page".to_string(), self.page.to_raw(cx));
            map.insert("trace".to_string(), self.trace.to_raw(cx));
            map
        }
    }

    impl RequestDto for Paged {}

    #[test]
    fn request_fields_read_from_their_sources() {
        let request = SimpleRequest::new()
            .with_query("page", "3")
            .with_header("X-Trace-Id", "abc")
            .with_form_value("page", "99");

        let paged = Paged::from_request(&request).unwrap();
        // The body never shadows a query-bound field.
        assert_eq!(paged.page, 3);
        assert_eq!(paged.trace, Some("abc".to_string()));
    }

    #[test]
    fn absent_bound_sources_fall_back_to_defaults() {
        let paged = Paged::from_request(&SimpleRequest::new()).unwrap();
        assert_eq!(paged.page, 1);
        assert_eq!(paged.trace, None);
    }

    #[derive(Debug)]
    struct AppConfig {
        host: String,
        port: u16
    }

    impl Dto for AppConfig {
        fn class_schema() -> &'static ClassSchema {
            static SCHEMA: OnceLock<ClassSchema> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                ClassSchema::builder("AppConfig")
                    .field(FieldSchema::new(
                        "host",
                        compile_field::<String>(RuleSet::default(), false)
                    ))
                    .field(FieldSchema::new(
                        "port",
                        compile_field::<u16>(RuleSet::default(), false)
                    ))
                    .build()
            })
        }

        fn from_map(map: Map<String, Value>) -> Result<Self, DtoError> {
            let schema = Self::class_schema();
            let mut map = map;
            Ok(Self {
                host: build::required(schema, &mut map, "host")?,
                port: build::required(schema, &mut map, "port")?
            })
        }

        fn to_map(&self, cx: &SerializeCx) -> Map<String, Value> {
            let mut map = Map::new();
            map.insert("host".to_string(), self.host.to_raw(cx));
            map.insert("port".to_string(), self.port.to_raw(cx));
            map
        }
    }

    impl ConfigDto for AppConfig {
        fn config_defaults() -> Value {
            json!({"host": "localhost", "port": 3000})
        }
    }

    #[test]
    fn config_trees_merge_over_defaults() {
        let config = AppConfig::from_config(json!({"port": 8080})).unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
    }
}
