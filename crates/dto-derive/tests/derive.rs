// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! End-to-end derive tests: validation, construction, serialization and
//! the facade traits working together.

use dto_derive::{Dto, DtoEnum, prelude::*};
use serde_json::{Value, json};

#[test]
fn validation_failure_reports_every_field() {
    #[derive(Dto, Debug)]
    struct Signup {
        name: String,
        email: String,
    }

    let err = Signup::from_data(json!({})).expect_err("empty input");
    let errors = err.validation_errors().expect("validation failure");
    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors.first_messages().get("name").map(String::as_str),
        Some("name is required")
    );
    assert!(errors.get("email").is_some());
}

#[test]
fn class_bail_config_limits_each_field_to_one_message() {
    #[derive(Dto, Debug)]
    #[dto(from_data(validate_all_with_bail))]
    struct Quota {
        #[dto(rules(min = 10))]
        limit: u32,
    }

    let err = Quota::from_data(json!({"limit": "soon"})).expect_err("not a number");
    let errors = err.validation_errors().expect("validation failure");
    assert_eq!(errors.get("limit").map(<[String]>::len), Some(1));
}

#[test]
fn trim_preprocessing_runs_before_validation() {
    #[derive(Dto, Debug)]
    #[dto(from_data(trim, ignore_empty))]
    struct Comment {
        #[dto(rules(min_length = 3))]
        body: String,

        #[dto(default)]
        author: Option<String>,
    }

    let comment = Comment::from_data(json!({
        "body": "  hello  ",
        "author": ""
    }))
    .expect("trimmed input passes");
    assert_eq!(comment.body, "hello");
    assert_eq!(comment.author, None);

    let err = Comment::from_data(json!({"body": "  a  "})).expect_err("too short after trim");
    assert!(err.validation_errors().is_some());
}

#[test]
fn unvalidated_construction_skips_rules_but_not_coercion() {
    #[derive(Dto, Debug)]
    struct Tag {
        #[dto(rules(min_length = 10))]
        label: String,
    }

    let tag = Tag::from_data_with(json!({"label": "x"}), FromDataOptions::unvalidated())
        .expect("rules skipped");
    assert_eq!(tag.label, "x");

    let err = Tag::from_data_with(json!({}), FromDataOptions::unvalidated())
        .expect_err("field still missing");
    assert!(matches!(err, DtoError::NewInstance { .. }));
}

#[test]
fn single_key_collapses_output_to_one_value() {
    #[derive(Dto, Debug)]
    #[dto(to_array(single_key = "id"))]
    struct Created {
        id: u64,
        name: String,
    }

    let created = Created::from_data(json!({"id": 7, "name": "n"})).expect("construct");
    assert_eq!(created.to_value(), json!(7));
}

#[test]
fn ignore_null_drops_null_fields_from_output() {
    #[derive(Dto, Debug)]
    #[dto(to_array(ignore_null = true))]
    struct Sparse {
        name: String,

        #[dto(default)]
        note: Option<String>,
    }

    let sparse = Sparse::from_data(json!({"name": "a"})).expect("construct");
    let map = sparse.to_value();
    let map = map.as_object().expect("object");
    assert!(map.contains_key("name"));
    assert!(!map.contains_key("note"));
}

#[test]
fn empty_arrays_render_as_objects_when_configured() {
    #[derive(Dto, Debug)]
    #[dto(to_array(empty_array_as_object(tags)))]
    struct Post {
        title: String,

        #[dto(default)]
        tags: Vec<String>,
    }

    let post = Post::from_data(json!({"title": "t"})).expect("construct");
    assert_eq!(post.to_value(), json!({"title": "t", "tags": {}}));

    let post = Post::from_data(json!({"title": "t", "tags": ["a"]})).expect("construct");
    assert_eq!(post.to_value(), json!({"title": "t", "tags": ["a"]}));
}

#[test]
fn naive_dates_round_trip_with_fixed_formats() {
    use chrono::{NaiveDate, NaiveDateTime};

    #[derive(Dto, Debug)]
    struct Booking {
        starts_at: NaiveDateTime,
        day: NaiveDate,
    }

    let booking = Booking::from_data(json!({
        "starts_at": "2024-05-01 10:30:00",
        "day": "2024-05-02"
    }))
    .expect("construct");

    assert_eq!(
        booking.to_value(),
        json!({
            "starts_at": "2024-05-01 10:30:00",
            "day": "2024-05-02"
        })
    );
}

#[test]
fn timezone_aware_dates_use_the_class_format() {
    use chrono::{DateTime, Utc};

    #[derive(Dto, Debug)]
    #[dto(to_array(date_format = "%Y-%m-%d %H:%M"))]
    struct Event {
        at: DateTime<Utc>,
    }

    let event = Event::from_data(json!({"at": "2024-05-01 10:30:00"})).expect("construct");
    assert_eq!(event.to_value(), json!({"at": "2024-05-01 10:30"}));
}

fn signup_extra_rules() -> RuleTable {
    RuleTable::from([(
        "name".to_string(),
        vec![Rule::text("max:5"), Rule::text("string")],
    )])
}

#[test]
fn extra_rules_append_without_overriding() {
    #[derive(Dto, Debug)]
    #[dto(extra_rules = "signup_extra_rules")]
    struct Signup {
        name: String,
    }

    let rules = Signup::validation_rules();
    let names: Vec<&str> = rules["name"].iter().map(Rule::name).collect();
    assert_eq!(names, ["required", "string", "max"]);

    let err = Signup::from_data(json!({"name": "toolongname"})).expect_err("over max");
    assert!(err.validation_errors().is_some());
    assert!(Signup::from_data(json!({"name": "ok"})).is_ok());
}

#[test]
fn nested_children_require_conditionally_on_their_parent() {
    #[derive(Dto, Debug)]
    struct Geo {
        lat: String,
    }

    #[derive(Dto, Debug)]
    struct Address {
        city: String,
        #[dto(default)]
        geo: Option<Geo>,
    }

    #[derive(Dto, Debug)]
    struct Profile {
        name: String,
        #[dto(default)]
        address: Option<Address>,
    }

    let rules = Profile::validation_rules();

    // A child is only required while its parent object is present.
    let city = &rules["address.city"];
    assert!(city.contains(&Rule::text("required_with:address")));
    assert!(!city.contains(&Rule::text("required")));

    // Deeper nesting prefixes the full parent path.
    let lat = &rules["address.geo.lat"];
    assert!(lat.contains(&Rule::text("required_with:address.geo")));
    assert!(!lat.contains(&Rule::text("required")));

    assert!(Profile::from_data(json!({"name": "a"})).is_ok());

    let err = Profile::from_data(json!({
        "name": "a",
        "address": {"city": "x", "geo": {}}
    }))
    .expect_err("geo present without lat");
    let errors = err.validation_errors().expect("validation failure");
    assert!(errors.get("address.geo.lat").is_some());
}

#[derive(DtoEnum, Debug, PartialEq)]
enum Level {
    #[dto(value = 1)]
    Basic,
    #[dto(value = 2)]
    Pro,
    #[dto(value = 3)]
    Admin,
}

#[test]
fn enum_only_narrows_the_membership_check() {
    #[derive(Dto, Debug)]
    struct Upgrade {
        #[dto(rules(enum_only(1, 2)))]
        level: Level,
    }

    let upgrade = Upgrade::from_data(json!({"level": 2})).expect("allowed member");
    assert_eq!(upgrade.level, Level::Pro);

    let err = Upgrade::from_data(json!({"level": 3})).expect_err("member outside allow-list");
    assert!(err.validation_errors().is_some());
}

#[test]
fn enum_rename_all_derives_string_backing_values() {
    #[derive(DtoEnum, Debug, PartialEq)]
    #[dto(rename_all = "kebab-case")]
    enum Visibility {
        PublicRead,
        OwnerOnly,
    }

    #[derive(Dto, Debug)]
    struct Share {
        visibility: Visibility,
    }

    let share = Share::from_data(json!({"visibility": "owner-only"})).expect("construct");
    assert_eq!(share.visibility, Visibility::OwnerOnly);
    assert_eq!(share.to_value(), json!({"visibility": "owner-only"}));
}

#[test]
fn nested_collections_validate_and_construct() {
    #[derive(Dto, Debug)]
    struct Item {
        name: String,

        #[dto(default = 1)]
        quantity: u32,
    }

    #[derive(Dto, Debug)]
    struct Order {
        items: Vec<Item>,
    }

    let rules = Order::validation_rules();
    assert!(rules.contains_key("items.*.name"));

    let order = Order::from_data(json!({
        "items": [{"name": "apple"}, {"name": "pear", "quantity": "2"}]
    }))
    .expect("construct");
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[1].quantity, 2);

    let err = Order::from_data(json!({"items": [{"quantity": 5}]})).expect_err("item missing name");
    let errors = err.validation_errors().expect("validation failure");
    assert!(errors.get("items.0.name").is_some());
}

#[test]
fn response_dto_wraps_serialized_output() {
    #[derive(Dto, Debug)]
    #[dto(response)]
    struct Greeting {
        message: String,
    }

    let greeting = Greeting::from_data(json!({"message": "hi"})).expect("construct");
    let response = greeting.to_response();

    assert_eq!(response.status(), 200);
    assert!(response
        .headers()
        .iter()
        .any(|(name, value)| name == "Content-Type" && value == "application/json"));
    let body: Value = serde_json::from_str(response.body()).expect("json body");
    assert_eq!(body, json!({"message": "hi"}));
}

#[test]
fn untyped_fields_pass_through_without_rules() {
    #[derive(Dto, Debug)]
    struct Envelope {
        kind: String,

        #[dto(default)]
        payload: Value,
    }

    // No required directive is synthesized for the untyped field.
    let envelope = Envelope::from_data(json!({"kind": "ping"})).expect("construct");
    assert_eq!(envelope.payload, Value::Null);

    let envelope = Envelope::from_data(json!({
        "kind": "data",
        "payload": {"anything": [1, 2]}
    }))
    .expect("construct");
    assert_eq!(envelope.payload["anything"], json!([1, 2]));
}
