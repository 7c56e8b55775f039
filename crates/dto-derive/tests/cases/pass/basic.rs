// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use dto_derive::{Dto, prelude::*};
use serde_json::json;

/// Plain struct: required inference, defaults and lenient coercion.
#[derive(Dto, Debug)]
pub struct CreateUser {
    #[dto(rules(min_length = 2))]
    pub name: String,

    #[dto(default)]
    pub age: Option<u32>,
}

fn main() {
    let user = CreateUser::from_data(json!({"name": "alice", "age": "30"}))
        .expect("valid input constructs");
    assert_eq!(user.name, "alice");
    assert_eq!(user.age, Some(30));

    let user = CreateUser::from_data(json!({"name": "bob"})).expect("default applies");
    assert_eq!(user.age, None);
}
