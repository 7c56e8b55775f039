// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use dto_derive::{Dto, prelude::*};
use serde_json::json;

/// Wire name conventions and serialization filtering.
#[derive(Dto, Debug)]
#[dto(rename_all = "camelCase", to_array(exclude(createdBy)))]
pub struct Profile {
    pub first_name: String,

    #[dto(hidden)]
    pub api_token: String,

    pub created_by: String,
}

fn main() {
    let profile = Profile::from_data(json!({
        "firstName": "Ada",
        "apiToken": "t0k3n",
        "createdBy": "admin"
    }))
    .expect("construct");

    let value = profile.to_value();
    let map = value.as_object().expect("object output");
    assert!(map.contains_key("firstName"));
    assert!(!map.contains_key("apiToken"));
    assert!(!map.contains_key("createdBy"));
}
