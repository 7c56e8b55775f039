// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use dto_derive::{Dto, prelude::*};
use serde_json::json;

#[derive(Dto, Debug)]
pub struct Address {
    pub city: String,

    #[dto(default)]
    pub zip: Option<String>,
}

/// Nested DTO fields expand their rules under dotted paths.
#[derive(Dto, Debug)]
pub struct CreateUser {
    pub name: String,
    pub address: Address,
}

fn main() {
    let rules = CreateUser::validation_rules();
    assert!(rules.contains_key("address"));
    assert!(rules.contains_key("address.city"));

    let user = CreateUser::from_data(json!({
        "name": "alice",
        "address": {"city": "Oslo"}
    }))
    .expect("construct");
    assert_eq!(user.address.city, "Oslo");
    assert_eq!(user.address.zip, None);
}
