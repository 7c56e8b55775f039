// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use dto_derive::{Dto, DtoEnum, prelude::*};
use serde_json::json;

#[derive(DtoEnum, Debug, PartialEq)]
pub enum Status {
    #[dto(value = 1)]
    Active,
    #[dto(value = 0)]
    Disabled,
}

#[derive(Dto, Debug)]
pub struct UpdateUser {
    pub status: Status,
}

fn main() {
    // Loose scalar equality: the string "1" matches the backing value 1.
    let dto = UpdateUser::from_data(json!({"status": "1"})).expect("construct");
    assert_eq!(dto.status, Status::Active);
    assert_eq!(dto.to_value(), json!({"status": 1}));

    let err = UpdateUser::from_data(json!({"status": 7})).expect_err("not a member");
    assert!(err.validation_errors().is_some());
}
