// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use dto_derive::{Dto, prelude::*};
use serde_json::json;

/// Inline item descriptors merge under the wildcard path.
#[derive(Dto, Debug)]
pub struct Submission {
    #[dto(item(integer, min = 1))]
    pub scores: Vec<i64>,
}

fn main() {
    let rules = Submission::validation_rules();
    assert!(rules.contains_key("scores"));
    assert!(rules.contains_key("scores.*"));

    let dto = Submission::from_data(json!({"scores": [3, "4"]})).expect("construct");
    assert_eq!(dto.scores, vec![3, 4]);

    let err = Submission::from_data(json!({"scores": [0]})).expect_err("below min");
    assert!(err.validation_errors().is_some());
}
