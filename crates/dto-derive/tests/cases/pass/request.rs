// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use dto_derive::{Dto, prelude::*};
use serde_json::json;

/// Request-backed construction with per-field source bindings.
#[derive(Dto, Debug)]
#[dto(request)]
pub struct ListUsers {
    #[dto(default = 1, source(query))]
    pub page: u32,

    #[dto(rules(min_length = 1))]
    pub term: String,

    #[dto(default, source(header, name = "x-trace-id"))]
    pub trace: Option<String>,
}

fn main() {
    let request = SimpleRequest::new()
        .with_query("page", json!("4"))
        .with_header("X-Trace-Id", "abc-123")
        .with_json_body(json!({"term": "bob"}));

    let dto = ListUsers::from_request(&request).expect("construct");
    assert_eq!(dto.page, 4);
    assert_eq!(dto.term, "bob");
    assert_eq!(dto.trace.as_deref(), Some("abc-123"));

    // Absent bound sources fall back to the field default.
    let request = SimpleRequest::new().with_json_body(json!({"term": "eve"}));
    let dto = ListUsers::from_request(&request).expect("construct");
    assert_eq!(dto.page, 1);
    assert_eq!(dto.trace, None);
}
