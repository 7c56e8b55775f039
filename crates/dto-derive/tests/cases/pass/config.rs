// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use dto_derive::{Dto, prelude::*};
use serde_json::json;

/// Configuration-backed construction with literal defaults.
#[derive(Dto, Debug)]
#[dto(config)]
pub struct DbConfig {
    #[dto(default = "localhost")]
    pub host: String,

    #[dto(default = 5432)]
    pub port: u16,
}

fn main() {
    let config = DbConfig::from_config(json!({"port": 6000})).expect("construct");
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 6000);

    let config = DbConfig::from_config(json!({})).expect("all defaults");
    assert_eq!(config.port, 5432);
}
