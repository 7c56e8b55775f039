// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Framework-neutral response envelope.

use serde_json::Value;

/// A rendered response: status, headers and an already-encoded body.
///
/// Hosts convert this into their native response type; the engine never
/// touches sockets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtoResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: String
}

impl DtoResponse {
    /// Encode a serialized value as a `200` JSON response.
    ///
    /// An empty payload (empty object or empty array) renders as `{}` so
    /// JSON consumers always receive an object at the top level.
    #[must_use]
    pub fn json(value: &Value) -> Self {
        let body = match value {
            Value::Object(map) if map.is_empty() => "{}".to_string(),
            Value::Array(items) if items.is_empty() => "{}".to_string(),
            other => other.to_string()
        };
        Self {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body
        }
    }

    /// Replace the status code.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Append a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Headers, in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Encoded body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}
