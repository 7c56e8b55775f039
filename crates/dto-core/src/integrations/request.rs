// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Request abstraction for request-backed DTO construction.
//!
//! [`DtoRequest`] is the only thing a web framework must implement to feed
//! [`crate::dto::RequestDto::from_request`]. [`SimpleRequest`] is an
//! in-memory implementation for tests and non-HTTP callers.

use serde_json::{Map, Value};

/// Named part of an incoming request a field can read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertySource {
    /// Query-string parameter.
    Query,

    /// Route path parameter.
    Path,

    /// Request header. Lookup is case-insensitive.
    Header,

    /// Request cookie.
    Cookie,

    /// The unparsed request body as a string.
    Body,

    /// Field of a form-encoded body.
    Form,

    /// Field of a JSON body.
    Json
}

/// Read access to an incoming request.
///
/// Implementors supply the per-source accessors plus method and content-type
/// introspection; the provided [`all`](DtoRequest::all) method selects the
/// default payload from those, and [`read`](DtoRequest::read) serves
/// per-field source overrides.
pub trait DtoRequest {
    /// Uppercase HTTP method.
    fn method(&self) -> String;

    /// `Content-Type` header value, or an empty string when absent.
    fn content_type(&self) -> String;

    /// One query-string parameter.
    fn query(&self, name: &str) -> Option<Value>;

    /// One route path parameter.
    fn path_param(&self, name: &str) -> Option<Value>;

    /// One header value. Names compare case-insensitively.
    fn header(&self, name: &str) -> Option<Value>;

    /// One cookie value.
    fn cookie(&self, name: &str) -> Option<Value>;

    /// The unparsed request body.
    fn raw_body(&self) -> String;

    /// Every query-string parameter.
    fn all_query(&self) -> Map<String, Value>;

    /// Every field of a form-encoded body.
    fn all_form(&self) -> Map<String, Value>;

    /// Every field of a JSON body.
    fn all_json(&self) -> Map<String, Value>;

    /// One field of a form-encoded body.
    fn form(&self, name: &str) -> Option<Value> {
        self.all_form().remove(name)
    }

    /// One field of a JSON body.
    fn json(&self, name: &str) -> Option<Value> {
        self.all_json().remove(name)
    }

    /// Read one named value from a specific source.
    fn read(&self, source: PropertySource, name: &str) -> Option<Value> {
        match source {
            PropertySource::Query => self.query(name),
            PropertySource::Path => self.path_param(name),
            PropertySource::Header => self.header(name),
            PropertySource::Cookie => self.cookie(name),
            PropertySource::Body => {
                let raw = self.raw_body();
                (!raw.is_empty()).then(|| Value::String(raw))
            }
            PropertySource::Form => self.form(name),
            PropertySource::Json => self.json(name)
        }
    }

    /// The default payload for fields without an explicit source.
    ///
    /// `GET`, `HEAD` and `OPTIONS` requests read the query string; other
    /// methods read the body matching the content type. An unrecognized
    /// content type yields an empty payload.
    fn all(&self) -> Map<String, Value> {
        if matches!(self.method().as_str(), "GET" | "HEAD" | "OPTIONS") {
            return self.all_query();
        }
        let content_type = self.content_type().to_ascii_lowercase();
        if content_type.contains("application/json") {
            self.all_json()
        } else if content_type.contains("application/x-www-form-urlencoded") {
            self.all_form()
        } else {
            Map::new()
        }
    }
}

/// In-memory [`DtoRequest`] built by hand.
///
/// Starts as a bodyless `GET`; the body builders flip it to a `POST` with
/// the matching content type, and [`with_method`](Self::with_method) /
/// [`with_content_type`](Self::with_content_type) override afterwards.
#[derive(Debug, Clone)]
pub struct SimpleRequest {
    method: String,
    content_type: String,
    query: Map<String, Value>,
    path: Map<String, Value>,
    headers: Map<String, Value>,
    cookies: Map<String, Value>,
    body: Map<String, Value>,
    raw_body: String
}

impl Default for SimpleRequest {
    fn default() -> Self {
        Self {
            method: String::from("GET"),
            content_type: String::new(),
            query: Map::new(),
            path: Map::new(),
            headers: Map::new(),
            cookies: Map::new(),
            body: Map::new(),
            raw_body: String::new()
        }
    }
}

impl SimpleRequest {
    /// Create an empty `GET` request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method. Stored uppercased.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into().to_ascii_uppercase();
        self
    }

    /// Set the `Content-Type` header value.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Add a query-string parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Add a route path parameter.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.path.insert(name.into(), value.into());
        self
    }

    /// Add a header. Stored lowercased.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Add a cookie.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Set the whole body from a JSON object and mark the request as a
    /// JSON `POST`.
    ///
    /// # Panics
    ///
    /// Panics when `body` is not an object.
    #[must_use]
    pub fn with_json_body(mut self, body: Value) -> Self {
        match body {
            Value::Object(map) => {
                self.body = map;
                self.method = String::from("POST");
                self.content_type = String::from("application/json");
                self
            }
            _ => panic!("request body must be a JSON object")
        }
    }

    /// Add a form field and mark the request as a form-encoded `POST`.
    #[must_use]
    pub fn with_form_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(name.into(), value.into());
        self.method = String::from("POST");
        self.content_type = String::from("application/x-www-form-urlencoded");
        self
    }

    /// Set the unparsed body.
    #[must_use]
    pub fn with_raw_body(mut self, raw: impl Into<String>) -> Self {
        self.raw_body = raw.into();
        self
    }
}

impl DtoRequest for SimpleRequest {
    fn method(&self) -> String {
        self.method.clone()
    }

    fn content_type(&self) -> String {
        self.content_type.clone()
    }

    fn query(&self, name: &str) -> Option<Value> {
        self.query.get(name).cloned()
    }

    fn path_param(&self, name: &str) -> Option<Value> {
        self.path.get(name).cloned()
    }

    fn header(&self, name: &str) -> Option<Value> {
        self.headers.get(&name.to_ascii_lowercase()).cloned()
    }

    fn cookie(&self, name: &str) -> Option<Value> {
        self.cookies.get(name).cloned()
    }

    fn raw_body(&self) -> String {
        self.raw_body.clone()
    }

    fn all_query(&self) -> Map<String, Value> {
        self.query.clone()
    }

    fn all_form(&self) -> Map<String, Value> {
        self.body.clone()
    }

    fn all_json(&self) -> Map<String, Value> {
        self.body.clone()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn get_requests_default_to_the_query_string() {
        let request = SimpleRequest::new().with_query("page", 1);

        assert_eq!(request.all()["page"], json!(1));
    }

    #[test]
    fn json_posts_default_to_the_json_body() {
        let request = SimpleRequest::new()
            .with_query("page", 1)
            .with_json_body(json!({"name": "alice"}));

        let all = request.all();
        assert_eq!(all["name"], json!("alice"));
        assert!(!all.contains_key("page"));
    }

    #[test]
    fn form_posts_default_to_the_form_body() {
        let request = SimpleRequest::new().with_form_value("name", "bob");

        assert_eq!(request.content_type(), "application/x-www-form-urlencoded");
        assert_eq!(request.all()["name"], json!("bob"));
    }

    #[test]
    fn unrecognized_content_types_yield_an_empty_payload() {
        let request = SimpleRequest::new()
            .with_method("POST")
            .with_content_type("text/plain")
            .with_raw_body("hello");

        assert!(request.all().is_empty());
        assert_eq!(request.read(PropertySource::Body, ""), Some(json!("hello")));
    }

    #[test]
    fn headers_read_case_insensitively() {
        let request = SimpleRequest::new().with_header("X-Trace-Id", "abc");

        assert_eq!(
            request.read(PropertySource::Header, "x-trace-id"),
            Some(json!("abc"))
        );
        assert_eq!(request.read(PropertySource::Header, "X-TRACE-ID"), Some(json!("abc")));
    }

    #[test]
    fn sources_are_isolated() {
        let request = SimpleRequest::new()
            .with_query("id", 1)
            .with_path_param("id", 2)
            .with_cookie("id", 3);

        assert_eq!(request.read(PropertySource::Query, "id"), Some(json!(1)));
        assert_eq!(request.read(PropertySource::Path, "id"), Some(json!(2)));
        assert_eq!(request.read(PropertySource::Cookie, "id"), Some(json!(3)));
        assert_eq!(request.read(PropertySource::Json, "id"), None);
    }
}
