//! # API Request
//!
//! Route parameters, query string and JSON body of one request, kept apart
//! so validation can address each source, plus a merged lookup for the
//! business stages.

use serde_json::{Map, Value};

use crate::validation::{value_text, FieldError, Source};

/// Incoming request as seen by the pipeline stages
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub params: Map<String, Value>,
    pub query: Map<String, Value>,
    pub body: Map<String, Value>,
    /// Raw bearer token from the `Authorization` header
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn with_query(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.query.insert(key.to_string(), value.into());
        self
    }

    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = body;
        self
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Parse a raw body. An empty body is an empty object; anything other
    /// than a JSON object is rejected.
    pub fn parse_body(raw: &[u8]) -> Result<Map<String, Value>, FieldError> {
        if raw.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Map::new());
        }

        match serde_json::from_slice::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(FieldError::new(
                Source::Body,
                "body",
                "Invalid Resource: Body must be a JSON object",
                None,
            )),
            Err(_) => Err(FieldError::new(
                Source::Body,
                "body",
                "Invalid Resource: Malformed JSON body",
                None,
            )),
        }
    }

    /// Value from one source
    pub fn get(&self, source: Source, key: &str) -> Option<&Value> {
        let map = match source {
            Source::Params => &self.params,
            Source::Query => &self.query,
            Source::Body => &self.body,
        };
        map.get(key).filter(|v| !v.is_null())
    }

    /// Merged lookup: route params win over query, query over body
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.get(Source::Params, key)
            .or_else(|| self.get(Source::Query, key))
            .or_else(|| self.get(Source::Body, key))
    }

    /// Parameter as text
    pub fn text(&self, key: &str) -> Option<String> {
        self.param(key).map(value_text)
    }

    /// Parameter as an integer, if it parses
    pub fn int(&self, key: &str) -> Option<i64> {
        self.text(key).and_then(|s| s.trim().parse().ok())
    }

    /// Parameter as a float, if it parses
    pub fn float(&self, key: &str) -> Option<f64> {
        self.text(key).and_then(|s| s.trim().parse().ok())
    }
}
