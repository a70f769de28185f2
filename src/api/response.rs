//! # Response Envelope
//!
//! Every endpoint answers with the same wrapper:
//! `{status, status_code, http_code, ...payload}`, written with the HTTP
//! status named by `http_code`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::validation::FieldError;

/// Outcome named in the envelope's `status` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    ValidationError,
    InternalError,
    Unauthorized,
    Forbidden,
    NotFound,
}

impl Status {
    /// Numeric code carried in `status_code`
    pub fn code(&self) -> u16 {
        match self {
            Status::Success => 0,
            Status::ValidationError => 1,
            Status::InternalError => 2,
            Status::Unauthorized => 3,
            Status::Forbidden => 4,
            Status::NotFound => 5,
        }
    }
}

/// Uniform response body
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub status: Status,
    pub status_code: u16,
    pub http_code: u16,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Envelope {
    fn new(status: Status, http: StatusCode) -> Self {
        Self {
            status,
            status_code: status.code(),
            http_code: http.as_u16(),
            payload: Map::new(),
        }
    }

    /// Success with the given HTTP status (200 for reads, 201 for creates)
    pub fn success(http: StatusCode) -> Self {
        Self::new(Status::Success, http)
    }

    /// 400 listing every failing field
    pub fn validation_error(errors: Vec<FieldError>) -> Self {
        Self::new(Status::ValidationError, StatusCode::BAD_REQUEST).with("errors", errors)
    }

    /// Opaque 500; the cause only goes to the server log
    pub fn internal_error() -> Self {
        let mut envelope = Self::new(Status::InternalError, StatusCode::INTERNAL_SERVER_ERROR);
        envelope.payload.insert(
            "message".to_string(),
            Value::String("Internal server error".to_string()),
        );
        envelope
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(Status::Unauthorized, StatusCode::UNAUTHORIZED).with_message(message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(Status::Forbidden, StatusCode::FORBIDDEN).with_message(message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Status::NotFound, StatusCode::NOT_FOUND).with_message(message)
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.payload
            .insert("message".to_string(), Value::String(message.into()));
        self
    }

    /// Attach a payload field. A value that cannot be serialized turns the
    /// whole envelope into an internal error.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => {
                self.payload.insert(key.to_string(), v);
                self
            }
            Err(e) => {
                tracing::error!(err = %e, field = key, "envelope serialization Error");
                Self::internal_error()
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// HTTP status matching `http_code`
    pub fn http_status(&self) -> StatusCode {
        StatusCode::from_u16(self.http_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = self.http_status();
        (status, Json(self)).into_response()
    }
}
