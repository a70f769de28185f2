//! Field-level validation failures

use serde::Serialize;
use serde_json::Value;

use super::schema::Source;

/// One failing constraint on one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub location: Source,
    pub param: String,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldError {
    pub fn new(
        location: Source,
        param: impl Into<String>,
        msg: impl Into<String>,
        value: Option<Value>,
    ) -> Self {
        Self {
            location,
            param: param.into(),
            msg: msg.into(),
            value,
        }
    }
}
