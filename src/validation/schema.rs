//! Declarative request schemas
//!
//! A schema lists fields per request source, each with an ordered set of
//! constraints and their error messages. Evaluation never stops at the
//! first failure: every failing constraint of every field is reported.

use serde::Serialize;

use crate::api::ApiRequest;

use super::errors::FieldError;
use super::rules::{value_text, Rule};

/// Part of the request a field is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Params,
    Query,
    Body,
}

/// Constraints on one field
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    optional: bool,
    rules: Vec<(Rule, String)>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip every other constraint when the field is absent
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn not_empty(self, msg: impl Into<String>) -> Self {
        self.rule(Rule::NotEmpty, msg)
    }

    pub fn is_int(self, msg: impl Into<String>) -> Self {
        self.rule(Rule::IsInt, msg)
    }

    pub fn is_float(self, msg: impl Into<String>) -> Self {
        self.rule(Rule::IsFloat, msg)
    }

    pub fn is_length(self, min: usize, max: usize, msg: impl Into<String>) -> Self {
        self.rule(Rule::IsLength { min, max: Some(max) }, msg)
    }

    pub fn rule(mut self, rule: Rule, msg: impl Into<String>) -> Self {
        self.rules.push((rule, msg.into()));
        self
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

#[derive(Debug, Clone)]
struct FieldEntry {
    source: Source,
    name: String,
    rules: FieldRules,
}

/// Ordered set of field constraints for one endpoint
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldEntry>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, source: Source, name: &str, rules: FieldRules) -> Self {
        self.fields.push(FieldEntry {
            source,
            name: name.to_string(),
            rules,
        });
        self
    }

    pub fn params(self, name: &str, rules: FieldRules) -> Self {
        self.field(Source::Params, name, rules)
    }

    pub fn query(self, name: &str, rules: FieldRules) -> Self {
        self.field(Source::Query, name, rules)
    }

    pub fn body(self, name: &str, rules: FieldRules) -> Self {
        self.field(Source::Body, name, rules)
    }

    /// Returns true if the schema constrains `name` in `source`
    pub fn has_field(&self, source: Source, name: &str) -> bool {
        self.fields
            .iter()
            .any(|f| f.source == source && f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Evaluate against a request. An empty result means the request passes.
    pub fn validate(&self, request: &ApiRequest) -> Vec<FieldError> {
        let mut errors = Vec::new();

        for field in &self.fields {
            let value = request.get(field.source, &field.name);
            if value.is_none() && field.rules.optional {
                continue;
            }

            let text = value.map(value_text).unwrap_or_default();
            for (rule, msg) in &field.rules.rules {
                if !rule.check(&text) {
                    errors.push(FieldError::new(
                        field.source,
                        field.name.clone(),
                        msg.clone(),
                        value.cloned(),
                    ));
                }
            }
        }

        errors
    }
}
