//! Constraint checks
//!
//! Every check runs on the textual form of a value. Absent values read as
//! the empty string, so a missing field fails `notEmpty`, `isInt` and
//! `isFloat` alike unless the field is optional. Numbers must also fit the
//! column they are stored in: 64-bit integers and finite doubles.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

static INT_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
static FLOAT_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn int_pattern() -> Option<&'static Regex> {
    INT_PATTERN
        .get_or_init(|| Regex::new(r"^[-+]?[0-9]+$").ok())
        .as_ref()
}

fn float_pattern() -> Option<&'static Regex> {
    FLOAT_PATTERN
        .get_or_init(|| Regex::new(r"^[-+]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][-+]?[0-9]+)?$").ok())
        .as_ref()
}

/// A single constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    NotEmpty,
    IsInt,
    IsFloat,
    /// Inclusive character-count range
    IsLength { min: usize, max: Option<usize> },
}

impl Rule {
    /// Returns true if `text` satisfies the constraint
    pub fn check(&self, text: &str) -> bool {
        match self {
            Rule::NotEmpty => !text.is_empty(),
            Rule::IsInt => {
                int_pattern().map_or(false, |re| re.is_match(text))
                    && text.parse::<i64>().is_ok()
            }
            Rule::IsFloat => {
                float_pattern().map_or(false, |re| re.is_match(text))
                    && text.parse::<f64>().map_or(false, f64::is_finite)
            }
            Rule::IsLength { min, max } => {
                let len = text.chars().count();
                len >= *min && max.map_or(true, |max| len <= max)
            }
        }
    }

    /// Constraint name as it appears in schema definitions
    pub fn name(&self) -> &'static str {
        match self {
            Rule::NotEmpty => "notEmpty",
            Rule::IsInt => "isInt",
            Rule::IsFloat => "isFloat",
            Rule::IsLength { .. } => "isLength",
        }
    }
}

/// Textual form of a JSON value
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_accepts_signed_integers() {
        for ok in ["0", "7", "-12", "+3", "100", "007"] {
            assert!(Rule::IsInt.check(ok), "{} should be an int", ok);
        }
        for bad in ["", "abc", "1.5", "1e3", " 4", "+"] {
            assert!(!Rule::IsInt.check(bad), "{} should not be an int", bad);
        }
    }

    #[test]
    fn test_int_rejects_values_outside_i64() {
        assert!(Rule::IsInt.check("9223372036854775807"));
        assert!(Rule::IsInt.check("-9223372036854775808"));
        assert!(!Rule::IsInt.check("9223372036854775808"));
        assert!(!Rule::IsInt.check("99999999999999999999"));
    }

    #[test]
    fn test_float_rejects_non_finite_values() {
        assert!(Rule::IsFloat.check("1e300"));
        assert!(!Rule::IsFloat.check("1e400"));
        assert!(!Rule::IsFloat.check("-1e400"));
    }

    #[test]
    fn test_float_accepts_numeric_strings() {
        for ok in ["4.5", "4", "-0.25", ".5", "5.", "1e3", "+2.5E-2"] {
            assert!(Rule::IsFloat.check(ok), "{} should be a float", ok);
        }
        for bad in ["", "abc", ".", "-", "4.5.1", "e5", "4,5"] {
            assert!(!Rule::IsFloat.check(bad), "{} should not be a float", bad);
        }
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let rule = Rule::IsLength {
            min: 1,
            max: Some(280),
        };
        assert!(!rule.check(""));
        assert!(rule.check("a"));
        assert!(rule.check(&"a".repeat(280)));
        assert!(!rule.check(&"a".repeat(281)));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let rule = Rule::IsLength {
            min: 1,
            max: Some(3),
        };
        assert!(rule.check("héé"));
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!(4.5)), "4.5");
        assert_eq!(value_text(&json!(12)), "12");
        assert_eq!(value_text(&json!("x")), "x");
        assert_eq!(value_text(&Value::Null), "");
        assert_eq!(value_text(&json!(true)), "true");
    }
}
