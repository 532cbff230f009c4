//! Declarative validation for JSON request bodies.
//!
//! A [`Schema`] is an ordered list of `(field, constraint, message)` rules
//! built once at setup time and evaluated against a parsed JSON object.
//! Rules are checked in order; the first failure produces a `400` error
//! carrying the rule's message.
//!
//! Length and pattern constraints apply only when the field is present as a
//! string; pair them with [`Constraint::Required`] to also reject absence.

use crate::error::Error;
use http::StatusCode;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email regex");
}

/// A single field constraint.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// The field must be present and, if a string, non-empty.
    Required,
    /// Minimum length in characters.
    MinLen(usize),
    /// Maximum length in characters.
    MaxLen(usize),
    /// The string must match the regex.
    Pattern(Regex),
    /// The string must look like an email address.
    Email,
}

impl Constraint {
    /// Compiles a [`Constraint::Pattern`] from a regex source, failing at
    /// setup time rather than per request.
    pub fn pattern(source: &str) -> crate::Result<Constraint> {
        let regex = Regex::new(source)
            .map_err(|e| Error::new(format!("invalid pattern constraint: {e}")))?;
        Ok(Constraint::Pattern(regex))
    }

    fn check(&self, field_value: Option<&Value>) -> bool {
        let text = field_value.and_then(Value::as_str);
        match self {
            Constraint::Required => match field_value {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            },
            Constraint::MinLen(min) => text.map_or(true, |s| s.chars().count() >= *min),
            Constraint::MaxLen(max) => text.map_or(true, |s| s.chars().count() <= *max),
            Constraint::Pattern(regex) => text.map_or(true, |s| regex.is_match(s)),
            Constraint::Email => text.map_or(true, |s| EMAIL_RE.is_match(s)),
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    field: String,
    constraint: Constraint,
    message: String,
}

/// An ordered set of validation rules.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tern::validator::{Constraint, Schema};
///
/// let schema = Schema::new()
///     .rule("name", Constraint::Required, "name is required")
///     .rule("name", Constraint::MaxLen(64), "name is too long")
///     .rule("email", Constraint::Email, "email is invalid");
///
/// assert!(schema.check(&json!({"name": "ada", "email": "ada@example.com"})).is_ok());
/// let err = schema.check(&json!({"email": "ada@example.com"})).unwrap_err();
/// assert_eq!(err.to_string(), "name is required");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: Vec<Rule>,
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    /// Appends a rule. Rules are evaluated in the order they were added.
    pub fn rule<F: Into<String>, M: Into<String>>(
        mut self,
        field: F,
        constraint: Constraint,
        message: M,
    ) -> Self {
        self.rules.push(Rule {
            field: field.into(),
            constraint,
            message: message.into(),
        });
        self
    }

    /// Evaluates every rule against `value`, returning the first failing
    /// rule's message as a `400` error.
    pub fn check(&self, value: &Value) -> crate::Result<()> {
        for rule in &self.rules {
            if !rule.constraint.check(value.get(&rule.field)) {
                return Err(
                    Error::with_status(StatusCode::BAD_REQUEST, rule.message.clone()).into(),
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_rejects_missing_null_and_empty() {
        let schema = Schema::new().rule("name", Constraint::Required, "required");
        assert!(schema.check(&json!({})).is_err());
        assert!(schema.check(&json!({ "name": null })).is_err());
        assert!(schema.check(&json!({ "name": "" })).is_err());
        assert!(schema.check(&json!({ "name": "x" })).is_ok());
        assert!(schema.check(&json!({ "name": 7 })).is_ok());
    }

    #[test]
    fn length_rules_skip_absent_fields() {
        let schema = Schema::new()
            .rule("nick", Constraint::MinLen(3), "too short")
            .rule("nick", Constraint::MaxLen(5), "too long");
        assert!(schema.check(&json!({})).is_ok());
        assert!(schema.check(&json!({ "nick": "ab" })).is_err());
        assert!(schema.check(&json!({ "nick": "abcdef" })).is_err());
        assert!(schema.check(&json!({ "nick": "abcd" })).is_ok());
    }

    #[test]
    fn pattern_and_email() {
        let schema = Schema::new()
            .rule("code", Constraint::pattern(r"^[0-9]{4}$").unwrap(), "bad code")
            .rule("email", Constraint::Email, "bad email");
        assert!(schema.check(&json!({ "code": "1234", "email": "a@b.io" })).is_ok());
        assert!(schema.check(&json!({ "code": "12x4" })).is_err());
        assert!(schema.check(&json!({ "email": "not-an-email" })).is_err());
    }

    #[test]
    fn first_failure_wins() {
        let schema = Schema::new()
            .rule("a", Constraint::Required, "a missing")
            .rule("b", Constraint::Required, "b missing");
        let err = schema.check(&json!({})).unwrap_err();
        assert_eq!(err.to_string(), "a missing");
    }
}
