use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::FieldError;
use crate::error::RuleError;
use crate::field::{FieldName, FieldValue};

/// Which built-in rule produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Min,
    Max,
    Pattern,
    Email,
    Checked,
    /// A custom rule added with [`Rules::validate`].
    Validate,
}

/// Type alias for rule predicates.
type Check = Arc<dyn Fn(&FieldValue) -> bool + Send + Sync>;

#[derive(Clone)]
struct Rule {
    kind: RuleKind,
    message: String,
    check: Check,
}

/// An ordered set of validation rules for one field.
///
/// Rules run in insertion order and the first failure wins. Apart from
/// `required` and `checked`, every rule treats an empty value as valid;
/// combine with `required()` to demand input.
#[derive(Clone, Default)]
pub struct Rules {
    rules: Vec<Rule>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    fn push<F>(mut self, kind: RuleKind, check: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            kind,
            message: msg.into(),
            check: Arc::new(check),
        });
        self
    }

    /// Add a custom rule.
    pub fn validate<F>(self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        self.push(RuleKind::Validate, f, msg)
    }

    /// Require a non-empty value. A boolean counts as present only when true.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.push(RuleKind::Required, |v| !is_blank(v), msg)
    }

    /// Require minimum length (characters for text, items for lists).
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.push(
            RuleKind::MinLength,
            move |v| is_blank(v) || length(v).is_none_or(|len| len >= min),
            msg,
        )
    }

    /// Require maximum length (characters for text, items for lists).
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.push(
            RuleKind::MaxLength,
            move |v| length(v).is_none_or(|len| len <= max),
            msg,
        )
    }

    /// Require a numeric value of at least `min`. Numeric text is accepted.
    pub fn min(self, min: f64, msg: impl Into<String>) -> Self {
        self.push(
            RuleKind::Min,
            move |v| number(v).is_none_or(|n| n >= min),
            msg,
        )
    }

    /// Require a numeric value of at most `max`. Numeric text is accepted.
    pub fn max(self, max: f64, msg: impl Into<String>) -> Self {
        self.push(
            RuleKind::Max,
            move |v| number(v).is_none_or(|n| n <= max),
            msg,
        )
    }

    /// Require text to match a regex pattern.
    pub fn pattern(self, pattern: &str, msg: impl Into<String>) -> Result<Self, RuleError> {
        let re = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self.push(
            RuleKind::Pattern,
            move |v| match v {
                FieldValue::String(s) if !s.is_empty() => re.is_match(s),
                _ => true,
            },
            msg,
        ))
    }

    /// Require a valid email address.
    pub fn email(self, msg: impl Into<String>) -> Self {
        self.push(
            RuleKind::Email,
            |v| match v {
                FieldValue::String(s) if !s.is_empty() => email_address::EmailAddress::is_valid(s),
                _ => true,
            },
            msg,
        )
    }

    /// Require the checkbox to be checked.
    pub fn checked(self, msg: impl Into<String>) -> Self {
        self.push(RuleKind::Checked, |v| v.as_bool() == Some(true), msg)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Run the rules against `value`, returning the first failure.
    pub fn evaluate(&self, name: &FieldName, value: &FieldValue) -> Option<FieldError> {
        self.rules
            .iter()
            .find(|rule| !(rule.check)(value))
            .map(|rule| FieldError {
                name: name.to_string(),
                kind: rule.kind,
                message: rule.message.clone(),
            })
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.kind))
            .finish()
    }
}

fn is_blank(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => true,
        FieldValue::Bool(b) => !b,
        FieldValue::String(s) => s.trim().is_empty(),
        FieldValue::Array(items) => items.is_empty(),
        FieldValue::Object(map) => map.is_empty(),
        FieldValue::Number(_) => false,
    }
}

fn length(value: &FieldValue) -> Option<usize> {
    match value {
        FieldValue::String(s) if !s.is_empty() => Some(s.chars().count()),
        FieldValue::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn number(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) => n.as_f64(),
        FieldValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
