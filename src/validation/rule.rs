//! Declarative rules: which property, how to read it, and what it must satisfy.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// A property value as seen by a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// The property holds no value (`None`).
    Missing,
}

impl FieldValue {
    pub fn text(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }

    pub fn number(value: impl Into<f64>) -> Self {
        FieldValue::Number(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Rendering used for `Violation::value`.
    pub fn render(&self) -> Option<String> {
        match self {
            FieldValue::Text(text) => Some(text.clone()),
            FieldValue::Number(number) => Some(number.to_string()),
            FieldValue::Missing => None,
        }
    }
}

impl<V: Into<f64>> From<Option<V>> for FieldValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::number)
    }
}

/// A single check. Names follow the usual validator vocabulary (`isEmail`, `minLength`, ...)
/// so violation payloads read the same as elsewhere.
#[derive(Debug, Clone)]
pub enum Constraint {
    NotEmpty,
    Email,
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    Matches(Regex),
}

impl Constraint {
    pub fn matches(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Constraint::Matches(Regex::new(pattern)?))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Constraint::NotEmpty => "isNotEmpty",
            Constraint::Email => "isEmail",
            Constraint::MinLength(_) => "minLength",
            Constraint::MaxLength(_) => "maxLength",
            Constraint::Min(_) => "min",
            Constraint::Max(_) => "max",
            Constraint::Matches(_) => "matches",
        }
    }

    pub fn check(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Constraint::NotEmpty, FieldValue::Text(text)) => !text.is_empty(),
            (Constraint::NotEmpty, FieldValue::Number(_)) => true,
            (Constraint::Email, FieldValue::Text(text)) => is_email(text),
            (Constraint::MinLength(min), FieldValue::Text(text)) => text.chars().count() >= *min,
            (Constraint::MaxLength(max), FieldValue::Text(text)) => text.chars().count() <= *max,
            (Constraint::Min(min), FieldValue::Number(n)) => n >= min,
            (Constraint::Max(max), FieldValue::Number(n)) => n <= max,
            (Constraint::Matches(pattern), FieldValue::Text(text)) => pattern.is_match(text),
            _ => false,
        }
    }

    pub fn default_message(&self, property: &str) -> String {
        match self {
            Constraint::NotEmpty => format!("{property} should not be empty"),
            Constraint::Email => format!("{property} must be an email"),
            Constraint::MinLength(min) => {
                format!("{property} must be longer than or equal to {min} characters")
            }
            Constraint::MaxLength(max) => {
                format!("{property} must be shorter than or equal to {max} characters")
            }
            Constraint::Min(min) => format!("{property} must not be less than {min}"),
            Constraint::Max(max) => format!("{property} must not be greater than {max}"),
            Constraint::Matches(pattern) => {
                format!("{property} must match {} regular expression", pattern.as_str())
            }
        }
    }
}

// Dot-atom local part, then hostname labels (alphanumeric at both ends) and an
// alphabetic TLD of two or more letters.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .expect("valid email regex")
});

fn is_email(text: &str) -> bool {
    EMAIL_RE.is_match(text)
}

/// One constraint on one property of `T`.
pub struct Rule<T> {
    pub(crate) property: &'static str,
    pub(crate) accessor: fn(&T) -> FieldValue,
    pub(crate) constraint: Constraint,
    pub(crate) groups: Vec<String>,
    pub(crate) optional: bool,
    pub(crate) message: Option<String>,
}

impl<T> Rule<T> {
    pub fn new(property: &'static str, accessor: fn(&T) -> FieldValue, constraint: Constraint) -> Self {
        Self {
            property,
            accessor,
            constraint,
            groups: Vec::new(),
            optional: false,
            message: None,
        }
    }

    /// Only applies when validating with one of these groups.
    pub fn groups(mut self, groups: &[&str]) -> Self {
        self.groups = groups.iter().map(|g| g.to_string()).collect();
        self
    }

    /// Skipped when the property is missing.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Replaces the default message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub(crate) fn applies_to(&self, groups: &[String]) -> bool {
        self.groups.is_empty() || self.groups.iter().any(|g| groups.contains(g))
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("property", &self.property)
            .field("constraint", &self.constraint.name())
            .field("groups", &self.groups)
            .field("optional", &self.optional)
            .finish()
    }
}
