//! # Validation Data
//!
//! The structured description of a failed rule ([`Violation`]) and the options that tell a
//! validation backend which rules apply ([`ValidatorOptions`]). The service never looks
//! inside either; it only forwards the options and collects the violations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One property-level rule failure.
///
/// `constraints` maps the failed constraint name (e.g. `"isEmail"`) to its message.
/// Nested records report their own failures in `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub constraints: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Violation>,
}

impl Violation {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: None,
            constraints: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_constraint(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.constraints.insert(name.into(), message.into());
        self
    }

    pub fn with_child(mut self, child: Violation) -> Self {
        self.children.push(child);
        self
    }
}

/// Options controlling which validation rules apply and how failures are reported.
///
/// Loaded once at process start and shared by reference with every service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Skip rules on properties that hold no value.
    pub skip_missing_properties: bool,
    /// Report at most one failed constraint per property.
    pub stop_at_first_error: bool,
    /// Leave constraint messages empty.
    pub dismiss_default_messages: bool,
    /// Only rules without groups, or in one of these groups, apply.
    pub groups: Vec<String>,
    /// Copy the offending value into each violation.
    pub include_values: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            skip_missing_properties: false,
            stop_at_first_error: false,
            dismiss_default_messages: false,
            groups: Vec::new(),
            include_values: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_serializes_as_payload() {
        let violation = Violation::new("email")
            .with_value("nope")
            .with_constraint("isEmail", "email must be an email");
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["property"], "email");
        assert_eq!(json["value"], "nope");
        assert_eq!(json["constraints"]["isEmail"], "email must be an email");
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ValidatorOptions =
            serde_json::from_str(r#"{ "groups": ["strict"] }"#).unwrap();
        assert_eq!(options.groups, vec!["strict".to_string()]);
        assert!(options.include_values);
        assert!(!options.skip_missing_properties);
    }
}
