//! # Rule-Based Validation
//!
//! [`RuleValidator`] is the application's [`ValidationPort`]: an ordered list of
//! [`Rule`]s, each reading one property and checking one [`Constraint`]. Rule sets are
//! declared next to their record (see [`user_rules`](crate::model::user_rules) and
//! [`product_rules`](crate::model::product_rules)).
//!
//! ## Options
//!
//! | Option | Effect |
//! |--------|--------|
//! | `groups` | Rules with groups run only if one of them is listed; ungrouped rules always run |
//! | `skip_missing_properties` | Rules on missing (`None`) properties are skipped |
//! | `stop_at_first_error` | At most one failed constraint is reported per property |
//! | `dismiss_default_messages` | Messages are empty unless the rule sets its own |
//! | `include_values` | The offending value is copied into the violation |
//!
//! Violations come back one per property, in the order each property first failed,
//! with every failed constraint of that property in `constraints`.

mod rule;

pub use rule::{Constraint, FieldValue, Rule};

use async_trait::async_trait;
use crud_framework::{Record, ValidationPort, ValidatorOptions, Violation};
use std::convert::Infallible;

#[derive(Debug)]
pub struct RuleValidator<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for RuleValidator<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> RuleValidator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: Rule<T>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn check(&self, record: &T, options: &ValidatorOptions) -> Vec<Violation> {
        let mut violations: Vec<Violation> = Vec::new();

        for rule in self.rules.iter().filter(|r| r.applies_to(&options.groups)) {
            let value = (rule.accessor)(record);
            if value.is_missing() && (rule.optional || options.skip_missing_properties) {
                continue;
            }
            let existing = violations.iter().position(|v| v.property == rule.property);
            if options.stop_at_first_error && existing.is_some() {
                continue;
            }
            if rule.constraint.check(&value) {
                continue;
            }

            let message = match &rule.message {
                Some(message) => message.clone(),
                None if options.dismiss_default_messages => String::new(),
                None => rule.constraint.default_message(rule.property),
            };
            let name = rule.constraint.name().to_string();
            match existing {
                Some(index) => {
                    violations[index].constraints.insert(name, message);
                }
                None => {
                    let mut violation = Violation::new(rule.property);
                    if options.include_values {
                        if let Some(rendered) = value.render() {
                            violation = violation.with_value(rendered);
                        }
                    }
                    violations.push(violation.with_constraint(name, message));
                }
            }
        }

        violations
    }
}

#[async_trait]
impl<T: Record> ValidationPort<T> for RuleValidator<T> {
    type Error = Infallible;

    async fn validate(
        &self,
        record: &T,
        options: &ValidatorOptions,
    ) -> Result<Vec<Violation>, Infallible> {
        Ok(self.check(record, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        name: String,
        score: Option<u32>,
    }

    fn rules() -> RuleValidator<Sample> {
        RuleValidator::new()
            .rule(Rule::new("name", |s: &Sample| FieldValue::text(&s.name), Constraint::NotEmpty))
            .rule(Rule::new("name", |s: &Sample| FieldValue::text(&s.name), Constraint::MinLength(3)))
            .rule(Rule::new("score", |s: &Sample| s.score.into(), Constraint::Min(1.0)))
            .rule(
                Rule::new("score", |s: &Sample| s.score.into(), Constraint::Max(10.0))
                    .groups(&["strict"]),
            )
    }

    fn sample(name: &str, score: Option<u32>) -> Sample {
        Sample {
            name: name.into(),
            score,
        }
    }

    #[test]
    fn test_valid_record_has_no_violations() {
        assert!(rules().check(&sample("alice", Some(5)), &ValidatorOptions::default()).is_empty());
    }

    #[test]
    fn test_constraints_grouped_per_property_in_order() {
        let violations = rules().check(&sample("", Some(0)), &ValidatorOptions::default());
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].property, "name");
        assert_eq!(violations[0].value.as_deref(), Some(""));
        assert_eq!(
            violations[0].constraints.keys().collect::<Vec<_>>(),
            vec!["isNotEmpty", "minLength"]
        );
        assert_eq!(violations[1].property, "score");
        assert_eq!(violations[1].constraints["min"], "score must not be less than 1");
    }

    #[test]
    fn test_stop_at_first_error() {
        let options = ValidatorOptions {
            stop_at_first_error: true,
            ..Default::default()
        };
        let violations = rules().check(&sample("", Some(5)), &options);
        assert_eq!(violations[0].constraints.len(), 1);
        assert!(violations[0].constraints.contains_key("isNotEmpty"));
    }

    #[test]
    fn test_groups_select_extra_rules() {
        let loud = sample("alice", Some(50));
        assert!(rules().check(&loud, &ValidatorOptions::default()).is_empty());

        let strict = ValidatorOptions {
            groups: vec!["strict".into()],
            ..Default::default()
        };
        let violations = rules().check(&loud, &strict);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].constraints.contains_key("max"));
    }

    #[test]
    fn test_missing_values_fail_unless_skipped() {
        let unscored = sample("alice", None);
        let violations = rules().check(&unscored, &ValidatorOptions::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].value, None);

        let skip = ValidatorOptions {
            skip_missing_properties: true,
            ..Default::default()
        };
        assert!(rules().check(&unscored, &skip).is_empty());
    }

    #[test]
    fn test_optional_rule_skips_missing_value() {
        let validator = RuleValidator::new().rule(
            Rule::new("score", |s: &Sample| s.score.into(), Constraint::Min(1.0)).optional(),
        );
        assert!(validator.check(&sample("a", None), &ValidatorOptions::default()).is_empty());
        assert_eq!(validator.check(&sample("a", Some(0)), &ValidatorOptions::default()).len(), 1);
    }

    #[test]
    fn test_message_options() {
        let validator = RuleValidator::new()
            .rule(Rule::new("name", |s: &Sample| FieldValue::text(&s.name), Constraint::NotEmpty))
            .rule(
                Rule::new("name", |s: &Sample| FieldValue::text(&s.name), Constraint::MinLength(2))
                    .message("too short"),
            );
        let options = ValidatorOptions {
            dismiss_default_messages: true,
            include_values: false,
            ..Default::default()
        };
        let violations = validator.check(&sample("", None), &options);
        assert_eq!(violations[0].value, None);
        assert_eq!(violations[0].constraints["isNotEmpty"], "");
        assert_eq!(violations[0].constraints["minLength"], "too short");
    }
}
