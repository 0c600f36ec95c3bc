use crate::validation::{Constraint, FieldValue, Rule, RuleValidator};
use crud_framework::record;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user_{}", self.0)
    }
}

record! {
    #[record(serde)]
    /// A registered user.
    pub struct User {
        id: UserId,
        pub name: String,
        pub email: String,
        pub age: Option<u32>,
        pub bio: String,
        pub active: bool,
    }
}

/// Rules every saved [`User`] must satisfy.
pub fn user_rules() -> RuleValidator<User> {
    RuleValidator::new()
        .rule(Rule::new("name", |u: &User| FieldValue::text(&u.name), Constraint::NotEmpty))
        .rule(Rule::new("name", |u: &User| FieldValue::text(&u.name), Constraint::MaxLength(64)))
        .rule(Rule::new("email", |u: &User| FieldValue::text(&u.email), Constraint::Email))
        .rule(Rule::new("age", |u: &User| u.age.into(), Constraint::Min(13.0)).optional())
        .rule(Rule::new("age", |u: &User| u.age.into(), Constraint::Max(150.0)).optional())
        .rule(Rule::new("bio", |u: &User| FieldValue::text(&u.bio), Constraint::MaxLength(280)))
}
