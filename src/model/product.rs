use crate::validation::{Constraint, FieldValue, Rule, RuleValidator};
use crud_framework::record;

record! {
    #[record(serde)]
    /// A product in the catalog.
    pub struct Product {
        id: u64,
        pub name: String,
        pub sku: String,
        pub price: f64,
        pub quantity: u32,
        pub active: bool = true,
    }
}

/// Rules every saved [`Product`]. The `catalog` group adds the checks a listed
/// product needs on top of the basic ones.
pub fn product_rules() -> Result<RuleValidator<Product>, regex::Error> {
    Ok(RuleValidator::new()
        .rule(Rule::new("name", |p: &Product| FieldValue::text(&p.name), Constraint::NotEmpty))
        .rule(Rule::new(
            "sku",
            |p: &Product| FieldValue::text(&p.sku),
            Constraint::matches(r"^[A-Z]{3}-\d{4}$")?,
        ))
        .rule(Rule::new("price", |p: &Product| FieldValue::number(p.price), Constraint::Min(0.0)))
        .rule(
            Rule::new("price", |p: &Product| FieldValue::number(p.price), Constraint::Min(0.01))
                .groups(&["catalog"])
                .message("listed products need a price"),
        )
        .rule(
            Rule::new("quantity", |p: &Product| FieldValue::number(p.quantity), Constraint::Max(100_000.0)),
        ))
}
