/// Errors raised by the in-memory store.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store closed")]
    Closed,
    #[error("Store dropped response channel")]
    Dropped,
    #[error("Unique constraint {constraint} violated by {value}")]
    UniqueViolation { constraint: String, value: String },
}
