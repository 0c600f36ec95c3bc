//! # Service Errors
//!
//! Every failure a `CrudService` can return. Lookups that miss are `NotFound`, a rejected
//! validation gate is `Unprocessable`, and anything a port raises is carried through
//! untouched as the `source` of `Backend` or `Validator`.
//!
//! A transport layer is expected to map `NotFound` to "not found", `Unprocessable` to
//! "unprocessable entity" with [`ServiceError::violations`] as the payload, and the rest
//! to an internal error.

use crate::record::{entity_name, Record};
use crate::violation::Violation;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Unprocessable entity: {} violation(s)", .0.len())]
    Unprocessable(Vec<Violation>),
    #[error("Persistence error: {0}")]
    Backend(#[source] BoxError),
    #[error("Validator error: {0}")]
    Validator(#[source] BoxError),
}

impl ServiceError {
    pub fn not_found<T: Record>(id: T::Id) -> Self {
        ServiceError::NotFound {
            entity: entity_name::<T>(),
            id: id.to_string(),
        }
    }

    pub fn backend<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        ServiceError::Backend(Box::new(error))
    }

    pub fn validator<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        ServiceError::Validator(Box::new(error))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }

    /// The full ordered violation list of an `Unprocessable` error.
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            ServiceError::Unprocessable(violations) => Some(violations),
            _ => None,
        }
    }

    /// The persistence backend's native error, if this is a `Backend` failure of type `E`.
    pub fn backend_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            ServiceError::Backend(error) => error.downcast_ref::<E>(),
            _ => None,
        }
    }
}
