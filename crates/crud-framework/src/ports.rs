//! # Ports
//!
//! The two capability sets a `CrudService` depends on. Neither is implemented by the
//! service itself: the persistence port is any storage engine that can list, look up,
//! build, save and delete records, and the validation port is any rule engine that turns
//! a record into a list of violations.
//!
//! The framework ships one persistence backend ([`StoreClient`](crate::store::StoreClient),
//! an in-memory actor) and a scriptable one for tests ([`MockStore`](crate::mock::MockStore)).

use crate::error::ServiceError;
use crate::record::Record;
use crate::violation::{ValidatorOptions, Violation};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Outcome of a delete: how many records were removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub affected: u64,
}

impl DeleteResult {
    pub fn affected(affected: u64) -> Self {
        Self { affected }
    }
}

/// A shareable predicate over records.
pub struct Filter<T>(Arc<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Filter<T> {
    pub fn new(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    pub fn matches(&self, record: &T) -> bool {
        (self.0)(record)
    }
}

impl<T> Clone for Filter<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Query shaping for `find_one`: sort order and how many matches to skip.
pub struct FindOneOptions<T> {
    pub order: Option<Comparator<T>>,
    pub skip: usize,
}

impl<T> FindOneOptions<T> {
    pub fn new() -> Self {
        Self {
            order: None,
            skip: 0,
        }
    }

    pub fn order_by(mut self, compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        self.order = Some(Arc::new(compare));
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }
}

impl<T> Default for FindOneOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for FindOneOptions<T> {
    fn clone(&self) -> Self {
        Self {
            order: self.order.clone(),
            skip: self.skip,
        }
    }
}

impl<T> fmt::Debug for FindOneOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FindOneOptions")
            .field("ordered", &self.order.is_some())
            .field("skip", &self.skip)
            .finish()
    }
}

/// Storage capability set for one record type.
///
/// Implementations must be safe to share across concurrent calls. Errors are reported
/// in the backend's own `Error` type and reach the caller unchanged.
#[async_trait]
pub trait PersistencePort<T: Record>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every stored record, in the backend's default order.
    async fn find_all(&self) -> Result<Vec<T>, Self::Error>;

    async fn find_by_id(&self, id: T::Id) -> Result<Option<T>, Self::Error>;

    /// The first record matching `filter` (all records when `None`), shaped by `options`.
    async fn find_one(
        &self,
        filter: Option<Filter<T>>,
        options: Option<FindOneOptions<T>>,
    ) -> Result<Option<T>, Self::Error>;

    /// Persists `record`: assigns an identifier on first save, overwrites otherwise.
    async fn save(&self, record: T) -> Result<T, Self::Error>;

    /// Removes the record with `id`. Absence is not an error.
    async fn delete_by_id(&self, id: T::Id) -> Result<DeleteResult, Self::Error>;

    /// Builds an in-memory record from `partial` overlaid on the type's defaults.
    /// Nothing is stored.
    fn build(&self, partial: T::Partial) -> T {
        T::from_partial(partial)
    }

    /// Looks up `id`, failing with `NotFound` when there is no such record.
    async fn find_one_or_fail(&self, id: T::Id) -> Result<T, ServiceError> {
        match self.find_by_id(id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(ServiceError::not_found::<T>(id)),
            Err(e) => Err(ServiceError::backend(e)),
        }
    }
}

/// Rule-checking capability set for one record type.
#[async_trait]
pub trait ValidationPort<T: Record>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Checks `record`. An empty list means the record is valid.
    async fn validate(
        &self,
        record: &T,
        options: &ValidatorOptions,
    ) -> Result<Vec<Violation>, Self::Error>;
}
