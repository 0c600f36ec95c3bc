//! # Generic Record Service
//!
//! [`CrudService`] exposes list, get, find, create, update, patch and delete for any
//! [`Record`] type, on top of a [`PersistencePort`] and a [`ValidationPort`].
//!
//! ## The Validation Gate
//! `create`, `update` and `patch` all pass the record through one private gate before
//! anything is saved. A non-empty violation list fails the call with
//! [`ServiceError::Unprocessable`] carrying every violation, and `save` is never reached.
//! Reads never validate.
//!
//! ## Update vs. Patch
//! `update` is *not* a merge. It rebuilds the record from the supplied partial input
//! exactly like `create` does, so every field left out of the input falls back to the
//! type's default, even if the stored record held something else. This is intentional
//! and kept as observed; callers that want "change only these fields" must use `patch`,
//! which loads the stored record and overwrites only the supplied fields.
//!
//! ## Concurrency
//! The service holds no locks and no state of its own. `patch` is a read-modify-write
//! across two separate backend calls, so two concurrent patches of one record race and
//! the last save wins.

use crate::error::ServiceError;
use crate::ports::{DeleteResult, Filter, FindOneOptions, PersistencePort, ValidationPort};
use crate::record::{entity_name, Record};
use crate::violation::ValidatorOptions;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Uniform CRUD operations for records of type `T`.
///
/// ```rust
/// use crud_framework::{record, CrudService, StoreActor, ValidationPort, ValidatorOptions, Violation};
/// use async_trait::async_trait;
/// use std::convert::Infallible;
/// use std::sync::Arc;
///
/// record! {
///     pub struct Tag {
///         id: u64,
///         pub label: String,
///     }
/// }
///
/// struct LabelRequired;
///
/// #[async_trait]
/// impl ValidationPort<Tag> for LabelRequired {
///     type Error = Infallible;
///     async fn validate(&self, tag: &Tag, _: &ValidatorOptions) -> Result<Vec<Violation>, Infallible> {
///         if tag.label.is_empty() {
///             return Ok(vec![Violation::new("label").with_constraint("isNotEmpty", "label should not be empty")]);
///         }
///         Ok(vec![])
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, store) = StoreActor::<Tag>::new(10);
///     tokio::spawn(actor.run());
///
///     let tags = CrudService::new(store, LabelRequired, Arc::new(ValidatorOptions::default()));
///     let tag = tags.create(TagPartial { label: Some("rust".into()), ..Default::default() }).await.unwrap();
///     assert_eq!(tag.id, Some(1));
///
///     let rejected = tags.create(TagPartial::default()).await.unwrap_err();
///     assert_eq!(rejected.violations().unwrap().len(), 1);
/// }
/// ```
pub struct CrudService<T, P, V>
where
    T: Record,
    P: PersistencePort<T>,
    V: ValidationPort<T>,
{
    store: P,
    validator: V,
    options: Arc<ValidatorOptions>,
    _record: PhantomData<fn() -> T>,
}

impl<T, P, V> CrudService<T, P, V>
where
    T: Record,
    P: PersistencePort<T>,
    V: ValidationPort<T>,
{
    pub fn new(store: P, validator: V, options: Arc<ValidatorOptions>) -> Self {
        Self {
            store,
            validator,
            options,
            _record: PhantomData,
        }
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Every persisted record, in whatever order the backend returns them.
    #[instrument(skip(self), fields(entity = entity_name::<T>()))]
    pub async fn find_all(&self) -> Result<Vec<T>, ServiceError> {
        let records = self.store.find_all().await.map_err(ServiceError::backend)?;
        debug!(count = records.len(), "Listed");
        Ok(records)
    }

    /// The record with identifier `id`, or `NotFound`.
    #[instrument(skip(self), fields(entity = entity_name::<T>()))]
    pub async fn find_one_by_id(&self, id: T::Id) -> Result<T, ServiceError> {
        self.store.find_one_or_fail(id).await
    }

    /// The first record matching `filter`, if any. A miss is `Ok(None)`, not an error.
    #[instrument(skip(self, filter), fields(entity = entity_name::<T>()))]
    pub async fn find_one(
        &self,
        filter: Option<Filter<T>>,
        options: Option<FindOneOptions<T>>,
    ) -> Result<Option<T>, ServiceError> {
        self.store
            .find_one(filter, options)
            .await
            .map_err(ServiceError::backend)
    }

    /// Builds a record from `data` over the type's defaults, validates it and saves it.
    /// If `data` carries an identifier the save overwrites that record.
    #[instrument(skip(self), fields(entity = entity_name::<T>()))]
    pub async fn create(&self, data: T::Partial) -> Result<T, ServiceError> {
        let record = self.store.build(data);
        self.validate(&record).await?;
        let saved = self.store.save(record).await.map_err(ServiceError::backend)?;
        if let Some(id) = saved.id() {
            info!(%id, "Saved");
        }
        Ok(saved)
    }

    /// Same as [`create`](Self::create). Omitted fields are reset to their defaults;
    /// nothing is merged from the stored record.
    #[instrument(skip(self), fields(entity = entity_name::<T>()))]
    pub async fn update(&self, data: T::Partial) -> Result<T, ServiceError> {
        self.create(data).await
    }

    /// Loads record `id`, overwrites the fields supplied in `data`, validates and saves it.
    #[instrument(skip(self), fields(entity = entity_name::<T>()))]
    pub async fn patch(&self, id: T::Id, data: T::Partial) -> Result<T, ServiceError> {
        let mut record = self.find_one_by_id(id).await?;
        record.merge(data);
        self.validate(&record).await?;
        let saved = self.store.save(record).await.map_err(ServiceError::backend)?;
        info!(%id, "Patched");
        Ok(saved)
    }

    /// Removes record `id` without checking that it exists first.
    #[instrument(skip(self), fields(entity = entity_name::<T>()))]
    pub async fn delete(&self, id: T::Id) -> Result<DeleteResult, ServiceError> {
        let result = self
            .store
            .delete_by_id(id)
            .await
            .map_err(ServiceError::backend)?;
        info!(%id, affected = result.affected, "Deleted");
        Ok(result)
    }

    async fn validate(&self, record: &T) -> Result<(), ServiceError> {
        let violations = self
            .validator
            .validate(record, &self.options)
            .await
            .map_err(ServiceError::validator)?;
        if violations.is_empty() {
            return Ok(());
        }
        warn!(violations = violations.len(), "Validation failed");
        Err(ServiceError::Unprocessable(violations))
    }
}
