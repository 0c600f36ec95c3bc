//! # CRUD Framework
//!
//! One generic service that gives any persisted record type the same seven operations:
//! `find_all`, `find_one_by_id`, `find_one`, `create`, `update`, `patch` and `delete`.
//! Storage and validation are not implemented here; they are injected as two ports.
//!
//! ## Architecture Overview
//!
//! 1. **Record Layer** ([`Record`], [`record!`]): your data type, its identifier and its
//!    partial input shape.
//! 2. **Port Layer** ([`PersistencePort`], [`ValidationPort`]): the capability sets the
//!    service needs from a storage engine and a rule engine.
//! 3. **Service Layer** ([`CrudService`]): the operation contracts and the validation
//!    gate every write goes through.
//!
//! Write a record once, pick or write the two ports, and the service is the same code
//! for every type.
//!
//! ## Data Flow
//!
//! ```text
//! caller ─▶ CrudService ─▶ ValidationPort (writes only) ─▶ PersistencePort ─▶ caller
//! ```
//!
//! ## Update vs. Patch
//!
//! `update` rebuilds the record from the supplied input, so omitted fields fall back to
//! their defaults. `patch` loads the stored record and overwrites only what was supplied.
//! The difference is deliberate; see [`service`] for details.
//!
//! ## Errors
//!
//! All operations return [`ServiceError`]: `NotFound` for a missing identifier,
//! `Unprocessable` with the full violation list for a rejected write, and `Backend` /
//! `Validator` wrapping whatever the ports raised.
//!
//! ## Batteries
//!
//! - [`store`]: an in-memory, actor-backed [`PersistencePort`].
//! - [`mock`]: a scriptable store with a call log for unit tests.
//! - [`tracing`](mod@tracing): subscriber setup.

extern crate self as crud_framework;

pub mod error;
pub mod mock;
pub mod ports;
pub mod record;
pub mod service;
pub mod store;
pub mod tracing;
pub mod violation;

pub use error::ServiceError;
pub use ports::{DeleteResult, Filter, FindOneOptions, PersistencePort, ValidationPort};
pub use record::{entity_name, Record};
pub use service::CrudService;
pub use store::{StoreActor, StoreClient, StoreError};
pub use violation::{ValidatorOptions, Violation};

#[doc(hidden)]
pub use paste as __paste;
