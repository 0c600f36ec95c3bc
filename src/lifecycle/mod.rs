//! # System Lifecycle
//!
//! [`RecordSystem`] is the composition root: it starts one store actor per record type,
//! wires each into a `CrudService` with its rule set and the shared validator options,
//! and tears everything down again.
//!
//! ## Startup
//!
//! 1. **Options**: the `validator` table of [`AppConfig`](crate::config::AppConfig) is
//!    moved into an `Arc` once and shared by every service.
//! 2. **Stores**: a `StoreActor` per type is created with its unique constraints and
//!    spawned onto the current Tokio runtime.
//! 3. **Services**: each store client is paired with its validator.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all services**: this drops every store client and closes the channels.
//! 2. **Stores detect closure**: `recv()` returns `None` and each actor logs its final size.
//! 3. **Await completion**: every actor task is joined, even after one fails; the first
//!    failure is returned once all have finished.
//!
//! Clones of a service's store client held elsewhere keep that store alive; drop them
//! before calling `shutdown`.

mod record_system;

pub use record_system::*;
