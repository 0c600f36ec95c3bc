//! # In-Memory Store
//!
//! A runnable [`PersistencePort`](crate::PersistencePort) built on the actor model: one
//! [`StoreActor`] task per record type owns the records, and any number of cloned
//! [`StoreClient`]s talk to it over a Tokio channel.
//!
//! ## Concurrency Model
//! The actor processes one request at a time, so the `BTreeMap` it owns needs no lock.
//! Consistency is per request only: a caller that reads and then saves (as `patch` does)
//! can interleave with other callers between the two requests.
//!
//! ## Shutdown
//! When the last client is dropped the channel closes, the actor logs its final size
//! and `run()` returns.

mod actor;
mod client;
mod error;
mod message;

pub use actor::StoreActor;
pub use client::StoreClient;
pub use error::StoreError;
pub use message::{Response, StoreRequest};
