//! # CRUD Recipe
//!
//! > **A generic record service, wired up for real.**
//!
//! This crate puts [`crud_framework`] to work: two record types, a rule-based validator,
//! TOML configuration and a lifecycle that starts and stops the in-memory stores.
//!
//! ## Module Tour
//!
//! ### 1. The Records ([`model`])
//! [`User`](model::User) and [`Product`](model::Product), declared with `record!`,
//! each next to the rules a saved instance must satisfy.
//!
//! ### 2. The Rule Engine ([`validation`])
//! [`RuleValidator`](validation::RuleValidator) implements the framework's
//! `ValidationPort` from declarative rules and honors every `ValidatorOptions` flag.
//!
//! ### 3. The Orchestrator ([`lifecycle`])
//! [`RecordSystem`](lifecycle::RecordSystem) spawns the stores, builds one service per
//! record type with the shared options, and shuts everything down.
//!
//! ### 4. Configuration & Errors ([`config`], [`error`])
//! [`AppConfig`](config::AppConfig) is loaded once at startup; [`AppError`](error::AppError)
//! covers everything outside the services themselves.
//!
//! ## Update vs. Patch
//!
//! `update` rebuilds a record from the input alone; omitted fields go back to their
//! defaults. `patch` changes only the supplied fields. This is intended behavior.
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! CRUD_RECIPE_CONFIG=strict.toml RUST_LOG=debug cargo run
//! ```

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod validation;
