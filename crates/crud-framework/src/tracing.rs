//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `fmt` subscriber filtered by `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Service operations**: one span per call (`find_all`, `create`, `patch`, ...) with an
//!   `entity` field; rejected validation gates log the violation count at `warn`.
//! - **Store lifecycle**: startup, shutdown and final size, keyed by `entity_type`.
//! - **Store requests**: every request at `debug`, saves and deletes at `info`,
//!   constraint failures at `warn`.
//!
//! ```bash
//! RUST_LOG=info cargo run     # saves, patches, deletes
//! RUST_LOG=debug cargo run    # plus every request and its payload
//! RUST_LOG=crud_framework=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a create followed by a patch reads:
//!
//! ```text
//! INFO create{entity="User" data=UserPartial { .. }}: Saved id=1
//! INFO Saved entity_type="User" id=1 size=1
//! INFO patch{entity="User" id=1 data=UserPartial { .. }}: Patched id=1
//! ```

/// Initializes the global subscriber. Call once, at process start.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity / entity_type fields identify the source
        .compact()
        .init();
}
