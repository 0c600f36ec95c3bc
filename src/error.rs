//! Error types for the application layer.

use crud_framework::ServiceError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring, running or shutting down the record system.
#[derive(Debug, Error)]
pub enum AppError {
    /// The configuration file could not be read.
    #[error("Failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`AppConfig`](crate::config::AppConfig).
    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration parsed but holds an unusable value.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A validation rule declared an invalid pattern.
    #[error("Invalid validation rule: {0}")]
    Rule(#[from] regex::Error),

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A store task panicked or was cancelled.
    #[error("Store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
