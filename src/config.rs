//! # Configuration
//!
//! [`AppConfig`] is read once at process start, from TOML:
//!
//! ```toml
//! [validator]
//! stop_at_first_error = true
//! groups = ["catalog"]
//!
//! [store]
//! buffer_size = 64
//! ```
//!
//! Every key is optional. The file is looked up at the path in `CRUD_RECIPE_CONFIG`,
//! then at `crud-recipe.toml` in the working directory; with neither, defaults apply.
//! The `validator` table is handed to every service as-is.

use crate::error::AppError;
use crud_framework::ValidatorOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const CONFIG_ENV: &str = "CRUD_RECIPE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "crud-recipe.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub validator: ValidatorOptions,
    pub store: StoreConfig,
}

/// Settings for the in-memory store actors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Request channel capacity per store. Must be at least 1.
    pub buffer_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { buffer_size: 32 }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        let config: AppConfig = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Loads from `$CRUD_RECIPE_CONFIG`, else `./crud-recipe.toml`, else defaults.
    pub fn load() -> Result<Self, AppError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = Path::new(&path);
            info!(path = %path.display(), "Loading config");
            return Self::from_file(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            info!(path = %fallback.display(), "Loading config");
            return Self::from_file(fallback);
        }
        info!("No config file, using defaults");
        Ok(Self::default())
    }

    fn check(&self) -> Result<(), AppError> {
        if self.store.buffer_size == 0 {
            return Err(AppError::InvalidConfig(
                "store.buffer_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
