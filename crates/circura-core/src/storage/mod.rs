mod config;
pub mod database;
mod memory;
mod session_store;

pub use config::{Config, LoggingConfig, QuotesConfig, StorageConfig};
pub use database::Database;
pub use memory::MemoryStore;
pub use session_store::{SessionStore, DEFAULT_TIMER_LENGTH};

use std::path::PathBuf;

use crate::error::{ConfigError, DatabaseError};

/// String key-value persistence used by [`SessionStore`].
///
/// Every `set` must be durable before it returns.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError>;
}

/// Returns the directory holding the database and config file.
///
/// `CIRCURA_DATA_DIR` wins when set. Otherwise `~/.config/circura[-dev]/`,
/// with the `-dev` suffix when `CIRCURA_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("CIRCURA_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CIRCURA_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("circura-dev")
            } else {
                base_dir.join("circura")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
