pub mod config;
pub mod quote;
pub mod sessions;
pub mod settings;
pub mod stats;
pub mod timer;

use circura_core::{Config, CoreError, Database, SessionStore};

/// Open the session store at the configured database path.
pub fn open_store(config: &Config) -> Result<SessionStore, CoreError> {
    let path = config.database_path()?;
    Ok(SessionStore::new(Database::open_at(path)?))
}
