use std::collections::HashMap;
use std::sync::Mutex;

use super::KeyValueStore;
use crate::error::DatabaseError;

/// Process-local key-value store. Nothing survives the process; used as a
/// test double and for throwaway timers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let values = self.values.lock().map_err(|_| DatabaseError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let mut values = self.values.lock().map_err(|_| DatabaseError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
