use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::application::ports::KeyValueStore;
use crate::error::StoreError;

#[derive(Debug, Default)]
struct StoreState {
    values: HashMap<String, String>,
    read_only: bool,
}

/// Shared in-memory key-value store
///
/// Clones share the same data, so a test can keep a handle while the
/// tracker owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail, like a full `localStorage`
    pub fn set_read_only(&self, read_only: bool) {
        self.lock().read_only = read_only;
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.lock().values.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // a poisoned lock still holds consistent string data
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.read_only {
            return Err(StoreError::Write {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        state.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.read_only {
            return Err(StoreError::Write {
                key: key.to_string(),
                reason: "storage is read-only".to_string(),
            });
        }
        state.values.remove(key);
        Ok(())
    }
}
