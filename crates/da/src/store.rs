//! Persistence handle handed to a client at initialization.

use crate::DaError;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Basic get/set/delete storage a backend may use for checkpointing.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), DaError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), DaError>;
}

/// A key-value store shared between tasks.
pub type SharedKeyValueStore = Arc<RwLock<dyn KeyValueStore + Send + Sync>>;

/// An in-memory [KeyValueStore].
#[derive(Debug, Default, Clone)]
pub struct MemoryKeyValueStore {
    store: HashMap<Vec<u8>, Vec<u8>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a fresh store into a [SharedKeyValueStore].
    pub fn shared() -> SharedKeyValueStore {
        Arc::new(RwLock::new(Self::new()))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.store.get(key).cloned()
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), DaError> {
        self.store.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), DaError> {
        self.store.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryKeyValueStore::new();
        assert!(store.get(b"a").is_none());
        store.set(b"a".to_vec(), b"1".to_vec()).unwrap();
        store.set(b"a".to_vec(), b"2".to_vec()).unwrap();
        assert_eq!(store.get(b"a"), Some(b"2".to_vec()));
        store.delete(b"a").unwrap();
        store.delete(b"missing").unwrap();
        assert!(store.get(b"a").is_none());
    }

    #[tokio::test]
    async fn test_shared_store() {
        let shared = MemoryKeyValueStore::shared();
        shared
            .write()
            .await
            .set(b"k".to_vec(), b"v".to_vec())
            .unwrap();
        assert_eq!(shared.read().await.get(b"k"), Some(b"v".to_vec()));
    }
}
