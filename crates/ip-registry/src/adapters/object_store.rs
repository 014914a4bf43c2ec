//! # Object Store Adapter
//!
//! In-memory implementation of the host key-value store.
//! A production host backs `ObjectStore` with its transactional state DB.

use crate::errors::StoreError;
use crate::ports::outbound::ObjectStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory object store.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryObjectStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys stored.
    pub fn len(&self) -> Result<usize, StoreError> {
        let objects = self.objects.read().map_err(|_| poisoned())?;
        Ok(objects.len())
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Snapshot of all keys, sorted.
    pub fn keys(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        let objects = self.objects.read().map_err(|_| poisoned())?;
        let mut keys: Vec<_> = objects.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("object store lock poisoned".to_string())
}

impl ObjectStore for InMemoryObjectStore {
    fn get_object(&self, key: &[u8]) -> Result<Vec<u8>, StoreError> {
        let objects = self.objects.read().map_err(|_| poisoned())?;
        objects.get(key).cloned().ok_or(StoreError::NotFound)
    }

    fn put_object(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut objects = self.objects.write().map_err(|_| poisoned())?;
        objects.insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = InMemoryObjectStore::new();
        assert_eq!(store.get_object(b"C1"), Err(StoreError::NotFound));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_put_then_get() {
        let store = InMemoryObjectStore::new();
        store.put_object(b"C1", b"first").unwrap();
        store.put_object(b"C1", b"second").unwrap();
        store.put_object(b"C2", b"").unwrap();

        assert_eq!(store.get_object(b"C1").unwrap(), b"second");
        assert_eq!(store.get_object(b"C2").unwrap(), b"");
        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(store.keys().unwrap(), vec![b"C1".to_vec(), b"C2".to_vec()]);
    }
}
