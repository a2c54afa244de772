use super::{KeyValueStore, validate_key};
use crate::error::StoreError;
use ahash::AHashMap;
use std::sync::RwLock;

/// In-process store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<AHashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_last_write_wins() {
        let store = MemoryStore::new();
        store.set_raw("patientActiveTab", "\"trials\"").unwrap();
        store.set_raw("patientActiveTab", "\"experts\"").unwrap();
        check!(store.get_raw("patientActiveTab").unwrap().as_deref() == Some("\"experts\""));
    }

    #[test]
    fn test_keys_sorted_and_remove() {
        let store = MemoryStore::new();
        store.set_raw("b", "1").unwrap();
        store.set_raw("a", "2").unwrap();
        check!(store.keys().unwrap() == vec!["a".to_string(), "b".to_string()]);

        store.remove("a").unwrap();
        store.remove("never-set").unwrap();
        check!(store.keys().unwrap() == vec!["b".to_string()]);
    }
}
