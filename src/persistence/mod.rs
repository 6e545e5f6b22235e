//! Key-value persistence for settings and high scores
//!
//! Each store is one JSON blob under its own key. In the browser the blobs
//! live in LocalStorage; natively and in tests an in-memory map stands in.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::GameError;

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, GameError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), GameError>;
    fn remove(&mut self, key: &str) -> Result<(), GameError>;
}

/// Volatile store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, GameError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), GameError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    /// `None` when the page has no LocalStorage (private mode, sandboxed iframe)
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
fn storage_error(key: &str, err: wasm_bindgen::JsValue) -> GameError {
    GameError::Storage {
        key: key.to_string(),
        reason: format!("{err:?}"),
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, GameError> {
        self.storage.get_item(key).map_err(|e| storage_error(key, e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| storage_error(key, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), GameError> {
        self.storage
            .remove_item(key)
            .map_err(|e| storage_error(key, e))
    }
}

/// Decode the blob under `key`; `Ok(None)` when nothing is stored
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, GameError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), GameError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_blob_round_trip() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "k", &vec![3u32, 1, 2]).unwrap();
        let back: Option<Vec<u32>> = load_json(&store, "k").unwrap();
        assert_eq!(back, Some(vec![3, 1, 2]));
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        let value: Option<u32> = load_json(&store, "absent").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_corrupt_blob_is_serialization_error() {
        let mut store = MemoryStore::new();
        store.set("k", "{not json").unwrap();
        let result: Result<Option<u32>, _> = load_json(&store, "k");
        assert!(matches!(result, Err(GameError::Serialization(_))));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
