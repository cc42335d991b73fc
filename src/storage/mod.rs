//! Settings storage contract and its implementations
//! 
//! The engine only touches storage when loading settings at initialization and
//! when persisting an update. It never assumes a write completed synchronously.

pub mod json_file;
pub mod memory;

use std::collections::HashMap;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::broadcast;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// A key/value object as stored
pub type StoredValues = Map<String, Value>;

/// Old and new value of one key after a write
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageChange {
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// Every key touched by a single write
pub type StorageChanges = HashMap<String, StorageChange>;

/// Failures surfaced by a settings store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to (de)serialize stored settings: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("stored settings are corrupt: {0}")]
    Corrupt(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistence contract consumed by the engine
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the subset of `keys` that are present
    async fn get(&self, keys: &[&str]) -> Result<StoredValues, StorageError>;

    /// Merge `values` into the store
    async fn set(&self, values: StoredValues) -> Result<(), StorageError>;

    /// Change notifications, for stores that can provide them
    fn subscribe(&self) -> Option<broadcast::Receiver<StorageChanges>> {
        None
    }
}

/// Merge `values` into `store`, returning what changed
pub(crate) fn merge_values(store: &mut StoredValues, values: StoredValues) -> StorageChanges {
    values
        .into_iter()
        .map(|(key, value)| {
            let old_value = store.insert(key.clone(), value.clone());
            let change = StorageChange {
                old_value,
                new_value: Some(value),
            };
            (key, change)
        })
        .collect()
}

/// Pick the requested keys out of a stored object
pub(crate) fn select_keys(store: &StoredValues, keys: &[&str]) -> StoredValues {
    keys.iter()
        .filter_map(|key| store.get(*key).map(|value| (key.to_string(), value.clone())))
        .collect()
}
