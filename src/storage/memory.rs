//! In-memory settings store

use std::sync::Mutex;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use super::{
    merge_values, select_keys, SettingsStore, StorageChanges, StorageError, StoredValues,
};

/// Settings store that lives only as long as the process
#[derive(Debug)]
pub struct MemoryStore {
    values: Mutex<StoredValues>,
    changes_tx: broadcast::Sender<StorageChanges>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_values(StoredValues::new())
    }

    /// Create a store pre-populated with `values`
    pub fn with_values(values: StoredValues) -> Self {
        let (changes_tx, _) = broadcast::channel(16);
        Self {
            values: Mutex::new(values),
            changes_tx,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<StoredValues, StorageError> {
        let values = self.values.lock()
            .map_err(|e| StorageError::Unavailable(format!("Failed to lock memory store: {}", e)))?;
        Ok(select_keys(&values, keys))
    }

    async fn set(&self, values: StoredValues) -> Result<(), StorageError> {
        let changes = {
            let mut stored = self.values.lock()
                .map_err(|e| StorageError::Unavailable(format!("Failed to lock memory store: {}", e)))?;
            merge_values(&mut stored, values)
        };

        debug!("Memory store updated keys: {:?}", changes.keys().collect::<Vec<_>>());
        // No receivers is fine
        self.changes_tx.send(changes).ok();
        Ok(())
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<StorageChanges>> {
        Some(self.changes_tx.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn get_returns_only_present_keys() {
        let store = MemoryStore::new();
        let mut values = StoredValues::new();
        values.insert("totalTime".into(), json!(10));
        store.set(values).await.unwrap();

        let got = store.get(&["totalTime", "participants"]).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got["totalTime"], json!(10));
    }

    #[tokio::test]
    async fn set_reports_old_and_new_values() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe().unwrap();

        let mut first = StoredValues::new();
        first.insert("hostUrl".into(), json!("a.example"));
        store.set(first).await.unwrap();
        let changes = rx.recv().await.unwrap();
        assert_eq!(changes["hostUrl"].old_value, None);

        let mut second = StoredValues::new();
        second.insert("hostUrl".into(), json!("b.example"));
        store.set(second).await.unwrap();
        let changes = rx.recv().await.unwrap();
        assert_eq!(changes["hostUrl"].old_value, Some(json!("a.example")));
        assert_eq!(changes["hostUrl"].new_value, Some(json!("b.example")));
    }
}
