//! Settings store persisted as a JSON object on disk

use std::{io::ErrorKind, path::PathBuf};
use async_trait::async_trait;
use serde_json::Value;
use tokio::{fs, sync::{broadcast, Mutex}};
use tracing::{debug, info};

use super::{
    merge_values, select_keys, SettingsStore, StorageChanges, StorageError, StoredValues,
};

/// Stores settings in a single JSON file.
///
/// A missing file reads as empty. Writes go to a sibling temp file first and
/// are renamed into place.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    changes_tx: broadcast::Sender<StorageChanges>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (changes_tx, _) = broadcast::channel(16);
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            changes_tx,
        }
    }

    async fn read_all(&self) -> Result<StoredValues, StorageError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Settings file {} not found, treating as empty", self.path.display());
                return Ok(StoredValues::new());
            }
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(StoredValues::new());
        }

        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(values) => Ok(values),
            other => Err(StorageError::Corrupt(format!(
                "expected a JSON object in {}, found {}",
                self.path.display(),
                json_type_name(&other)
            ))),
        }
    }

    async fn write_all(&self, values: &StoredValues) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_string_pretty(values)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, body).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    async fn get(&self, keys: &[&str]) -> Result<StoredValues, StorageError> {
        let values = self.read_all().await?;
        Ok(select_keys(&values, keys))
    }

    async fn set(&self, values: StoredValues) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut stored = self.read_all().await?;
        let changes = merge_values(&mut stored, values);
        self.write_all(&stored).await?;

        info!("Persisted {} setting(s) to {}", changes.len(), self.path.display());
        self.changes_tx.send(changes).ok();
        Ok(())
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<StorageChanges>> {
        Some(self.changes_tx.subscribe())
    }
}
