//! Client-held records.
//!
//! History and quota live with the client, not with the backend. Each record
//! is a JSON value under its own key, and a commit writes a batch of records
//! as one unit so a lookup never persists one without the other.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;

pub const HISTORY_KEY: &str = "lexilens-history";
pub const QUOTA_KEY: &str = "lexilens-quota";
pub const CLIENT_KEY: &str = "lexilens-client";

pub trait ClientStore: Send + Sync {
    /// Read one record; `None` when it was never written
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write every record in the batch, or none of them
    fn commit(&mut self, records: Vec<(&str, Value)>) -> Result<(), StoreError>;

    fn remove(&mut self, keys: &[&str]) -> Result<(), StoreError>;
}

/// Load and decode a record, treating unreadable or corrupt data as absent
pub fn load_record<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: ClientStore + ?Sized,
{
    let value = match store.load(key) {
        Ok(value) => value?,
        Err(e) => {
            tracing::warn!("Failed to read record {key}: {e}");
            return None;
        }
    };

    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!("Ignoring corrupt record {key}: {e}");
            None
        }
    }
}

/// Identifier of this client instance, created on first use
pub fn client_id<S: ClientStore + ?Sized>(store: &mut S) -> Result<Uuid, StoreError> {
    if let Some(id) = load_record::<Uuid, _>(store, CLIENT_KEY) {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    store.commit(vec![(CLIENT_KEY, serde_json::to_value(id)?)])?;
    tracing::info!("Registered new client {id}");
    Ok(id)
}

/// In-process store for tests and throwaway sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn commit(&mut self, records: Vec<(&str, Value)>) -> Result<(), StoreError> {
        for (key, value) in records {
            self.records.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn remove(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        for key in keys {
            self.records.remove(*key);
        }
        Ok(())
    }
}

/// All records of one client in a single JSON document.
///
/// Writes go to a sibling temp file that is renamed over the document, so a
/// crash mid-commit leaves the previous state intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    records: BTreeMap<String, Value>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let records = if path.exists() {
            let data = fs::read_to_string(&path)?;
            match serde_json::from_str(&data) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("Client state at {} is corrupt, starting fresh: {e}", path.display());
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, records })
    }

    fn write(&self, records: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(records)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ClientStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn commit(&mut self, records: Vec<(&str, Value)>) -> Result<(), StoreError> {
        let mut next = self.records.clone();
        for (key, value) in records {
            next.insert(key.to_string(), value);
        }

        self.write(&next)?;
        self.records = next;
        Ok(())
    }

    fn remove(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        let mut next = self.records.clone();
        for key in keys {
            next.remove(*key);
        }

        self.write(&next)?;
        self.records = next;
        Ok(())
    }
}
