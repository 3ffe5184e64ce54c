use serde_json::Value;

use crate::storage::{self, ClientStore, HISTORY_KEY};
use crate::validator::{self, Query};

pub const MAX_HISTORY_ENTRIES: usize = 5;

/// Recent successful queries, most recent first, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    entries: Vec<Query>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted strings, dropping anything that no longer validates
    pub fn from_entries<I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut history = Self::new();

        for raw in entries {
            match validator::validate(raw.as_ref()) {
                Ok(query) => {
                    if !history.entries.contains(&query) {
                        history.entries.push(query);
                    }
                }
                Err(e) => tracing::warn!("Dropping history entry {:?}: {e}", raw.as_ref()),
            }
        }

        history.entries.truncate(MAX_HISTORY_ENTRIES);
        history
    }

    pub fn load<S: ClientStore + ?Sized>(store: &S) -> Self {
        storage::load_record::<Vec<String>, _>(store, HISTORY_KEY)
            .map(Self::from_entries)
            .unwrap_or_default()
    }

    /// Put `query` in front, removing an older copy, and keep the newest five
    pub fn add(&mut self, query: Query) {
        self.entries.retain(|q| *q != query);
        self.entries.insert(0, query);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
    }

    pub fn all(&self) -> &[Query] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_record(&self) -> Value {
        Value::Array(
            self.entries
                .iter()
                .map(|q| Value::String(q.as_str().to_string()))
                .collect(),
        )
    }
}
