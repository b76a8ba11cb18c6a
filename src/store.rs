//! Item store interface and the in-memory implementation.
//!
//! The router only sees the `ItemStore` trait. Every call is a single
//! blocking operation that either returns a result or fails; timeouts and
//! retries belong to the implementation.

use crate::item::{StorageItem, ID_ATTRIBUTE};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Key-value item store addressed by the `id` attribute
pub trait ItemStore: Send + Sync {
    /// Store an item, replacing any item with the same id.
    fn put(&self, item: StorageItem) -> Result<(), StoreError>;

    /// Look up an item by id. `Ok(None)` when absent.
    fn get(&self, id: &str) -> Result<Option<StorageItem>, StoreError>;

    /// Count all stored items.
    fn count(&self) -> Result<u64, StoreError>;
}

/// Thread-safe in-memory item store
#[derive(Clone)]
pub struct MemoryItemStore {
    /// Table name (for logging only)
    table_name: String,

    /// Items keyed by id
    items: Arc<DashMap<String, StorageItem>>,
}

impl MemoryItemStore {
    /// Create a new empty store
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            items: Arc::new(DashMap::new()),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl ItemStore for MemoryItemStore {
    fn put(&self, item: StorageItem) -> Result<(), StoreError> {
        let id = item
            .get(ID_ATTRIBUTE)
            .and_then(|value| value.as_s())
            .ok_or(StoreError::MissingKey)?
            .to_string();

        debug!(table = %self.table_name, id = %id, "Put item");
        self.items.insert(id, item);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<StorageItem>, StoreError> {
        let item = self.items.get(id).map(|entry| entry.value().clone());
        debug!(table = %self.table_name, id = %id, found = item.is_some(), "Get item");
        Ok(item)
    }

    fn count(&self) -> Result<u64, StoreError> {
        Ok(self.items.len() as u64)
    }
}

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Item is missing its string key attribute 'id'.")]
    MissingKey,

    #[error("Item store failure: {0}")]
    Backend(String),
}
