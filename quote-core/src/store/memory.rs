use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::draft_store::{DraftStore, StoreError};
use super::factory::{DraftStoreFactory, StoreConfig};

/// Process-local draft storage. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry.
    pub fn with_entry(
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.into(), value.into());
        Self {
            slots: Mutex::new(slots),
        }
    }

    fn slots(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.slots
            .lock()
            .map_err(|e| StoreError::Storage(format!("draft slots poisoned: {e}")))
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn read(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self.slots()?.get(key).cloned())
    }

    async fn write(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.slots()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(
        &self,
        key: &str,
    ) -> Result<(), StoreError> {
        self.slots()?.remove(key);
        Ok(())
    }
}

/// [`DraftStoreFactory`] for the `"memory"` backend.
pub struct MemoryDraftStoreFactory;

#[async_trait]
impl DraftStoreFactory for MemoryDraftStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn DraftStore>, StoreError> {
        Ok(Box::new(MemoryDraftStore::new()))
    }
}
