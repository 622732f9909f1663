//! Choosing where the draft slot lives.
//!
//! The front end registers every backend it links against, then opens the
//! one named in its configuration. The wizard only ever sees the resulting
//! `Box<dyn DraftStore>`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use super::draft_store::{DraftStore, StoreError};

/// Which backend holds the draft slot, and how to reach it.
///
/// `connection_string` is read by the selected backend alone: a database
/// file or `:memory:` for `sqlite`, nothing for `memory`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// Opens draft stores of one kind.
#[async_trait]
pub trait DraftStoreFactory: Send + Sync {
    /// Name used as `StoreConfig::backend`.
    fn backend_name(&self) -> &'static str;

    /// Opens the slot storage, creating it when missing.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn DraftStore>, StoreError>;
}

/// Draft store backends known to the binary, by name.
#[derive(Default)]
pub struct DraftStoreRegistry {
    backends: BTreeMap<&'static str, Box<dyn DraftStoreFactory>>,
}

impl DraftStoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `factory`. A later registration under the same name wins.
    pub fn register(
        &mut self,
        factory: Box<dyn DraftStoreFactory>,
    ) {
        self.backends.insert(factory.backend_name(), factory);
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        self.backends.keys().copied().collect()
    }

    /// Opens the draft store named by `config.backend`.
    ///
    /// An unregistered name is a [`StoreError::Configuration`] listing the
    /// names that would have worked. Backend failures pass through as-is.
    pub async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn DraftStore>, StoreError> {
        let Some(factory) = self.backends.get(config.backend.as_str()) else {
            return Err(StoreError::Configuration(format!(
                "no draft store backend named '{}' (registered: {})",
                config.backend,
                self.available_backends().join(", ")
            )));
        };
        factory.create(config).await
    }
}
