use async_trait::async_trait;
use quote_core::store::{DraftStore, DraftStoreFactory, StoreConfig, StoreError};
use tracing::info;

use crate::repository::SqliteDraftStore;

/// [`DraftStoreFactory`] for SQLite.
///
/// Register this with a [`quote_core::store::DraftStoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use quote_core::store::DraftStoreRegistry;
/// use quote_store_sqlite::SqliteDraftStoreFactory;
///
/// let mut registry = DraftStoreRegistry::new();
/// registry.register(Box::new(SqliteDraftStoreFactory));
/// ```
pub struct SqliteDraftStoreFactory;

#[async_trait]
impl DraftStoreFactory for SqliteDraftStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and bring
    /// its schema up to date.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"quote-drafts.db"`. The file is created if
    ///   it does not exist.
    /// * `":memory:"` for an ephemeral database that lives as long as the
    ///   store.
    /// * A full sqlx URL starting with `sqlite:`.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn DraftStore>, StoreError> {
        let store = SqliteDraftStore::new(&config.connection_string)
            .await
            .map_err(|e| StoreError::Connection(format!("{e:#}")))?;
        store
            .run_migrations()
            .await
            .map_err(|e| StoreError::Storage(format!("{e:#}")))?;
        info!(connection = %config.connection_string, "sqlite draft store ready");
        Ok(Box::new(store))
    }
}
