use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Client-side key-value slot storage.
///
/// Values are opaque strings; callers own the encoding. Writes always
/// replace the previous value (last write wins) and removing a missing key
/// is not an error.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn read(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError>;

    async fn write(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError>;

    async fn remove(
        &self,
        key: &str,
    ) -> Result<(), StoreError>;
}
