pub mod draft_store;
pub mod factory;
pub mod memory;

pub use draft_store::{DraftStore, StoreError};
pub use factory::{DraftStoreFactory, DraftStoreRegistry, StoreConfig};
pub use memory::{MemoryDraftStore, MemoryDraftStoreFactory};
