pub mod factory;
pub mod repository;

pub use factory::SqliteDraftStoreFactory;
pub use repository::{SqliteDraftStore, database_url};
