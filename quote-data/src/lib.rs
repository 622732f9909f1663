//! Loads the quote form's [`RateTable`](quote_core::RateTable) from CSV.

pub mod loader;

pub use loader::{RateTableError, RateTableLoader, ServiceRateRecord};
