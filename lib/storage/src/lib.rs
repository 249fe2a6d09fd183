//! # tripsim Storage
//!
//! Loads the catalog source files and publishes them as a
//! [`CatalogRegistry`](tripsim_core::CatalogRegistry).

pub mod loader;
pub mod manager;

pub use loader::{CsvSource, SourceConfig};
pub use manager::{CatalogSources, DEFAULT_HOTEL_FILE, DEFAULT_PLACE_FILE, DEFAULT_RESTAURANT_FILE};
