//! # tripsim Core
//!
//! Core library for the tripsim recommendation engine.
//!
//! This crate provides the data side of the pipeline:
//!
//! - [`FeatureStore`] - Builds a [`Catalog`] from raw rows (dedup, fill, standardize)
//! - [`Catalog`] / [`Item`] - Immutable items with raw and standardized vectors
//! - [`FeatureVector`] - Dense `f64` vector helpers
//! - [`CatalogRegistry`] - Read-only lookup of catalogs by [`CatalogKind`]
//!
//! ## Example
//!
//! ```rust
//! use tripsim_core::{CatalogKind, CatalogRegistry, FeatureStore, RawRow};
//!
//! let catalog = FeatureStore::new()
//!     .build(vec![
//!         RawRow::dense("Cafe Riche", &[4.5, 120.0]),
//!         RawRow::dense("Abou Tarek", &[4.8, 40.0]),
//!     ])
//!     .unwrap();
//!
//! let registry = CatalogRegistry::builder()
//!     .insert(CatalogKind::Restaurant, catalog)
//!     .build();
//!
//! assert_eq!(registry.get(CatalogKind::Restaurant).unwrap().len(), 2);
//! ```

pub mod catalog;
pub mod error;
pub mod registry;
pub mod vector;

pub use catalog::{Catalog, ColumnStats, FeatureStore, Item, RawRow, Scaling};
pub use error::{Error, Result, SchemaError};
pub use registry::{CatalogKind, CatalogRegistry, RegistryBuilder};
pub use vector::{FeatureVector, COSINE_EPSILON};
