//! # tripsim
//!
//! Content-based recommendations for restaurants, hotels and tourist places.
//!
//! Items are described by numeric feature vectors. tripsim standardizes each
//! catalog once at load time and ranks items by TS-SS distance or TSSS
//! similarity, either against one query item or against a set of preferred
//! items.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! tripsim --data-dir ./data --http-port 5000
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use std::sync::Arc;
//! use tripsim::prelude::*;
//!
//! let hotels = FeatureStore::new()
//!     .build(vec![
//!         RawRow::dense("Mena House", &[5.0, 300.0]),
//!         RawRow::dense("Steigenberger", &[4.5, 180.0]),
//!         RawRow::dense("Ibis", &[3.0, 60.0]),
//!     ])
//!     .unwrap();
//!
//! let registry = CatalogRegistry::builder()
//!     .insert(CatalogKind::Hotel, hotels)
//!     .build();
//! let recommender = Recommender::new(Arc::new(registry));
//!
//! let similar = recommender
//!     .nearest_neighbors(CatalogKind::Hotel, "Mena House", 1)
//!     .unwrap();
//! assert_eq!(similar, vec!["Steigenberger"]);
//! ```
//!
//! ## Crate Structure
//!
//! - `tripsim-core` - Catalogs, standardization, registry, errors
//! - `tripsim-similarity` - TS-SS / TSSS scores, ranking, recommender
//! - `tripsim-storage` - CSV sources and registry loading
//! - `tripsim-api` - REST API

// Re-export core types
pub use tripsim_core::{
    Catalog, CatalogKind, CatalogRegistry, Error, FeatureStore, FeatureVector, Item, RawRow,
    Result, Scaling, SchemaError,
};

// Re-export similarity
pub use tripsim_similarity::{
    ts_ss, tsss_similarity, CombinedQuery, CombinedRecommendation, Ranker, Recommender,
};

// Re-export storage
pub use tripsim_storage::{CatalogSources, SourceConfig};

// Re-export API
pub use tripsim_api::{RecommendLimits, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, CatalogKind, CatalogRegistry, CatalogSources, CombinedQuery, Error,
        FeatureStore, RawRow, Ranker, RecommendLimits, Recommender, RestApi, Result, Scaling,
        SourceConfig,
    };
}
