//! # tripsim Similarity
//!
//! Scoring and ranking over tripsim catalogs.
//!
//! ## Features
//!
//! - **TS-SS distance**: triangle-area dissimilarity, lower is closer
//! - **TSSS similarity**: composite cosine/angle/Euclidean score, higher is closer
//! - **Ranker**: nearest neighbours, inverse-distance voting, centroid and fallback aggregation
//! - **Recommender**: the same operations addressed by catalog kind
//!
//! ## Example
//!
//! ```rust
//! use tripsim_core::{FeatureStore, RawRow};
//! use tripsim_similarity::Ranker;
//!
//! let catalog = FeatureStore::new()
//!     .build(vec![
//!         RawRow::dense("Felfela", &[4.5, 1.5]),
//!         RawRow::dense("Zooba", &[4.6, 1.2]),
//!         RawRow::dense("Sequoia", &[4.2, 4.0]),
//!     ])
//!     .unwrap();
//!
//! let ranker = Ranker::new(&catalog);
//! let similar = ranker.nearest("Felfela", 2).unwrap();
//! assert!(!similar.contains(&"Felfela".to_string()));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────>│   Catalog   │────>│   Ranker    │
//! │  (by kind)  │     │ (immutable) │     │ (per call)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                         ┌──────┴──────┐
//!                                         │ TS-SS/TSSS  │
//!                                         │  distance   │
//!                                         └─────────────┘
//! ```

pub mod distance;
pub mod rank;
pub mod recommend;

pub use distance::{ts_ss, tsss_similarity};
pub use rank::{Preferences, Ranker, Scored};
pub use recommend::{CombinedQuery, CombinedRecommendation, Recommender};
