//! Registry-level recommendation operations
//!
//! [`Recommender`] selects a catalog by [`CatalogKind`] and delegates to a
//! [`Ranker`]. It holds the registry behind an `Arc` so request handlers can
//! share one instance.

use crate::rank::Ranker;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use tripsim_core::{CatalogKind, CatalogRegistry, Result};

/// Preference lists for the combined multi-catalog query
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombinedQuery {
    #[serde(default)]
    pub hotels: Vec<String>,
    #[serde(default)]
    pub restaurants: Vec<String>,
    #[serde(default)]
    pub tourist_places: Vec<String>,
}

/// Per-catalog results of a [`CombinedQuery`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombinedRecommendation {
    pub hotels: Vec<String>,
    pub restaurants: Vec<String>,
    pub tourist_places: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Recommender {
    registry: Arc<CatalogRegistry>,
}

impl Recommender {
    pub fn new(registry: Arc<CatalogRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CatalogRegistry {
        &self.registry
    }

    fn ranker(&self, kind: CatalogKind) -> Result<Ranker<'_>> {
        self.registry.get(kind).map(Ranker::new)
    }

    /// First `limit` names of a catalog, in catalog order
    pub fn list_items(&self, kind: CatalogKind, limit: usize) -> Result<Vec<String>> {
        Ok(self.ranker(kind)?.list(limit))
    }

    pub fn nearest_neighbors(&self, kind: CatalogKind, name: &str, k: usize) -> Result<Vec<String>> {
        debug!("nearest: kind={} name={:?} k={}", kind, name, k);
        self.ranker(kind)?.nearest(name, k)
    }

    pub fn aggregate_by_voting<S: AsRef<str>>(
        &self,
        kind: CatalogKind,
        names: &[S],
        k: usize,
    ) -> Result<Vec<String>> {
        debug!("voting: kind={} preferences={} k={}", kind, names.len(), k);
        self.ranker(kind)?.vote(names, k)
    }

    pub fn aggregate_by_centroid<S: AsRef<str>>(
        &self,
        kind: CatalogKind,
        names: &[S],
        k: usize,
    ) -> Result<Vec<String>> {
        debug!("centroid: kind={} preferences={} k={}", kind, names.len(), k);
        self.ranker(kind)?.centroid(names, k)
    }

    /// Only fails when `kind` is not registered
    pub fn aggregate_with_fallback<S: AsRef<str>>(
        &self,
        kind: CatalogKind,
        names: &[S],
        k: usize,
    ) -> Result<Vec<String>> {
        debug!("fallback: kind={} preferences={} k={}", kind, names.len(), k);
        Ok(self.ranker(kind)?.fallback(names, k))
    }

    /// Fallback aggregation over hotels, restaurants and places at once
    pub fn combined(&self, query: &CombinedQuery, k: usize) -> Result<CombinedRecommendation> {
        Ok(CombinedRecommendation {
            hotels: self.aggregate_with_fallback(CatalogKind::Hotel, &query.hotels, k)?,
            restaurants: self.aggregate_with_fallback(CatalogKind::Restaurant, &query.restaurants, k)?,
            tourist_places: self.aggregate_with_fallback(CatalogKind::Place, &query.tourist_places, k)?,
        })
    }
}
