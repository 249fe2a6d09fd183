//! Catalog ranking
//!
//! Every ranking call scores the catalog into its own `(index, score)` buffer,
//! orders it with a stable sort and reads names back out. Nothing is written
//! to the catalog, so any number of rankers can share one catalog.

use crate::distance::{ts_ss, tsss_similarity};
use ahash::AHashSet;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Reverse;
use tripsim_core::vector::l2_distance;
use tripsim_core::{Catalog, Error, FeatureVector, Item, Result, COSINE_EPSILON};

/// A request-scoped score for the item at `index` in catalog order
pub type Scored = (usize, f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Ascending,
    Descending,
}

/// Preference names resolved against one catalog
#[derive(Debug, Clone)]
pub struct Preferences {
    names: AHashSet<String>,
    resolved: Vec<usize>,
}

impl Preferences {
    /// Trim the supplied names and find the ones present in `catalog`.
    ///
    /// Repeated names count once; unknown names are dropped silently.
    pub fn resolve<S: AsRef<str>>(catalog: &Catalog, names: &[S]) -> Self {
        let mut set = AHashSet::with_capacity(names.len());
        let mut resolved = Vec::new();

        for name in names {
            let name = name.as_ref().trim();
            if !set.insert(name.to_string()) {
                continue;
            }
            if let Some(idx) = catalog.index_of(name) {
                resolved.push(idx);
            }
        }

        Self {
            names: set,
            resolved,
        }
    }

    /// Catalog indices of the names that matched, in input order
    pub fn resolved(&self) -> &[usize] {
        &self.resolved
    }

    pub fn is_unmatched(&self) -> bool {
        self.resolved.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Ranks the items of one catalog
#[derive(Debug, Clone, Copy)]
pub struct Ranker<'a> {
    catalog: &'a Catalog,
}

impl<'a> Ranker<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// First `limit` names in catalog order
    pub fn list(&self, limit: usize) -> Vec<String> {
        self.catalog.list(limit)
    }

    /// The `k` items with the lowest TS-SS distance to `name`, excluding `name`.
    ///
    /// # Errors
    /// [`Error::ItemNotFound`] when `name` is not in the catalog
    pub fn nearest(&self, name: &str, k: usize) -> Result<Vec<String>> {
        let name = name.trim();
        let query_idx = self
            .catalog
            .index_of(name)
            .ok_or_else(|| Error::ItemNotFound(name.to_string()))?;
        let query = self.catalog.items()[query_idx].standardized().as_slice();

        let mut scores = self.score_all(|item| ts_ss(query, item.standardized().as_slice()));
        sort_scores(&mut scores, Order::Ascending);

        Ok(self.take_names(&scores, k, |candidate| candidate == name))
    }

    /// Inverse-distance voting over standardized vectors.
    ///
    /// Each matched preference `j` adds `1 / (|s_j - s_i| + eps)` to item `i`;
    /// items are returned by descending total, preference names excluded.
    ///
    /// # Errors
    /// [`Error::NoMatch`] when no name resolves
    pub fn vote<S: AsRef<str>>(&self, names: &[S], k: usize) -> Result<Vec<String>> {
        let prefs = Preferences::resolve(self.catalog, names);
        if prefs.is_unmatched() {
            return Err(Error::NoMatch);
        }

        let anchors: Vec<&[f64]> = prefs
            .resolved()
            .iter()
            .map(|&j| self.catalog.items()[j].standardized().as_slice())
            .collect();

        let mut scores = self.score_all(|item| {
            let s = item.standardized().as_slice();
            anchors
                .iter()
                .map(|anchor| 1.0 / (l2_distance(anchor, s) + COSINE_EPSILON))
                .sum()
        });
        sort_scores(&mut scores, Order::Descending);

        Ok(self.take_names(&scores, k, |candidate| prefs.contains(candidate)))
    }

    /// TSSS similarity to the mean of the matched preferences' raw vectors.
    ///
    /// # Errors
    /// [`Error::NoMatch`] when no name resolves
    pub fn centroid<S: AsRef<str>>(&self, names: &[S], k: usize) -> Result<Vec<String>> {
        let prefs = Preferences::resolve(self.catalog, names);
        let centroid = self
            .mean_of(&prefs, Item::raw)
            .ok_or(Error::NoMatch)?;
        let centroid = centroid.as_slice();

        let mut scores = self.score_all(|item| tsss_similarity(centroid, item.raw().as_slice()));
        sort_scores(&mut scores, Order::Descending);

        Ok(self.take_names(&scores, k, |candidate| prefs.contains(candidate)))
    }

    /// Preference ranking that never fails.
    ///
    /// With at least one match, items are ordered by ascending TS-SS distance
    /// to the mean of the matched standardized vectors. With no match the
    /// first `k` catalog names outside the supplied set are returned.
    pub fn fallback<S: AsRef<str>>(&self, names: &[S], k: usize) -> Vec<String> {
        let prefs = Preferences::resolve(self.catalog, names);

        let Some(centroid) = self.mean_of(&prefs, Item::standardized) else {
            return self
                .catalog
                .names()
                .filter(|candidate| !prefs.contains(candidate))
                .take(k)
                .map(str::to_string)
                .collect();
        };
        let centroid = centroid.as_slice();

        let mut scores = self.score_all(|item| ts_ss(centroid, item.standardized().as_slice()));
        sort_scores(&mut scores, Order::Ascending);

        self.take_names(&scores, k, |candidate| prefs.contains(candidate))
    }

    fn mean_of(
        &self,
        prefs: &Preferences,
        features: fn(&Item) -> &FeatureVector,
    ) -> Option<FeatureVector> {
        let items = self.catalog.items();
        FeatureVector::mean_of(prefs.resolved().iter().map(|&j| features(&items[j])))
    }

    /// Score every item into a fresh buffer, in catalog order
    fn score_all<F>(&self, score: F) -> Vec<Scored>
    where
        F: Fn(&Item) -> f64 + Sync + Send,
    {
        self.catalog
            .items()
            .par_iter()
            .enumerate()
            .map(|(idx, item)| (idx, score(item)))
            .collect()
    }

    /// Walk the ordered scores, skipping excluded and repeated names
    fn take_names<P>(&self, scores: &[Scored], k: usize, excluded: P) -> Vec<String>
    where
        P: Fn(&str) -> bool,
    {
        let mut seen = AHashSet::new();
        let mut names = Vec::with_capacity(k.min(scores.len()));

        for &(idx, _) in scores {
            if names.len() >= k {
                break;
            }
            let name = self.catalog.items()[idx].name();
            if excluded(name) || !seen.insert(name) {
                continue;
            }
            names.push(name.to_string());
        }

        names
    }
}

/// Stable sort, so equal scores keep catalog order
fn sort_scores(scores: &mut [Scored], order: Order) {
    match order {
        Order::Ascending => scores.sort_by_key(|&(_, s)| OrderedFloat(s)),
        Order::Descending => scores.sort_by_key(|&(_, s)| Reverse(OrderedFloat(s))),
    }
}
