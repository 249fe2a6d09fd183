//! Feature catalogs
//!
//! A [`Catalog`] is built once by [`FeatureStore::build`] from raw rows and is
//! never mutated afterwards. Rankers only read from it and keep their scores
//! in request-scoped buffers.

use crate::error::{Result, SchemaError};
use crate::vector::FeatureVector;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One input row: an item name and its numeric cells.
///
/// `None` marks a missing or non-numeric cell and is read as 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl RawRow {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Row with every cell present
    pub fn dense(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().copied().map(Some).collect())
    }
}

/// How raw columns are turned into the vectors used for ranking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scaling {
    /// `(raw - mean) / std_dev` per column; zero-variance columns divide by 1
    #[default]
    Standard,
    /// Vectors are used as loaded
    Identity,
}

/// Per-column statistics computed once over all catalog rows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ColumnStats {
    pub mean: Vec<f64>,
    /// Population standard deviation
    pub std_dev: Vec<f64>,
}

impl ColumnStats {
    fn compute(matrix: &[Vec<f64>], dim: usize) -> Self {
        let mut mean = vec![0.0; dim];
        let mut std_dev = vec![0.0; dim];

        if matrix.is_empty() {
            return Self { mean, std_dev };
        }

        let n = matrix.len() as f64;
        for row in matrix {
            for (acc, x) in mean.iter_mut().zip(row.iter()) {
                *acc += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        for row in matrix {
            for ((acc, x), m) in std_dev.iter_mut().zip(row.iter()).zip(mean.iter()) {
                *acc += (x - m) * (x - m);
            }
        }
        for s in &mut std_dev {
            *s = (*s / n).sqrt();
        }

        Self { mean, std_dev }
    }

    /// Divisor applied to each column. A column counts as constant when its
    /// variance is within rounding error of zero relative to its mean; it then
    /// divides by 1.0 so its standardized values collapse to 0.
    fn divisors(&self, rows: usize) -> Vec<f64> {
        let n = rows as f64;
        self.mean
            .iter()
            .zip(self.std_dev.iter())
            .map(|(&mean, &sd)| {
                let var = sd * sd;
                let bound = n * f64::EPSILON * var + (n * mean * f64::EPSILON).powi(2);
                if var <= bound {
                    1.0
                } else {
                    sd
                }
            })
            .collect()
    }
}

/// A catalog entry
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Item {
    name: String,
    raw: FeatureVector,
    standardized: FeatureVector,
}

impl Item {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Features as loaded, missing cells filled with 0.0
    pub fn raw(&self) -> &FeatureVector {
        &self.raw
    }

    pub fn standardized(&self) -> &FeatureVector {
        &self.standardized
    }
}

/// Immutable set of items for one domain
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    name_index: AHashMap<String, usize>,
    feature_dim: usize,
    columns: Vec<String>,
    stats: ColumnStats,
    scaling: Scaling,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn feature_dim(&self) -> usize {
        self.feature_dim
    }

    /// Column names, empty when the rows were supplied without a header
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn stats(&self) -> &ColumnStats {
        &self.stats
    }

    pub fn scaling(&self) -> Scaling {
        self.scaling
    }

    /// Items in first-seen order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Position of `name` in catalog order
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_index.get(name.trim()).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.index_of(name).map(|idx| &self.items[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|item| item.name.as_str())
    }

    /// First `limit` names in catalog order
    pub fn list(&self, limit: usize) -> Vec<String> {
        self.names().take(limit).map(str::to_string).collect()
    }
}

/// Builds catalogs from raw rows
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    columns: Option<Vec<String>>,
    scaling: Scaling,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the column set up front; rows must carry exactly these columns.
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_scaling(mut self, scaling: Scaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Build an immutable catalog.
    ///
    /// Names are trimmed and deduplicated (first occurrence wins). Every row,
    /// duplicates included, must have the same number of cells, otherwise the
    /// whole build fails with [`SchemaError::InconsistentColumns`].
    pub fn build<I>(&self, rows: I) -> Result<Catalog>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut expected = self.columns.as_ref().map(Vec::len);
        let mut names = Vec::new();
        let mut matrix: Vec<Vec<f64>> = Vec::new();
        let mut name_index = AHashMap::new();

        for (row_idx, row) in rows.into_iter().enumerate() {
            let name = row.name.trim();

            let dim = *expected.get_or_insert(row.values.len());
            if row.values.len() != dim {
                return Err(SchemaError::InconsistentColumns {
                    row: row_idx,
                    name: name.to_string(),
                    expected: dim,
                    actual: row.values.len(),
                }
                .into());
            }

            if name.is_empty() {
                warn!("Skipping row {} with blank name", row_idx);
                continue;
            }
            if name_index.contains_key(name) {
                debug!("Dropping duplicate row {} for '{}'", row_idx, name);
                continue;
            }

            name_index.insert(name.to_string(), names.len());
            names.push(name.to_string());
            matrix.push(
                row.values
                    .iter()
                    .map(|cell| cell.filter(|v| v.is_finite()).unwrap_or(0.0))
                    .collect(),
            );
        }

        let feature_dim = expected.unwrap_or(0);
        let stats = ColumnStats::compute(&matrix, feature_dim);
        let divisors = stats.divisors(matrix.len());

        let items = names
            .into_iter()
            .zip(matrix)
            .map(|(name, raw)| {
                let standardized = match self.scaling {
                    Scaling::Standard => raw
                        .iter()
                        .enumerate()
                        .map(|(col, x)| (x - stats.mean[col]) / divisors[col])
                        .collect(),
                    Scaling::Identity => raw.clone(),
                };
                Item {
                    name,
                    raw: FeatureVector::new(raw),
                    standardized: FeatureVector::new(standardized),
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "Built catalog: {} items, {} features, {:?} scaling",
            items.len(),
            feature_dim,
            self.scaling
        );

        Ok(Catalog {
            items,
            name_index,
            feature_dim,
            columns: self.columns.clone().unwrap_or_default(),
            stats,
            scaling: self.scaling,
        })
    }
}
