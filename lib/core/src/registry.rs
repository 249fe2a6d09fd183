//! Process-wide catalog registry
//!
//! Catalogs are assembled with [`RegistryBuilder`] and only become visible
//! through [`CatalogRegistry`] once every catalog has been fully built.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The recommendation domains served by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Restaurant,
    Hotel,
    Place,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 3] = [CatalogKind::Restaurant, CatalogKind::Hotel, CatalogKind::Place];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Restaurant => "restaurant",
            CatalogKind::Hotel => "hotel",
            CatalogKind::Place => "place",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = Error;

    /// Accepts singular and plural forms, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restaurant" | "restaurants" => Ok(CatalogKind::Restaurant),
            "hotel" | "hotels" => Ok(CatalogKind::Hotel),
            "place" | "places" | "tourist_places" => Ok(CatalogKind::Place),
            _ => Err(Error::UnknownCatalog(s.to_string())),
        }
    }
}

/// Read-only holder of the loaded catalogs
#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    catalogs: AHashMap<CatalogKind, Arc<Catalog>>,
}

impl CatalogRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    #[inline]
    pub fn get(&self, kind: CatalogKind) -> Result<&Catalog> {
        self.catalogs
            .get(&kind)
            .map(Arc::as_ref)
            .ok_or_else(|| Error::UnknownCatalog(kind.to_string()))
    }

    /// Registered kinds in a stable order
    #[must_use]
    pub fn kinds(&self) -> Vec<CatalogKind> {
        let mut kinds: Vec<_> = self.catalogs.keys().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    catalogs: AHashMap<CatalogKind, Arc<Catalog>>,
}

impl RegistryBuilder {
    /// Register a catalog, replacing any previous one of the same kind
    pub fn insert(mut self, kind: CatalogKind, catalog: Catalog) -> Self {
        self.catalogs.insert(kind, Arc::new(catalog));
        self
    }

    pub fn build(self) -> CatalogRegistry {
        CatalogRegistry {
            catalogs: self.catalogs,
        }
    }
}
