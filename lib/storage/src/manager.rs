use crate::loader::SourceConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::info;
use tripsim_core::{CatalogKind, CatalogRegistry, Result};

pub const DEFAULT_RESTAURANT_FILE: &str = "cleaned_restaurant_data.csv";
pub const DEFAULT_HOTEL_FILE: &str = "Ho_Cleaned_Unique.csv";
pub const DEFAULT_PLACE_FILE: &str = "places_data_processed.csv";

/// Sources for every catalog kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSources {
    pub restaurants: SourceConfig,
    pub hotels: SourceConfig,
    pub places: SourceConfig,
}

impl CatalogSources {
    /// Stock column layouts for files located in `data_dir`
    pub fn in_dir<P: AsRef<Path>>(
        data_dir: P,
        restaurants: &str,
        hotels: &str,
        places: &str,
    ) -> Self {
        let dir = data_dir.as_ref();
        Self {
            restaurants: SourceConfig::for_kind(CatalogKind::Restaurant, dir.join(restaurants)),
            hotels: SourceConfig::for_kind(CatalogKind::Hotel, dir.join(hotels)),
            places: SourceConfig::for_kind(CatalogKind::Place, dir.join(places)),
        }
    }

    /// Stock file names in `data_dir`
    pub fn with_default_files<P: AsRef<Path>>(data_dir: P) -> Self {
        Self::in_dir(data_dir, DEFAULT_RESTAURANT_FILE, DEFAULT_HOTEL_FILE, DEFAULT_PLACE_FILE)
    }

    pub fn get(&self, kind: CatalogKind) -> &SourceConfig {
        match kind {
            CatalogKind::Restaurant => &self.restaurants,
            CatalogKind::Hotel => &self.hotels,
            CatalogKind::Place => &self.places,
        }
    }

    /// Load every catalog, then publish them together.
    ///
    /// Any failing source aborts the load, so callers never see a registry
    /// with a missing or half-built catalog.
    pub fn load_registry(&self) -> Result<CatalogRegistry> {
        let started = Instant::now();
        let mut builder = CatalogRegistry::builder();

        for kind in CatalogKind::ALL {
            let catalog = self.get(kind).load()?;
            info!(
                "Catalog '{}' ready: {} items, {} features",
                kind,
                catalog.len(),
                catalog.feature_dim()
            );
            builder = builder.insert(kind, catalog);
        }

        let registry = builder.build();
        info!("Registry published in {:?}", started.elapsed());
        Ok(registry)
    }
}
