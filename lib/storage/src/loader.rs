//! CSV catalog sources
//!
//! Turns a headed CSV file into [`RawRow`]s: one column holds the item name,
//! the numeric columns become features, everything else is ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};
use tripsim_core::{Catalog, CatalogKind, Error, FeatureStore, RawRow, Result, Scaling, SchemaError};

/// Where and how to load one catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    pub path: PathBuf,
    pub name_column: String,
    /// Columns never used as features, e.g. coordinates
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Explicit feature columns; discovered from the data when `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub scaling: Scaling,
}

impl SourceConfig {
    pub fn new(path: impl Into<PathBuf>, name_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name_column: name_column.into(),
            exclude: Vec::new(),
            columns: None,
            scaling: Scaling::Standard,
        }
    }

    /// Column layout of the stock data file for `kind`
    pub fn for_kind(kind: CatalogKind, path: impl Into<PathBuf>) -> Self {
        match kind {
            CatalogKind::Restaurant => Self::new(path, "name").excluding(&["lat", "lng"]),
            CatalogKind::Hotel => Self::new(path, "Name").excluding(&["Latitude", "Longitude"]),
            CatalogKind::Place => Self::new(path, "Name"),
        }
    }

    pub fn excluding(mut self, columns: &[&str]) -> Self {
        self.exclude.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_scaling(mut self, scaling: Scaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Read the file and build its catalog
    pub fn load(&self) -> Result<Catalog> {
        let source = CsvSource::load(self)?;
        info!(
            "Loaded {} rows with {} features from {:?}",
            source.rows.len(),
            source.columns.len(),
            self.path
        );
        source.into_catalog(self.scaling)
    }
}

/// Parsed contents of a CSV source
#[derive(Debug, Clone, PartialEq)]
pub struct CsvSource {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl CsvSource {
    pub fn load(config: &SourceConfig) -> Result<Self> {
        let reader = csv::Reader::from_path(&config.path).map_err(map_csv_error)?;
        Self::parse(reader, config)
    }

    pub fn from_reader<R: Read>(reader: R, config: &SourceConfig) -> Result<Self> {
        Self::parse(csv::Reader::from_reader(reader), config)
    }

    fn parse<R: Read>(mut reader: csv::Reader<R>, config: &SourceConfig) -> Result<Self> {
        let headers = reader.headers().map_err(map_csv_error)?.clone();
        let position = |column: &str| headers.iter().position(|h| h.trim() == column);

        let name_idx = position(config.name_column.as_str())
            .ok_or_else(|| SchemaError::MissingNameColumn(config.name_column.clone()))?;

        let records = reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(map_csv_error)?;

        let feature_idx: Vec<usize> = match &config.columns {
            Some(columns) => columns
                .iter()
                .map(|c| position(c.as_str()).ok_or_else(|| SchemaError::MissingColumn(c.clone())))
                .collect::<std::result::Result<_, _>>()?,
            None => {
                let excluded: HashSet<&str> = config.exclude.iter().map(String::as_str).collect();
                (0..headers.len())
                    .filter(|&idx| idx != name_idx && !excluded.contains(headers[idx].trim()))
                    .filter(|&idx| {
                        let numeric = records
                            .iter()
                            .all(|r| r.get(idx).map_or(true, |cell| parse_cell(cell).is_ok()));
                        if !numeric {
                            debug!("Ignoring non-numeric column '{}'", &headers[idx]);
                        }
                        numeric
                    })
                    .collect()
            }
        };

        let rows = records
            .iter()
            .map(|record| {
                let name = record.get(name_idx).unwrap_or_default();
                let values = feature_idx
                    .iter()
                    .map(|&idx| record.get(idx).and_then(|cell| parse_cell(cell).ok().flatten()))
                    .collect();
                RawRow::new(name, values)
            })
            .collect();

        Ok(Self {
            columns: feature_idx.iter().map(|&idx| headers[idx].trim().to_string()).collect(),
            rows,
        })
    }

    pub fn into_catalog(self, scaling: Scaling) -> Result<Catalog> {
        FeatureStore::new()
            .with_columns(self.columns)
            .with_scaling(scaling)
            .build(self.rows)
    }
}

/// Empty cells are missing; anything else must parse as a float
fn parse_cell(cell: &str) -> std::result::Result<Option<f64>, std::num::ParseFloatError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some)
}

fn map_csv_error(err: csv::Error) -> Error {
    let line = err.position().map_or(0, |p| p.line());
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => Error::Io(e),
        _ => SchemaError::Malformed { line, message }.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config() -> SourceConfig {
        SourceConfig::for_kind(CatalogKind::Restaurant, "unused.csv")
    }

    #[test]
    fn test_discovers_numeric_columns() {
        let data = "name,rating,cuisine,price,lat,lng\n\
                    Felfela,4.5,egyptian,2,30.04,31.23\n\
                    Zooba,4.6,street,,30.05,31.22\n";
        let source = CsvSource::from_reader(data.as_bytes(), &config()).unwrap();

        assert_eq!(source.columns, vec!["rating", "price"]);
        assert_eq!(source.rows[0], RawRow::new("Felfela", vec![Some(4.5), Some(2.0)]));
        assert_eq!(source.rows[1], RawRow::new("Zooba", vec![Some(4.6), None]));
    }

    #[test]
    fn test_explicit_columns() {
        let data = "Name,stars,notes\nIbis,3,n/a\nHilton,five,ok\n";
        let config = SourceConfig::new("unused.csv", "Name")
            .with_columns(vec!["stars".to_string()]);
        let source = CsvSource::from_reader(data.as_bytes(), &config).unwrap();

        assert_eq!(source.columns, vec!["stars"]);
        assert_eq!(source.rows[1].values, vec![None]);
    }

    #[test]
    fn test_missing_columns() {
        let data = "title,rating\nFelfela,4.5\n";
        assert!(matches!(
            CsvSource::from_reader(data.as_bytes(), &config()),
            Err(Error::Schema(SchemaError::MissingNameColumn(c))) if c == "name"
        ));

        let config = SourceConfig::new("unused.csv", "title").with_columns(vec!["price".to_string()]);
        assert!(matches!(
            CsvSource::from_reader(data.as_bytes(), &config),
            Err(Error::Schema(SchemaError::MissingColumn(c))) if c == "price"
        ));
    }

    #[test]
    fn test_ragged_rows_are_schema_errors() {
        let data = "name,rating,price\nFelfela,4.5,2\nZooba,4.6\n";
        assert!(matches!(
            CsvSource::from_reader(data.as_bytes(), &config()),
            Err(Error::Schema(SchemaError::Malformed { .. }))
        ));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "Name,Latitude,Longitude,stars,price").expect("write header");
        writeln!(file, "Mena House,29.98,31.13,5,300").expect("write row");
        writeln!(file, " Ibis ,30.04,31.23,3,60").expect("write row");
        writeln!(file, "Mena House,29.98,31.13,1,1").expect("write row");

        let catalog = SourceConfig::for_kind(CatalogKind::Hotel, file.path())
            .load()
            .expect("load catalog");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.columns(), &["stars".to_string(), "price".to_string()]);
        assert_eq!(catalog.get("Mena House").unwrap().raw().as_slice(), &[5.0, 300.0]);
        assert!(catalog.contains("Ibis"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let config = SourceConfig::new("/nonexistent/places.csv", "Name");
        assert!(matches!(config.load(), Err(Error::Io(_))));
    }
}
