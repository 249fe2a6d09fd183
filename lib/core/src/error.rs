use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("None of the preferred names matched a catalog entry")]
    NoMatch,

    #[error("Unknown catalog: {0}")]
    UnknownCatalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed or inconsistent input rows, detected before a catalog is published.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Row {row} ('{name}') has {actual} numeric columns, expected {expected}")]
    InconsistentColumns {
        row: usize,
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Name column '{0}' not found")]
    MissingNameColumn(String),

    #[error("Numeric column '{0}' not found")]
    MissingColumn(String),

    #[error("Malformed record at line {line}: {message}")]
    Malformed { line: u64, message: String },
}
