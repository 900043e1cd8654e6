//! Error types and error handling

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library
pub type Result<T, E = PatternError> = std::result::Result<T, E>;

/// Scaffolding error type
#[derive(Debug, Error)]
pub enum PatternError {
    /// Name is not a usable PHP class identifier
    #[error("Invalid name '{name}': {reason}")]
    InvalidName {
        /// The rejected input
        name: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Table name is not a plain SQL identifier
    #[error("Invalid table name '{0}'")]
    InvalidTable(String),

    /// The database could not be queried for the table's columns
    #[error("Schema lookup for table '{table}' failed: {source}")]
    SchemaLookup {
        /// Table that was inspected
        table: String,
        /// Driver error
        #[source]
        source: sqlx::Error,
    },

    /// The lookup succeeded but the table has no columns (it does not exist)
    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    /// A file the generator must create already exists
    #[error("{} already exists", .0.display())]
    TargetExists(PathBuf),

    /// A provider file lost one of its insertion markers
    #[error("Marker '{marker}' not found in {}", path.display())]
    MarkerMissing {
        /// Provider file
        path: PathBuf,
        /// Missing marker text
        marker: &'static str,
    },

    /// Stub failed to parse
    #[error("Stub '{name}' is invalid: {source}")]
    StubParse {
        /// Stub file name
        name: &'static str,
        /// Parser error
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// Stub failed to render (unknown placeholder, bad helper)
    #[error("Failed to render stub '{name}': {source}")]
    StubRender {
        /// Stub file name
        name: &'static str,
        /// Render error
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// Filesystem error with the offending path
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Database connection settings are missing or unusable
    #[error("Database error: {0}")]
    Database(String),
}

impl PatternError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<figment::Error> for PatternError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
