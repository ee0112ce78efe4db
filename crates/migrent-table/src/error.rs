//! Error types for the table engine.

use thiserror::Error;

/// Setup-time errors raised while describing a table.
///
/// Row data never produces these: missing values render as empty strings
/// and stale keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// No row identity extractor was supplied.
    #[error("table '{0}' has no row identity extractor")]
    MissingIdentity(String),

    /// Two columns or fields share a key.
    #[error("duplicate column key '{0}'")]
    DuplicateColumn(String),

    /// The table has nothing to display.
    #[error("table '{0}' has no columns")]
    NoColumns(String),
}

/// Errors raised while delivering a CSV download.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Filename is empty or carries a path component.
    #[error("invalid export filename '{0}'")]
    InvalidFilename(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
