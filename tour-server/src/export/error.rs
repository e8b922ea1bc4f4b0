//! Import and export error types.

use std::path::PathBuf;

use crate::domain::DomainError;
use crate::index::IndexError;

/// Errors that abort a CSV import.
///
/// Rows inserted before the failure stay in the index.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The source file could not be opened or read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A row could not be parsed as CSV or into the expected columns
    #[error("malformed CSV at line {line}: {source}")]
    Csv { line: u64, source: ::csv::Error },

    /// A row parsed but describes an invalid place
    #[error("invalid place at line {line}: {source}")]
    InvalidRow { line: u64, source: DomainError },

    /// The index refused a row for a reason other than a duplicate id
    #[error("index rejected place at line {line}: {source}")]
    Index { line: u64, source: IndexError },
}

impl ImportError {
    /// Whether the failure came from the filesystem rather than the data.
    pub fn is_io(&self) -> bool {
        match self {
            ImportError::Io { .. } => true,
            ImportError::Csv { source, .. } => source.is_io_error(),
            ImportError::InvalidRow { .. } | ImportError::Index { .. } => false,
        }
    }
}

/// Errors from writing exports.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing the destination failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// JSON serialization of map data failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template rendering failed
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}
