//! Error types for the extractor.
//!
//! Missing or malformed optional data never produces an error: adapters fall
//! back to documented defaults. Errors are reserved for I/O, unparsable XML,
//! unreadable classification tables and output serialization.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the extractor library.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Reading a source or table file failed.
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source file is not well-formed XML.
    #[error("XML parsing failed for {}: {source}", .path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    /// A classification table could not be read.
    #[error("Failed to load classification table '{table}': {source}")]
    Classification {
        table: String,
        #[source]
        source: csv::Error,
    },

    /// Unknown holder element encountered.
    #[error("No handler for element <{tag_name}>{}", .context.as_ref().map(|c| format!(" in {c}")).unwrap_or_default())]
    UnknownElement {
        tag_name: String,
        context: Option<String>,
    },

    /// Invalid command-line or caller input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExtractError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for extractor operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
