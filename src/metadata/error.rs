//! Metadata source error types.

use thiserror::Error;

/// Result type for metadata source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors raised by a metadata source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Could not open a connection to the catalog.
    #[error("failed to connect: {0}")]
    Connect(String),

    /// A catalog query failed.
    #[error("catalog query `{query}` failed: {message}")]
    Query {
        /// The logical query that failed (e.g. "columns").
        query: String,
        message: String,
    },

    /// SQLite driver error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A row lacks a field the crawl cannot do without.
    #[error("catalog row is missing required field {0}")]
    MissingField(String),

    /// A field is present but its value cannot be read as the expected type.
    #[error("catalog field {field} has invalid value {value:?}")]
    InvalidField { field: String, value: String },
}

impl SourceError {
    pub fn query(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            query: query.into(),
            message: message.into(),
        }
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect(_))
    }
}
