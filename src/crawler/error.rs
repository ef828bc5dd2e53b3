//! Crawl error types.

use std::fmt;
use thiserror::Error;

use crate::metadata::SourceError;

/// Result type for crawl operations.
pub type CrawlResult<T> = Result<T, CrawlError>;

/// The crawl step a failure happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    DriverInfo,
    Sequences,
    Tables,
    Columns(String),
    PrimaryKeys(String),
    ExportedKeys(String),
    Procedures,
}

impl Stage {
    /// The table being resolved, for per-table stages.
    pub fn table(&self) -> Option<&str> {
        match self {
            Stage::Columns(t) | Stage::PrimaryKeys(t) | Stage::ExportedKeys(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::DriverInfo => write!(f, "reading driver info"),
            Stage::Sequences => write!(f, "listing sequences"),
            Stage::Tables => write!(f, "listing tables"),
            Stage::Columns(t) => write!(f, "reading columns of table `{}`", t),
            Stage::PrimaryKeys(t) => write!(f, "reading primary keys of table `{}`", t),
            Stage::ExportedKeys(t) => write!(f, "reading exported keys of table `{}`", t),
            Stage::Procedures => write!(f, "listing procedures"),
        }
    }
}

/// Which kind of key row named the missing column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyKind {
    Primary,
    /// An incoming foreign key, with the referencing table and column.
    Exported { fk_table: String, fk_column: String },
}

/// A key row names a column the table does not have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityFault {
    pub table: String,
    pub column: String,
    pub kind: KeyKind,
}

impl fmt::Display for IntegrityFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            KeyKind::Primary => write!(
                f,
                "primary key of table `{}` names column `{}`, which the table does not have",
                self.table, self.column
            ),
            KeyKind::Exported {
                fk_table,
                fk_column,
            } => write!(
                f,
                "foreign key `{}.{}` references column `{}`, which table `{}` does not have",
                fk_table, fk_column, self.column, self.table
            ),
        }
    }
}

impl std::error::Error for IntegrityFault {}

/// Errors that abort a crawl.
///
/// There is no partial result: any of these means no schema was produced.
#[derive(Error, Debug)]
pub enum CrawlError {
    /// A connection to the catalog could not be opened.
    #[error("cannot connect to catalog: {0}")]
    Connectivity(#[source] SourceError),

    /// A catalog query failed.
    #[error("introspection failed while {stage}: {source}")]
    Introspection {
        stage: Stage,
        #[source]
        source: SourceError,
    },

    /// A key row references a column that was not reported for its table.
    #[error("integrity fault: {0}")]
    Integrity(#[from] IntegrityFault),

    /// A configured table pattern is not a valid regular expression.
    #[error("invalid table pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl CrawlError {
    pub fn introspection(stage: Stage, source: SourceError) -> Self {
        Self::Introspection { stage, source }
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }

    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }

    /// The failing stage of an introspection error.
    pub fn stage(&self) -> Option<&Stage> {
        match self {
            Self::Introspection { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

/// Tag a source error with the stage it happened in.
pub(crate) fn at(stage: Stage) -> impl FnOnce(SourceError) -> CrawlError {
    move |source| CrawlError::introspection(stage, source)
}
