//! MetadataSource trait definition.
//!
//! A metadata source is one open catalog connection. A connector opens
//! sources on demand; the crawler decides how many it needs and drops each
//! one as soon as its queries are done.

use serde::{Deserialize, Serialize};

use super::error::SourceResult;
use super::row::CatalogRow;
use crate::config::ConnectionConfig;

/// Identity of the driver behind a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInfo {
    pub name: String,
    pub version: Option<String>,
}

impl DriverInfo {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

/// Catalog queries over one open connection.
///
/// Every query returns its result stream fully materialised, in the order
/// the catalog reports it. Rows use the labels in [`super::labels`].
///
/// # Example
///
/// ```ignore
/// use sqlcrawl::metadata::{labels, MetadataSource};
///
/// fn table_names(source: &dyn MetadataSource) -> SourceResult<Vec<String>> {
///     source
///         .tables(&[labels::TYPE_TABLE])?
///         .iter()
///         .map(|row| row.require_str(labels::TABLE_NAME))
///         .collect()
/// }
/// ```
pub trait MetadataSource {
    /// Driver name and version.
    fn driver_info(&self) -> SourceResult<DriverInfo>;

    /// Catalog objects whose `TABLE_TYPE` is one of `types`.
    ///
    /// Sequence-like objects are listed with [`super::labels::TYPE_SEQUENCE`].
    fn tables(&self, types: &[&str]) -> SourceResult<Vec<CatalogRow>>;

    /// Column rows of `table`, in ordinal order.
    fn columns(&self, table: &str) -> SourceResult<Vec<CatalogRow>>;

    /// Primary-key rows of `table` (`COLUMN_NAME`, `KEY_SEQ`).
    fn primary_keys(&self, table: &str) -> SourceResult<Vec<CatalogRow>>;

    /// Foreign-key rows in other tables that reference `table`.
    fn exported_keys(&self, table: &str) -> SourceResult<Vec<CatalogRow>>;

    /// Stored procedure rows.
    fn procedures(&self) -> SourceResult<Vec<CatalogRow>>;
}

/// Opens metadata sources for a connection descriptor.
pub trait MetadataConnector {
    /// Open a new connection.
    ///
    /// Fails with [`super::SourceError::Connect`] when the catalog is
    /// unreachable. The returned source is released when dropped.
    fn connect<'a>(
        &'a self,
        config: &ConnectionConfig,
    ) -> SourceResult<Box<dyn MetadataSource + 'a>>;
}
