//! In-memory catalog.
//!
//! A deterministic [`MetadataConnector`] for tests and fixtures. Rows are
//! stored exactly as a driver would report them, so the crawler sees the
//! same labels, ordering and gaps it would see against a live database.
//! Queries can be made to fail, and the catalog counts the connections it
//! hands out so callers can check that every one was released.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::{SourceError, SourceResult};
use super::labels;
use super::row::{CatalogRow, Value};
use super::source::{DriverInfo, MetadataConnector, MetadataSource};
use crate::config::ConnectionConfig;

/// Kinds of catalog query, for fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    DriverInfo,
    Tables,
    Columns,
    PrimaryKeys,
    ExportedKeys,
    Procedures,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::DriverInfo => "driver_info",
            QueryKind::Tables => "tables",
            QueryKind::Columns => "columns",
            QueryKind::PrimaryKeys => "primary_keys",
            QueryKind::ExportedKeys => "exported_keys",
            QueryKind::Procedures => "procedures",
        }
    }
}

#[derive(Debug, Clone)]
struct Fault {
    kind: QueryKind,
    /// Restrict the fault to one table (per-table queries only).
    table: Option<String>,
    message: String,
}

/// An in-memory catalog.
///
/// # Example
///
/// ```ignore
/// let catalog = InMemoryCatalog::new()
///     .with_table("CUSTOMER")
///     .with_column("CUSTOMER", "id", "INTEGER")
///     .with_primary_key("CUSTOMER", "id", 1);
///
/// let schema = sqlcrawl::crawl(&catalog, &ConnectionConfig::new("memory"))?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    driver: DriverInfo,
    objects: Vec<CatalogRow>,
    columns: HashMap<String, Vec<CatalogRow>>,
    primary_keys: HashMap<String, Vec<CatalogRow>>,
    exported_keys: HashMap<String, Vec<CatalogRow>>,
    procedures: Vec<CatalogRow>,
    faults: Vec<Fault>,
    refuse_connections: bool,
    opened: AtomicUsize,
    open: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            driver: DriverInfo::new("In-Memory Catalog", Some(env!("CARGO_PKG_VERSION").to_string())),
            ..Default::default()
        }
    }

    pub fn with_driver(mut self, name: impl Into<String>, version: Option<&str>) -> Self {
        self.driver = DriverInfo::new(name, version.map(str::to_string));
        self
    }

    /// Add a `TABLE` object.
    pub fn with_table(self, name: &str) -> Self {
        self.with_object_row(
            CatalogRow::new()
                .with(labels::TABLE_NAME, name)
                .with(labels::TABLE_TYPE, labels::TYPE_TABLE),
        )
    }

    /// Add a `VIEW` object.
    pub fn with_view(self, name: &str) -> Self {
        self.with_object_row(
            CatalogRow::new()
                .with(labels::TABLE_NAME, name)
                .with(labels::TABLE_TYPE, labels::TYPE_VIEW),
        )
    }

    /// Add a `SEQUENCE` object.
    pub fn with_sequence(self, name: &str) -> Self {
        self.with_object_row(
            CatalogRow::new()
                .with(labels::TABLE_NAME, name)
                .with(labels::TABLE_TYPE, labels::TYPE_SEQUENCE),
        )
    }

    /// Add a raw object row, as returned by `tables()`.
    pub fn with_object_row(mut self, row: CatalogRow) -> Self {
        self.objects.push(row);
        self
    }

    /// Add a nullable column with the next ordinal position.
    pub fn with_column(self, table: &str, column: &str, type_name: &str) -> Self {
        let ordinal = self.columns.get(table).map_or(0, Vec::len) + 1;
        let row = CatalogRow::new()
            .with(labels::TABLE_NAME, table)
            .with(labels::COLUMN_NAME, column)
            .with(labels::TYPE_NAME, type_name)
            .with(
                labels::DATA_TYPE,
                crate::model::sql_types::code_for_name(type_name),
            )
            .with(labels::IS_NULLABLE, "YES")
            .with(labels::IS_AUTOINCREMENT, "NO")
            .with(labels::IS_GENERATEDCOLUMN, "NO")
            .with(labels::ORDINAL_POSITION, ordinal as i64);
        self.with_column_row(table, row)
    }

    /// Add a raw column row for `table`.
    pub fn with_column_row(mut self, table: &str, row: CatalogRow) -> Self {
        self.columns.entry(table.to_string()).or_default().push(row);
        self
    }

    /// Add a primary-key row.
    pub fn with_primary_key(self, table: &str, column: &str, key_seq: i32) -> Self {
        self.with_primary_key_row(
            table,
            CatalogRow::new()
                .with(labels::TABLE_NAME, table)
                .with(labels::COLUMN_NAME, column)
                .with(labels::KEY_SEQ, key_seq),
        )
    }

    pub fn with_primary_key_row(mut self, table: &str, row: CatalogRow) -> Self {
        self.primary_keys
            .entry(table.to_string())
            .or_default()
            .push(row);
        self
    }

    /// Add a foreign key `fk_table.fk_column -> pk_table.pk_column`.
    ///
    /// It is reported among the exported keys of `pk_table`.
    pub fn with_foreign_key(
        self,
        fk_table: &str,
        fk_column: &str,
        pk_table: &str,
        pk_column: &str,
    ) -> Self {
        let key_seq = 1 + self.exported_keys.get(pk_table).map_or(0, |rows| {
            rows.iter()
                .filter(|r| r.get_str(labels::FKTABLE_NAME).as_deref() == Some(fk_table))
                .count()
        });
        self.with_exported_key_row(
            pk_table,
            CatalogRow::new()
                .with(labels::PKTABLE_NAME, pk_table)
                .with(labels::PKCOLUMN_NAME, pk_column)
                .with(labels::FKTABLE_NAME, fk_table)
                .with(labels::FKCOLUMN_NAME, fk_column)
                .with(labels::KEY_SEQ, key_seq as i64),
        )
    }

    pub fn with_exported_key_row(mut self, pk_table: &str, row: CatalogRow) -> Self {
        self.exported_keys
            .entry(pk_table.to_string())
            .or_default()
            .push(row);
        self
    }

    /// Add a procedure.
    pub fn with_procedure(self, name: &str, specific_name: &str) -> Self {
        self.with_procedure_row(
            CatalogRow::new()
                .with(labels::PROCEDURE_NAME, name)
                .with(labels::PROCEDURE_TYPE, 1i64)
                .with(labels::SPECIFIC_NAME, specific_name),
        )
    }

    pub fn with_procedure_row(mut self, row: CatalogRow) -> Self {
        self.procedures.push(row);
        self
    }

    /// Make every query of `kind` fail.
    pub fn failing_on(mut self, kind: QueryKind) -> Self {
        self.faults.push(Fault {
            kind,
            table: None,
            message: format!("injected {} failure", kind.as_str()),
        });
        self
    }

    /// Make queries of `kind` fail for one table.
    pub fn failing_on_table(mut self, kind: QueryKind, table: &str) -> Self {
        self.faults.push(Fault {
            kind,
            table: Some(table.to_string()),
            message: format!("injected {} failure for {}", kind.as_str(), table),
        });
        self
    }

    /// Make every `connect` fail.
    pub fn refusing_connections(mut self) -> Self {
        self.refuse_connections = true;
        self
    }

    /// Connections handed out so far.
    pub fn connections_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Connections handed out and not yet dropped.
    pub fn connections_open(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    fn check(&self, kind: QueryKind, table: Option<&str>) -> SourceResult<()> {
        let fault = self.faults.iter().find(|f| {
            f.kind == kind && (f.table.is_none() || f.table.as_deref() == table)
        });
        match fault {
            Some(f) => Err(SourceError::query(kind.as_str(), f.message.clone())),
            None => Ok(()),
        }
    }
}

impl MetadataConnector for InMemoryCatalog {
    fn connect<'a>(
        &'a self,
        _config: &ConnectionConfig,
    ) -> SourceResult<Box<dyn MetadataSource + 'a>> {
        if self.refuse_connections {
            return Err(SourceError::Connect("catalog refused the connection".to_string()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySource { catalog: self }))
    }
}

/// One open connection to an [`InMemoryCatalog`].
struct MemorySource<'a> {
    catalog: &'a InMemoryCatalog,
}

impl Drop for MemorySource<'_> {
    fn drop(&mut self) {
        self.catalog.open.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MetadataSource for MemorySource<'_> {
    fn driver_info(&self) -> SourceResult<DriverInfo> {
        self.catalog.check(QueryKind::DriverInfo, None)?;
        Ok(self.catalog.driver.clone())
    }

    fn tables(&self, types: &[&str]) -> SourceResult<Vec<CatalogRow>> {
        self.catalog.check(QueryKind::Tables, None)?;
        Ok(self
            .catalog
            .objects
            .iter()
            .filter(|row| match row.get(labels::TABLE_TYPE) {
                Some(Value::Text(t)) => types.iter().any(|ty| ty.eq_ignore_ascii_case(t)),
                _ => false,
            })
            .cloned()
            .collect())
    }

    fn columns(&self, table: &str) -> SourceResult<Vec<CatalogRow>> {
        self.catalog.check(QueryKind::Columns, Some(table))?;
        Ok(self.catalog.columns.get(table).cloned().unwrap_or_default())
    }

    fn primary_keys(&self, table: &str) -> SourceResult<Vec<CatalogRow>> {
        self.catalog.check(QueryKind::PrimaryKeys, Some(table))?;
        Ok(self
            .catalog
            .primary_keys
            .get(table)
            .cloned()
            .unwrap_or_default())
    }

    fn exported_keys(&self, table: &str) -> SourceResult<Vec<CatalogRow>> {
        self.catalog.check(QueryKind::ExportedKeys, Some(table))?;
        Ok(self
            .catalog
            .exported_keys
            .get(table)
            .cloned()
            .unwrap_or_default())
    }

    fn procedures(&self) -> SourceResult<Vec<CatalogRow>> {
        self.catalog.check(QueryKind::Procedures, None)?;
        Ok(self.catalog.procedures.clone())
    }
}
