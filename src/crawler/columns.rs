//! Column resolution for one table.
//!
//! Columns are materialised first, then primary-key and exported-key rows
//! are attached to them by exact column name. The key queries are separate,
//! unordered result sets in most catalogs, so attaching them afterwards
//! keeps one column query per table and makes attachment deterministic.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use super::error::{at, CrawlResult, IntegrityFault, KeyKind, Stage};
use crate::metadata::{labels, CatalogRow, MetadataSource, SourceError, SourceResult};
use crate::model::{Column, Key};

/// Resolves the columns of a table, with key information attached.
pub struct ColumnResolver<'s> {
    source: &'s dyn MetadataSource,
}

impl<'s> ColumnResolver<'s> {
    pub fn new(source: &'s dyn MetadataSource) -> Self {
        Self { source }
    }

    /// Columns of `table` in ordinal order, with `primary_key_index` and
    /// `exported_keys` filled in. Rows without an ordinal keep the order
    /// the catalog reported them in.
    ///
    /// Fails with an integrity fault when a key row names a column the
    /// column query did not report.
    pub fn resolve(&self, table: &str) -> CrawlResult<Vec<Column>> {
        let rows = self
            .source
            .columns(table)
            .map_err(at(Stage::Columns(table.to_string())))?;

        let mut materialised = rows
            .iter()
            .map(|row| column_from_row(table, row))
            .collect::<SourceResult<Vec<_>>>()
            .map_err(at(Stage::Columns(table.to_string())))?;
        // Stable, and only when every row carries an ordinal.
        if materialised.iter().all(|c| c.ordinal_position.is_some()) {
            materialised.sort_by_key(|c| c.ordinal_position);
        }

        let mut columns = ColumnSet::with_capacity(materialised.len());
        for column in materialised {
            columns.push(column);
        }

        self.attach_primary_keys(table, &mut columns)?;
        self.attach_exported_keys(table, &mut columns)?;

        debug!(table, columns = columns.len(), "resolved columns");
        Ok(columns.into_vec())
    }

    fn attach_primary_keys(&self, table: &str, columns: &mut ColumnSet) -> CrawlResult<()> {
        let stage = || Stage::PrimaryKeys(table.to_string());
        let rows = self.source.primary_keys(table).map_err(at(stage()))?;

        for (position, row) in rows.iter().enumerate() {
            let name = row.require_str(labels::COLUMN_NAME).map_err(at(stage()))?;
            let key_seq = match row.get_i32(labels::KEY_SEQ).map_err(at(stage()))? {
                Some(seq) => seq,
                None => {
                    let fallback = i32::try_from(position + 1).unwrap_or(i32::MAX);
                    warn!(table, column = %name, fallback, "primary key row has no KEY_SEQ");
                    fallback
                }
            };

            let column = columns.get_mut(&name).ok_or_else(|| IntegrityFault {
                table: table.to_string(),
                column: name.clone(),
                kind: KeyKind::Primary,
            })?;
            trace!(table, column = %name, key_seq, "attached primary key");
            column.primary_key_index = Some(key_seq);
        }
        Ok(())
    }

    fn attach_exported_keys(&self, table: &str, columns: &mut ColumnSet) -> CrawlResult<()> {
        let stage = || Stage::ExportedKeys(table.to_string());
        let rows = self.source.exported_keys(table).map_err(at(stage()))?;

        for row in &rows {
            let pk_column = row.require_str(labels::PKCOLUMN_NAME).map_err(at(stage()))?;
            let key = Key::new(
                row.require_str(labels::FKTABLE_NAME).map_err(at(stage()))?,
                row.require_str(labels::FKCOLUMN_NAME).map_err(at(stage()))?,
            );

            let column = columns.get_mut(&pk_column).ok_or_else(|| IntegrityFault {
                table: table.to_string(),
                column: pk_column.clone(),
                kind: KeyKind::Exported {
                    fk_table: key.table_name.clone(),
                    fk_column: key.column_name.clone(),
                },
            })?;
            trace!(
                table,
                column = %pk_column,
                fk_table = %key.table_name,
                fk_column = %key.column_name,
                "attached exported key"
            );
            column.exported_keys.insert(key);
        }
        Ok(())
    }
}

/// Columns of one table, indexed by name.
///
/// If a name repeats, lookups resolve to its first occurrence.
struct ColumnSet {
    columns: Vec<Column>,
    by_name: HashMap<String, usize>,
}

impl ColumnSet {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
            by_name: HashMap::with_capacity(capacity),
        }
    }

    fn push(&mut self, column: Column) {
        let index = self.columns.len();
        self.by_name
            .entry(column.column_name.clone())
            .or_insert(index);
        self.columns.push(column);
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Column> {
        let index = *self.by_name.get(name)?;
        self.columns.get_mut(index)
    }

    fn len(&self) -> usize {
        self.columns.len()
    }

    fn into_vec(self) -> Vec<Column> {
        self.columns
    }
}

/// Map a column row onto a [`Column`]. Only `COLUMN_NAME` is required.
fn column_from_row(table: &str, row: &CatalogRow) -> SourceResult<Column> {
    let name = row
        .get_str(labels::COLUMN_NAME)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| SourceError::MissingField(labels::COLUMN_NAME.to_string()))?;
    let owner = row
        .get_str(labels::TABLE_NAME)
        .unwrap_or_else(|| table.to_string());

    let mut column = Column::new(owner, name);
    column.type_name = row.get_str(labels::TYPE_NAME);
    column.data_type = optional_int(row, table, labels::DATA_TYPE);
    column.size = optional_int(row, table, labels::COLUMN_SIZE);
    column.decimal_digits = optional_int(row, table, labels::DECIMAL_DIGITS);
    column.remarks = row.get_str(labels::REMARKS);
    column.nullable = match row.get_flag(labels::IS_NULLABLE) {
        crate::model::Flag::Unknown => row.get_flag(labels::NULLABLE),
        flag => flag,
    };
    column.auto_increment = row.get_flag(labels::IS_AUTOINCREMENT);
    column.table_category = row.get_str(labels::TABLE_CAT);
    column.table_schema = row.get_str(labels::TABLE_SCHEM);
    column.buffer_length = optional_int(row, table, labels::BUFFER_LENGTH);
    column.num_prec_radix = optional_int(row, table, labels::NUM_PREC_RADIX);
    column.column_default = row.get_str(labels::COLUMN_DEF);
    column.ordinal_position = optional_int(row, table, labels::ORDINAL_POSITION);
    column.scope_catalog = row.get_str(labels::SCOPE_CATALOG);
    column.scope_schema = row.get_str(labels::SCOPE_SCHEMA);
    column.scope_table = row.get_str(labels::SCOPE_TABLE);
    column.source_data_type = row.get_str(labels::SOURCE_DATA_TYPE);
    column.generated = row.get_flag(labels::IS_GENERATEDCOLUMN);

    if column.ordinal_position.is_none() {
        warn!(table, column = %column.column_name, "column row has no ORDINAL_POSITION");
    }
    Ok(column)
}

/// Read an optional integer attribute, treating malformed values as absent.
fn optional_int(row: &CatalogRow, table: &str, label: &str) -> Option<i32> {
    match row.get_i32(label) {
        Ok(value) => value,
        Err(e) => {
            warn!(table, error = %e, "ignoring malformed column attribute");
            None
        }
    }
}
