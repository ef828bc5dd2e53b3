//! SQLite metadata source.
//!
//! SQLite has no `information_schema`; its catalog lives in `sqlite_master`
//! and the `table_info`/`table_xinfo`/`foreign_key_list` pragmas. This
//! module reshapes those into standard catalog rows.
//!
//! SQLite has no sequences and no stored procedures, so those queries
//! always return empty lists. Exported keys are not stored anywhere either:
//! they are found by scanning the foreign-key list of every table.

use std::sync::LazyLock;

use regex::Regex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::debug;

use super::error::{SourceError, SourceResult};
use super::labels;
use super::row::{CatalogRow, Value};
use super::source::{DriverInfo, MetadataConnector, MetadataSource};
use crate::config::{ConnectionConfig, SqliteLocation};
use crate::model::{sql_types, Flag};

/// Splits `DECIMAL(18, 2)` into its base name, size and scale.
static DECLARED_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.*?)\s*(?:\(\s*(\d+)\s*(?:,\s*(\d+)\s*)?\))?\s*$").unwrap()
});

static AUTOINCREMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAUTOINCREMENT\b").unwrap());

/// Opens [`SqliteMetadataSource`]s. File databases are opened read-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConnector;

impl MetadataConnector for SqliteConnector {
    fn connect<'a>(
        &'a self,
        config: &ConnectionConfig,
    ) -> SourceResult<Box<dyn MetadataSource + 'a>> {
        let location = config
            .sqlite_location()
            .map_err(|e| SourceError::Connect(e.to_string()))?;
        if config.username.is_some() {
            debug!("sqlite ignores the configured principal");
        }
        Ok(Box::new(SqliteMetadataSource::open(&location)?))
    }
}

/// A metadata source over one SQLite connection.
pub struct SqliteMetadataSource {
    conn: Connection,
}

/// One row of `pragma_table_xinfo`.
struct RawColumn {
    name: String,
    declared: String,
    not_null: bool,
    default: Option<String>,
    pk: i64,
    hidden: i64,
}

impl SqliteMetadataSource {
    /// Open the database at `location`.
    pub fn open(location: &SqliteLocation) -> SourceResult<Self> {
        let conn = match location {
            SqliteLocation::Memory => Connection::open_in_memory(),
            SqliteLocation::File(path) => Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            ),
        }
        .map_err(|e| SourceError::Connect(format!("{:?}: {}", location, e)))?;
        Ok(Self { conn })
    }

    /// Wrap an already open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Names of all user tables, ordered by name.
    fn table_names(&self) -> SourceResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// The `CREATE TABLE` statement of `table`, if recorded.
    fn table_sql(&self, table: &str) -> SourceResult<Option<String>> {
        let sql: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
                params![table],
                |row| row.get(0),
            )
            .optional()?;
        Ok(sql.flatten())
    }

    fn raw_columns(&self, table: &str) -> SourceResult<Vec<RawColumn>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, type, \"notnull\", dflt_value, pk, hidden
             FROM pragma_table_xinfo(?1) ORDER BY cid",
        )?;
        let columns = stmt
            .query_map(params![table], |row| {
                Ok(RawColumn {
                    name: row.get(0)?,
                    declared: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    not_null: row.get::<_, i64>(2)? != 0,
                    default: row.get(3)?,
                    pk: row.get(4)?,
                    hidden: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Names of the columns `columns()` reports for `table`, in order.
    fn column_names(&self, table: &str) -> SourceResult<Vec<String>> {
        Ok(self
            .raw_columns(table)?
            .into_iter()
            .filter(|c| c.hidden != 1)
            .map(|c| c.name)
            .collect())
    }

    /// Primary-key column names of `table`, ordered by key position.
    fn primary_key_names(&self, table: &str) -> SourceResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) WHERE pk > 0 ORDER BY pk")?;
        let names = stmt
            .query_map(params![table], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}

/// Split a declared type into base name, size and scale.
fn parse_declared_type(declared: &str) -> (String, Option<i64>, Option<i64>) {
    match DECLARED_TYPE.captures(declared) {
        Some(caps) => {
            let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse().ok());
            let base = caps.get(1).map_or("", |m| m.as_str()).to_string();
            (base, number(2), number(3))
        }
        None => (declared.trim().to_string(), None, None),
    }
}

impl MetadataSource for SqliteMetadataSource {
    fn driver_info(&self) -> SourceResult<DriverInfo> {
        Ok(DriverInfo::new("SQLite", Some(rusqlite::version().to_string())))
    }

    fn tables(&self, types: &[&str]) -> SourceResult<Vec<CatalogRow>> {
        let wanted: Vec<&str> = types
            .iter()
            .filter_map(|t| match t.to_ascii_uppercase().as_str() {
                labels::TYPE_TABLE => Some("table"),
                labels::TYPE_VIEW => Some("view"),
                _ => None,
            })
            .collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT type, name FROM sqlite_master
             WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'
             ORDER BY type, name",
        )?;
        let objects = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(objects
            .into_iter()
            .filter(|(kind, _)| wanted.contains(&kind.as_str()))
            .map(|(kind, name)| {
                CatalogRow::new()
                    .with(labels::TABLE_CAT, Value::Null)
                    .with(labels::TABLE_SCHEM, Value::Null)
                    .with(labels::TABLE_NAME, name)
                    .with(labels::TABLE_TYPE, kind.to_ascii_uppercase())
                    .with(labels::REMARKS, Value::Null)
                    .with(labels::TYPE_CAT, Value::Null)
                    .with(labels::TYPE_SCHEM, Value::Null)
                    .with(labels::TYPE_NAME, Value::Null)
                    .with(labels::SELF_REFERENCING_COL_NAME, Value::Null)
                    .with(labels::REF_GENERATION, Value::Null)
            })
            .collect())
    }

    fn columns(&self, table: &str) -> SourceResult<Vec<CatalogRow>> {
        let raw = self.raw_columns(table)?;
        let autoincrement = self
            .table_sql(table)?
            .is_some_and(|sql| AUTOINCREMENT.is_match(&sql));
        let single_key = raw.iter().filter(|c| c.pk > 0).count() == 1;

        let mut ordinal = 0i64;
        let mut rows = Vec::with_capacity(raw.len());
        // hidden = 1 marks virtual-table hidden columns; 2 and 3 are generated
        for column in raw.into_iter().filter(|c| c.hidden != 1) {
            ordinal += 1;
            let (base, size, scale) = parse_declared_type(&column.declared);
            let is_auto = autoincrement
                && single_key
                && column.pk == 1
                && base.eq_ignore_ascii_case("INTEGER");

            rows.push(
                CatalogRow::new()
                    .with(labels::TABLE_CAT, Value::Null)
                    .with(labels::TABLE_SCHEM, Value::Null)
                    .with(labels::TABLE_NAME, table)
                    .with(labels::COLUMN_NAME, column.name)
                    .with(labels::DATA_TYPE, sql_types::code_for_name(&base))
                    .with(labels::TYPE_NAME, Some(base).filter(|b| !b.is_empty()))
                    .with(labels::COLUMN_SIZE, size)
                    .with(labels::BUFFER_LENGTH, Value::Null)
                    .with(labels::DECIMAL_DIGITS, scale)
                    .with(labels::NUM_PREC_RADIX, 10i64)
                    .with(labels::NULLABLE, if column.not_null { 0i64 } else { 1 })
                    .with(labels::REMARKS, Value::Null)
                    .with(labels::COLUMN_DEF, column.default)
                    .with(labels::ORDINAL_POSITION, ordinal)
                    .with(labels::IS_NULLABLE, Flag::from(!column.not_null).as_str())
                    .with(labels::SCOPE_CATALOG, Value::Null)
                    .with(labels::SCOPE_SCHEMA, Value::Null)
                    .with(labels::SCOPE_TABLE, Value::Null)
                    .with(labels::SOURCE_DATA_TYPE, Value::Null)
                    .with(labels::IS_AUTOINCREMENT, Flag::from(is_auto).as_str())
                    .with(labels::IS_GENERATEDCOLUMN, Flag::from(column.hidden >= 2).as_str()),
            );
        }
        Ok(rows)
    }

    fn primary_keys(&self, table: &str) -> SourceResult<Vec<CatalogRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, pk FROM pragma_table_info(?1) WHERE pk > 0 ORDER BY name")?;
        let keys = stmt
            .query_map(params![table], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(keys
            .into_iter()
            .map(|(column, seq)| {
                CatalogRow::new()
                    .with(labels::TABLE_CAT, Value::Null)
                    .with(labels::TABLE_SCHEM, Value::Null)
                    .with(labels::TABLE_NAME, table)
                    .with(labels::COLUMN_NAME, column)
                    .with(labels::KEY_SEQ, seq)
                    .with(labels::PK_NAME, Value::Null)
            })
            .collect())
    }

    fn exported_keys(&self, table: &str) -> SourceResult<Vec<CatalogRow>> {
        let mut target_keys: Option<Vec<String>> = None;
        let mut target_columns: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for fk_table in self.table_names()? {
            let mut stmt = self.conn.prepare(
                "SELECT \"id\", \"seq\", \"table\", \"from\", \"to\"
                 FROM pragma_foreign_key_list(?1) ORDER BY \"id\", \"seq\"",
            )?;
            let references = stmt
                .query_map(params![fk_table], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            for (id, seq, parent, from, to) in references {
                if !parent.eq_ignore_ascii_case(table) {
                    continue;
                }
                // REFERENCES without a column list targets the parent's primary key
                let pk_column = match to {
                    // identifiers are case-insensitive; report the declared spelling
                    Some(column) => {
                        if target_columns.is_none() {
                            target_columns = Some(self.column_names(table)?);
                        }
                        target_columns
                            .as_ref()
                            .and_then(|names| {
                                names.iter().find(|n| n.eq_ignore_ascii_case(&column))
                            })
                            .cloned()
                            .unwrap_or(column)
                    }
                    None => {
                        if target_keys.is_none() {
                            target_keys = Some(self.primary_key_names(table)?);
                        }
                        target_keys
                            .as_ref()
                            .and_then(|keys| usize::try_from(seq).ok().and_then(|i| keys.get(i)))
                            .cloned()
                            .ok_or_else(|| {
                                SourceError::query(
                                    "exported_keys",
                                    format!(
                                        "foreign key {} of {} references {} without a matching primary key column",
                                        id, fk_table, table
                                    ),
                                )
                            })?
                    }
                };

                rows.push(
                    CatalogRow::new()
                        .with(labels::PKTABLE_NAME, table)
                        .with(labels::PKCOLUMN_NAME, pk_column)
                        .with(labels::FKTABLE_NAME, fk_table.as_str())
                        .with(labels::FKCOLUMN_NAME, from)
                        .with(labels::KEY_SEQ, seq + 1)
                        .with(labels::FK_NAME, Value::Null),
                );
            }
        }
        Ok(rows)
    }

    fn procedures(&self) -> SourceResult<Vec<CatalogRow>> {
        Ok(Vec::new())
    }
}
