// src/model/table.rs
use crate::model::types::Flag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A crawled table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name, unique within one crawl.
    pub table_name: String,
    /// Catalog (`TABLE_CAT`).
    pub category: Option<String>,
    /// Schema (`TABLE_SCHEM`).
    pub schema: Option<String>,
    /// Object type as reported (`TABLE_TYPE`).
    pub table_type: Option<String>,
    pub remarks: Option<String>,
    /// Vendor type info (`TYPE_CAT`, `TYPE_SCHEM`, `TYPE_NAME`).
    pub type_category: Option<String>,
    pub type_schema: Option<String>,
    pub type_name: Option<String>,
    /// Designated identifier column of a typed table.
    pub self_referencing_column: Option<String>,
    /// How values in the self-referencing column are created.
    pub reference_generation: Option<String>,
    /// First sequence whose name contains the table name.
    pub sequence_name: Option<String>,
    /// Columns in catalog-reported order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a table with only its name set.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            category: None,
            schema: None,
            table_type: None,
            remarks: None,
            type_category: None,
            type_schema: None,
            type_name: None,
            self_referencing_column: None,
            reference_generation: None,
            sequence_name: None,
            columns: Vec::new(),
        }
    }

    /// Look up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.column_name == name)
    }

    /// Primary key columns ordered by their key sequence.
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        let mut keys: Vec<&Column> = self
            .columns
            .iter()
            .filter(|c| c.primary_key_index.is_some())
            .collect();
        keys.sort_by_key(|c| c.primary_key_index);
        keys
    }

    /// Whether any column takes part in the primary key.
    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|c| c.primary_key_index.is_some())
    }
}

/// A crawled column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub table_name: String,
    pub column_name: String,
    /// Declared type name (`TYPE_NAME`).
    pub type_name: Option<String>,
    /// JDBC-style type code (`DATA_TYPE`).
    pub data_type: Option<i32>,
    pub size: Option<i32>,
    pub decimal_digits: Option<i32>,
    pub remarks: Option<String>,
    pub nullable: Flag,
    pub auto_increment: Flag,
    /// Catalog and schema of the owning table.
    pub table_category: Option<String>,
    pub table_schema: Option<String>,
    pub buffer_length: Option<i32>,
    pub num_prec_radix: Option<i32>,
    /// Default value expression (`COLUMN_DEF`).
    pub column_default: Option<String>,
    /// 1-based position in the table.
    pub ordinal_position: Option<i32>,
    pub scope_catalog: Option<String>,
    pub scope_schema: Option<String>,
    pub scope_table: Option<String>,
    pub source_data_type: Option<String>,
    pub generated: Flag,
    /// 1-based position within the primary key, if the column is part of it.
    pub primary_key_index: Option<i32>,
    /// Foreign-key columns in other tables that reference this column.
    pub exported_keys: BTreeSet<Key>,
}

impl Column {
    /// Create a column with only its identity set.
    pub fn new(table_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            type_name: None,
            data_type: None,
            size: None,
            decimal_digits: None,
            remarks: None,
            nullable: Flag::Unknown,
            auto_increment: Flag::Unknown,
            table_category: None,
            table_schema: None,
            buffer_length: None,
            num_prec_radix: None,
            column_default: None,
            ordinal_position: None,
            scope_catalog: None,
            scope_schema: None,
            scope_table: None,
            source_data_type: None,
            generated: Flag::Unknown,
            primary_key_index: None,
            exported_keys: BTreeSet::new(),
        }
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key_index.is_some()
    }

    /// Only an explicit `NO` makes a column non-nullable.
    pub fn is_nullable(&self) -> bool {
        !self.nullable.is_no()
    }

    /// Only an explicit `YES` counts as auto-increment.
    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment.is_yes()
    }

    pub fn is_generated(&self) -> bool {
        self.generated.is_yes()
    }

    /// Whether some other column references this one.
    pub fn is_referenced(&self) -> bool {
        !self.exported_keys.is_empty()
    }
}

/// A foreign-key column that references the column holding this key.
///
/// Ordered by table name, then column name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key {
    pub table_name: String,
    pub column_name: String,
}

impl Key {
    pub fn new(table_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
        }
    }
}
