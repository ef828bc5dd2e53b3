//! Schema model produced by a crawl.
//!
//! A [`Schema`] owns every table, column and function it describes. It is
//! assembled once per crawl and never mutated afterwards, so it can be
//! shared read-only between any number of consumers.

pub mod function;
pub mod table;
pub mod types;

pub use function::Function;
pub use table::{Column, Key, Table};
pub use types::{sql_types, Flag};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The root aggregate of one crawl.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Driver name read when the crawler connected.
    pub driver_name: Option<String>,
    pub driver_version: Option<String>,
    /// Sequence names, verbatim and in catalog order.
    pub sequences: Vec<String>,
    /// Included tables, in catalog order.
    pub tables: Vec<Table>,
    /// Procedures, in catalog order.
    pub functions: Vec<Function>,
}

impl Schema {
    /// Look up a table by exact name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.table_name == name)
    }

    /// Look up a function by its specific name.
    pub fn function(&self, specific_name: &str) -> Option<&Function> {
        self.functions
            .iter()
            .find(|f| f.identity() == specific_name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.table_name.as_str())
    }

    /// Total number of columns across all tables.
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// SHA-256 of the schema's JSON form.
    ///
    /// Two crawls of an unchanged catalog yield the same fingerprint.
    /// Returns a 64-character lowercase hexadecimal string.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}
