//! Catalog value types shared by the model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state catalog flag.
///
/// Catalogs report attributes such as `IS_GENERATEDCOLUMN` and
/// `IS_AUTOINCREMENT` as `"YES"`, `"NO"`, or an empty string when the
/// driver cannot tell. Collapsing that into a `bool` loses the third
/// state, so it is kept explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Flag {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Flag {
    /// Parse a catalog flag value.
    ///
    /// Accepts `YES`/`NO` (any case), `Y`/`N`, `TRUE`/`FALSE` and `1`/`0`.
    /// Anything else, including absent values, is `Unknown`.
    pub fn from_catalog(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Flag::Unknown;
        };
        match value.trim().to_ascii_uppercase().as_str() {
            "YES" | "Y" | "TRUE" | "1" => Flag::Yes,
            "NO" | "N" | "FALSE" | "0" => Flag::No,
            _ => Flag::Unknown,
        }
    }

    pub fn is_yes(self) -> bool {
        self == Flag::Yes
    }

    pub fn is_no(self) -> bool {
        self == Flag::No
    }

    /// The catalog spelling of this flag.
    pub fn as_str(self) -> &'static str {
        match self {
            Flag::Yes => "YES",
            Flag::No => "NO",
            Flag::Unknown => "",
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value {
            Flag::Yes
        } else {
            Flag::No
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Unknown => write!(f, "UNKNOWN"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// JDBC-style SQL type codes (`java.sql.Types`).
///
/// These are the numeric codes catalogs report in `DATA_TYPE`.
pub mod sql_types {
    pub const BIT: i32 = -7;
    pub const TINYINT: i32 = -6;
    pub const SMALLINT: i32 = 5;
    pub const INTEGER: i32 = 4;
    pub const BIGINT: i32 = -5;
    pub const FLOAT: i32 = 6;
    pub const REAL: i32 = 7;
    pub const DOUBLE: i32 = 8;
    pub const NUMERIC: i32 = 2;
    pub const DECIMAL: i32 = 3;
    pub const CHAR: i32 = 1;
    pub const VARCHAR: i32 = 12;
    pub const LONGVARCHAR: i32 = -1;
    pub const NCHAR: i32 = -15;
    pub const NVARCHAR: i32 = -9;
    pub const DATE: i32 = 91;
    pub const TIME: i32 = 92;
    pub const TIMESTAMP: i32 = 93;
    pub const BINARY: i32 = -2;
    pub const VARBINARY: i32 = -3;
    pub const LONGVARBINARY: i32 = -4;
    pub const BLOB: i32 = 2004;
    pub const CLOB: i32 = 2005;
    pub const BOOLEAN: i32 = 16;
    pub const OTHER: i32 = 1111;

    /// Map a declared SQL type name onto a type code.
    ///
    /// Follows SQLite's affinity rules, refined for the common sized
    /// integer and temporal spellings. Unrecognised names map to `NUMERIC`,
    /// which is the affinity SQLite itself falls back to.
    pub fn code_for_name(declared: &str) -> i32 {
        let name = declared.trim().to_ascii_uppercase();
        if name.is_empty() {
            return BLOB;
        }
        if name.contains("INT") {
            return if name.starts_with("BIGINT") {
                BIGINT
            } else if name.starts_with("SMALLINT") {
                SMALLINT
            } else if name.starts_with("TINYINT") {
                TINYINT
            } else {
                INTEGER
            };
        }
        if name.starts_with("NCHAR") || name.starts_with("NATIONAL CHAR") {
            return NCHAR;
        }
        if name.starts_with("NVARCHAR") || name.starts_with("NATIVE CHARACTER") {
            return NVARCHAR;
        }
        if name.starts_with("CHAR(")
            || name == "CHAR"
            || (name.starts_with("CHARACTER") && !name.contains("VARYING"))
        {
            return CHAR;
        }
        if name.contains("CLOB") {
            return CLOB;
        }
        if name.contains("CHAR") || name.contains("TEXT") {
            return VARCHAR;
        }
        if name.contains("BLOB") {
            return BLOB;
        }
        if name.starts_with("VARBINARY") {
            return VARBINARY;
        }
        if name.starts_with("BINARY") {
            return BINARY;
        }
        if name.contains("DOUB") {
            return DOUBLE;
        }
        if name.contains("FLOA") {
            return FLOAT;
        }
        if name.contains("REAL") {
            return REAL;
        }
        if name.starts_with("BOOL") {
            return BOOLEAN;
        }
        if name.starts_with("DECIMAL") {
            return DECIMAL;
        }
        if name.starts_with("DATETIME") || name.starts_with("TIMESTAMP") {
            return TIMESTAMP;
        }
        if name.starts_with("DATE") {
            return DATE;
        }
        if name.starts_with("TIME") {
            return TIME;
        }
        NUMERIC
    }
}
