//! Standard catalog column labels.
//!
//! These are the `java.sql.DatabaseMetaData` result-set labels. Every
//! [`MetadataSource`](super::MetadataSource) reports rows under them, so
//! the crawler never needs to know which driver produced a row.

// Object types passed to `tables()`
pub const TYPE_TABLE: &str = "TABLE";
pub const TYPE_VIEW: &str = "VIEW";
pub const TYPE_SEQUENCE: &str = "SEQUENCE";

// tables()
pub const TABLE_CAT: &str = "TABLE_CAT";
pub const TABLE_SCHEM: &str = "TABLE_SCHEM";
pub const TABLE_NAME: &str = "TABLE_NAME";
pub const TABLE_TYPE: &str = "TABLE_TYPE";
pub const REMARKS: &str = "REMARKS";
pub const TYPE_CAT: &str = "TYPE_CAT";
pub const TYPE_SCHEM: &str = "TYPE_SCHEM";
pub const TYPE_NAME: &str = "TYPE_NAME";
pub const SELF_REFERENCING_COL_NAME: &str = "SELF_REFERENCING_COL_NAME";
pub const REF_GENERATION: &str = "REF_GENERATION";

// columns()
pub const COLUMN_NAME: &str = "COLUMN_NAME";
pub const DATA_TYPE: &str = "DATA_TYPE";
pub const COLUMN_SIZE: &str = "COLUMN_SIZE";
pub const BUFFER_LENGTH: &str = "BUFFER_LENGTH";
pub const DECIMAL_DIGITS: &str = "DECIMAL_DIGITS";
pub const NUM_PREC_RADIX: &str = "NUM_PREC_RADIX";
pub const NULLABLE: &str = "NULLABLE";
pub const COLUMN_DEF: &str = "COLUMN_DEF";
pub const ORDINAL_POSITION: &str = "ORDINAL_POSITION";
pub const IS_NULLABLE: &str = "IS_NULLABLE";
pub const SCOPE_CATALOG: &str = "SCOPE_CATALOG";
pub const SCOPE_SCHEMA: &str = "SCOPE_SCHEMA";
pub const SCOPE_TABLE: &str = "SCOPE_TABLE";
pub const SOURCE_DATA_TYPE: &str = "SOURCE_DATA_TYPE";
pub const IS_AUTOINCREMENT: &str = "IS_AUTOINCREMENT";
pub const IS_GENERATEDCOLUMN: &str = "IS_GENERATEDCOLUMN";

// primary_keys()
pub const KEY_SEQ: &str = "KEY_SEQ";
pub const PK_NAME: &str = "PK_NAME";

// exported_keys()
pub const PKTABLE_NAME: &str = "PKTABLE_NAME";
pub const PKCOLUMN_NAME: &str = "PKCOLUMN_NAME";
pub const FKTABLE_NAME: &str = "FKTABLE_NAME";
pub const FKCOLUMN_NAME: &str = "FKCOLUMN_NAME";
pub const FK_NAME: &str = "FK_NAME";

// procedures()
pub const PROCEDURE_CAT: &str = "PROCEDURE_CAT";
pub const PROCEDURE_SCHEM: &str = "PROCEDURE_SCHEM";
pub const PROCEDURE_NAME: &str = "PROCEDURE_NAME";
pub const PROCEDURE_TYPE: &str = "PROCEDURE_TYPE";
pub const SPECIFIC_NAME: &str = "SPECIFIC_NAME";
