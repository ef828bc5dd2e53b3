//! Rust model writer.
//!
//! Emits one module per table holding a plain struct, plus a `mod.rs`
//! that declares them.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use inflector::Inflector;
use tracing::debug;

use super::{ensure_dir, package_dir, SpecificationWriter, WriterError, WriterResult};
use crate::model::{sql_types, Column, Schema, Table};

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "gen",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Writes Rust structs mirroring each table.
#[derive(Debug, Clone, Default)]
pub struct RustModelWriter {
    package: Option<String>,
}

impl RustModelWriter {
    pub fn new(package: Option<&str>) -> Self {
        Self {
            package: package.map(str::to_string),
        }
    }

    /// Module (file stem) name for a table.
    pub fn module_name(table: &Table) -> String {
        identifier(&table.table_name.to_snake_case())
    }

    /// Struct name for a table.
    pub fn struct_name(table: &Table) -> String {
        let name = table.table_name.to_pascal_case();
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            format!("T{}", name)
        } else {
            name
        }
    }

    /// Render the source of one table module.
    pub fn render_table(&self, table: &Table) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "//! `{}` table.", table.table_name);
        let _ = writeln!(out, "//!");
        let _ = writeln!(out, "//! Generated by sqlcrawl. Do not edit.");
        let _ = writeln!(out);
        if let Some(remarks) = table.remarks.as_deref().filter(|r| !r.is_empty()) {
            let _ = writeln!(out, "/// {}", remarks);
        }
        let _ = writeln!(out, "#[derive(Debug, Clone, PartialEq)]");
        let _ = writeln!(out, "pub struct {} {{", Self::struct_name(table));

        let key_count = table.primary_key_columns().len();
        for column in &table.columns {
            if let Some(index) = column.primary_key_index {
                let _ = writeln!(out, "    /// Primary key ({} of {}).", index, key_count);
            }
            if column.is_generated() {
                let _ = writeln!(out, "    /// Generated by the database.");
            }
            if column.is_referenced() {
                let referrers: Vec<String> = column
                    .exported_keys
                    .iter()
                    .map(|k| format!("`{}.{}`", k.table_name, k.column_name))
                    .collect();
                let _ = writeln!(out, "    /// Referenced by {}.", referrers.join(", "));
            }
            if let Some(remarks) = column.remarks.as_deref().filter(|r| !r.is_empty()) {
                let _ = writeln!(out, "    /// {}", remarks);
            }
            let _ = writeln!(
                out,
                "    pub {}: {},",
                field_name(&column.column_name),
                field_type(column)
            );
        }
        let _ = writeln!(out, "}}");
        let _ = writeln!(out);
        let _ = writeln!(out, "impl {} {{", Self::struct_name(table));
        let _ = writeln!(out, "    pub const TABLE: &'static str = {:?};", table.table_name);
        match &table.sequence_name {
            Some(sequence) => {
                let _ = writeln!(
                    out,
                    "    pub const SEQUENCE: Option<&'static str> = Some({:?});",
                    sequence
                );
            }
            None => {
                let _ = writeln!(out, "    pub const SEQUENCE: Option<&'static str> = None;");
            }
        }
        let _ = writeln!(out, "}}");
        out
    }

    /// Render `mod.rs` declaring every table module.
    pub fn render_mod(&self, schema: &Schema) -> String {
        let mut out = String::from("//! Generated by sqlcrawl. Do not edit.\n\n");
        for table in &schema.tables {
            let module = Self::module_name(table);
            let _ = writeln!(out, "pub mod {};", module);
        }
        out
    }
}

impl SpecificationWriter for RustModelWriter {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn write(&self, schema: &Schema, out_dir: &Path) -> WriterResult<Vec<PathBuf>> {
        let dir = match &self.package {
            Some(package) => package_dir(out_dir, package),
            None => out_dir.to_path_buf(),
        };
        check_module_names(schema)?;
        ensure_dir(&dir)?;

        let mut written = Vec::with_capacity(schema.tables.len() + 1);
        for table in &schema.tables {
            let file = Self::module_name(table);
            let path = dir.join(format!("{}.rs", file.trim_start_matches("r#")));
            fs::write(&path, self.render_table(table)).map_err(WriterError::io(&path))?;
            written.push(path);
        }

        let mod_path = dir.join("mod.rs");
        fs::write(&mod_path, self.render_mod(schema)).map_err(WriterError::io(&mod_path))?;
        written.push(mod_path);

        debug!(files = written.len(), dir = %dir.display(), "wrote rust model");
        Ok(written)
    }
}

/// Fail if two tables would be written to the same module file.
fn check_module_names(schema: &Schema) -> WriterResult<()> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(schema.tables.len());
    for table in &schema.tables {
        let module = RustModelWriter::module_name(table);
        if let Some(first) = seen.insert(module.clone(), &table.table_name) {
            return Err(WriterError::ModuleCollision {
                module,
                first: first.to_string(),
                second: table.table_name.clone(),
            });
        }
    }
    Ok(())
}

/// Make `name` a usable Rust identifier.
fn identifier(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() || cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", cleaned)
    } else if KEYWORDS.contains(&cleaned.as_str()) {
        format!("r#{}", cleaned)
    } else {
        cleaned
    }
}

fn field_name(column: &str) -> String {
    identifier(&column.to_snake_case())
}

fn field_type(column: &Column) -> String {
    let base = match column.data_type {
        Some(sql_types::BIT) | Some(sql_types::BOOLEAN) => "bool",
        Some(sql_types::TINYINT) => "i8",
        Some(sql_types::SMALLINT) => "i16",
        Some(sql_types::INTEGER) => "i32",
        Some(sql_types::BIGINT) => "i64",
        Some(sql_types::REAL) => "f32",
        Some(sql_types::FLOAT) | Some(sql_types::DOUBLE) => "f64",
        Some(sql_types::BINARY)
        | Some(sql_types::VARBINARY)
        | Some(sql_types::LONGVARBINARY)
        | Some(sql_types::BLOB) => "Vec<u8>",
        // NUMERIC/DECIMAL stay textual to keep their precision
        _ => "String",
    };
    if column.is_nullable() && !column.is_primary_key() {
        format!("Option<{}>", base)
    } else {
        base.to_string()
    }
}
