//! JSON schema writer.

use std::fs;
use std::path::{Path, PathBuf};

use super::{ensure_dir, SpecificationWriter, WriterError, WriterResult};
use crate::model::Schema;

/// Writes the whole schema as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonWriter {
    file_name: String,
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self {
            file_name: "schema.json".to_string(),
        }
    }
}

impl JsonWriter {
    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Render the schema without touching the filesystem.
    pub fn render(&self, schema: &Schema) -> WriterResult<String> {
        Ok(serde_json::to_string_pretty(schema)?)
    }
}

impl SpecificationWriter for JsonWriter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write(&self, schema: &Schema, out_dir: &Path) -> WriterResult<Vec<PathBuf>> {
        ensure_dir(out_dir)?;
        let path = out_dir.join(&self.file_name);
        let json = self.render(schema)?;
        fs::write(&path, json).map_err(WriterError::io(&path))?;
        Ok(vec![path])
    }
}
