//! Output writers for a crawled schema.
//!
//! Each target format implements [`SpecificationWriter`]; the target is
//! picked by name from configuration with [`writer_for`].

mod json;
mod rust;

pub use json::JsonWriter;
pub use rust::RustModelWriter;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::Schema;

/// Result type for writer operations.
pub type WriterResult<T> = Result<T, WriterError>;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown output target: {0}. Supported: json, rust")]
    UnknownTarget(String),

    #[error("Tables `{first}` and `{second}` both map to module `{module}`")]
    ModuleCollision {
        module: String,
        first: String,
        second: String,
    },
}

impl WriterError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Writes a schema out in one target format.
pub trait SpecificationWriter {
    /// Target name used in configuration.
    fn name(&self) -> &'static str;

    /// Write `schema` under `out_dir`, returning the files written.
    fn write(&self, schema: &Schema, out_dir: &Path) -> WriterResult<Vec<PathBuf>>;
}

/// Pick a writer by target name.
///
/// `package` is a dotted path (`db.model`) for targets that lay out
/// source files in folders.
pub fn writer_for(
    target: &str,
    package: Option<&str>,
) -> WriterResult<Box<dyn SpecificationWriter>> {
    match target.to_lowercase().as_str() {
        "json" => Ok(Box::new(JsonWriter::default())),
        "rust" | "rs" => Ok(Box::new(RustModelWriter::new(package))),
        other => Err(WriterError::UnknownTarget(other.to_string())),
    }
}

/// Map a dotted package onto a folder under `root`.
pub fn package_dir(root: &Path, package: &str) -> PathBuf {
    package
        .split('.')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Create `dir` and its parents.
pub(crate) fn ensure_dir(dir: &Path) -> WriterResult<()> {
    std::fs::create_dir_all(dir).map_err(WriterError::io(dir))
}
