//! # Schema Export
//!
//! Writes schema documents to disk for editors and external validators.
//!
//! [`create_json_with_schema`] produces two files from `config.json`:
//!
//! ```text
//! config.schema.json   the union schema, pretty-printed
//! config.json          {"$schema": "/abs/path/to/config.schema.json"}
//! ```
//!
//! so that an editor opening `config.json` picks up completion and
//! validation for the target type.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Error writing a schema document.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Filesystem failure.
    #[error("io error at '{path}': {source}")]
    Io {
        /// Path being written or resolved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write a schema document to `output_file`, pretty-printed with two-space indent.
pub fn save_json_schema(schema: &Value, output_file: impl AsRef<Path>) -> Result<(), ExportError> {
    let output_file = output_file.as_ref();
    let text = serde_json::to_string_pretty(schema)?;
    std::fs::write(output_file, text).map_err(io_error(output_file))?;
    tracing::debug!(path = %output_file.display(), "wrote schema document");
    Ok(())
}

/// Write `<stem>.schema.json` next to `output_file`, and `output_file` itself
/// as a stub document referencing the schema by absolute path.
///
/// Parent directories are created as needed. Returns the absolute path of
/// the schema file.
pub fn create_json_with_schema(schema: &Value, output_file: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
    let output_file = output_file.as_ref();
    if let Some(dir) = output_file.parent() {
        std::fs::create_dir_all(dir).map_err(io_error(dir))?;
    }

    let schema_file = output_file.with_extension("schema.json");
    save_json_schema(schema, &schema_file)?;
    let resolved = std::fs::canonicalize(&schema_file).map_err(io_error(&schema_file))?;

    let stub = serde_json::json!({ "$schema": resolved.display().to_string() });
    std::fs::write(output_file, serde_json::to_string_pretty(&stub)?).map_err(io_error(output_file))?;
    Ok(resolved)
}
