//! Reading one serialized input value.

use std::fs;
use std::path::Path;

use packvis_core::{Result, Subject, VisError};
use serde_json::Value;

/// Resolve a command-line payload: inline JSON if it parses, otherwise a path to a JSON file.
pub fn read_document(source: &str, subject: Subject) -> Result<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(source) {
        return Ok(value);
    }
    read_json_file(Path::new(source), subject)
}

/// Parse a JSON file, reporting failures against `subject`.
pub fn read_json_file(path: &Path, subject: Subject) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|e| {
        VisError::malformed(subject, format!("cannot read '{}': {}", path.display(), e))
    })?;
    let value = serde_json::from_str(&text).map_err(|e| {
        VisError::malformed(subject, format!("'{}' is not valid JSON: {}", path.display(), e))
    })?;
    log::debug!("Read {} from {}", subject, path.display());
    Ok(value)
}
