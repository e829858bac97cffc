//! Combining several JSON documents into one, keyed by file name.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use thiserror::Error;

/// An input left out of the combined document, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Parsed documents by base file name.
    pub combined: Map<String, Value>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("cannot write combined JSON to '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read and parse every input. Unreadable or invalid files are logged and skipped.
///
/// A later file with the same base name replaces an earlier one.
pub fn merge_json_files(inputs: &[PathBuf]) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for path in inputs {
        match read_one(path) {
            Ok(value) => {
                let key = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                if outcome.combined.insert(key.clone(), value).is_some() {
                    log::warn!("'{}' replaces an earlier input with the same name", key);
                }
            }
            Err(reason) => {
                log::error!("Skipping '{}': {}", path.display(), reason);
                outcome.skipped.push(SkippedFile {
                    path: path.clone(),
                    reason,
                });
            }
        }
    }

    log::info!(
        "Merged {} of {} JSON files",
        outcome.combined.len(),
        inputs.len()
    );
    outcome
}

fn read_one(path: &Path) -> Result<Value, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("the file could not be read ({})", e))?;
    serde_json::from_str(&text).map_err(|e| format!("the file does not contain valid JSON ({})", e))
}

/// Write the combined document with four-space indentation.
pub fn write_merged(path: &Path, outcome: &MergeOutcome) -> Result<(), MergeError> {
    let to_error = |source| MergeError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    outcome
        .combined
        .serialize(&mut serializer)
        .map_err(|e| to_error(e.into()))?;
    writer.write_all(b"\n").map_err(to_error)?;
    writer.flush().map_err(to_error)
}
