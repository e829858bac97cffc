//! # packvis I/O
//!
//! Everything that touches the filesystem before rendering: reading the
//! serialized payloads, scene files and style settings, plus the JSON merge
//! utility that combines several documents into one.

pub mod document;
pub mod merge;
pub mod scene_file;

pub use document::{read_document, read_json_file};
pub use merge::{merge_json_files, write_merged, MergeError, MergeOutcome, SkippedFile};
pub use scene_file::{load_scene_file, load_style, SceneFile, SettingsError};
