use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// What a failure refers to, so messages can name the offending input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    /// A rectangle by its position in the input sequence.
    Rectangle(usize),
    RectangleList,
    Container,
    UsableArea,
    AnchorMode,
    /// A whole scene file, before its fields are looked at.
    SceneFile,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Rectangle(index) => write!(f, "rectangle #{}", index),
            Subject::RectangleList => f.write_str("rectangle list"),
            Subject::Container => f.write_str("container"),
            Subject::UsableArea => f.write_str("usable area"),
            Subject::AnchorMode => f.write_str("anchor mode"),
            Subject::SceneFile => f.write_str("scene file"),
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────

/// Every way a visualization can fail. None of these are recovered from.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisError {
    #[error("malformed {subject}: {message}")]
    MalformedInput { subject: Subject, message: String },

    #[error("empty container: width {width} and height {height} must both be positive")]
    EmptyContainer { width: f64, height: f64 },

    #[error("degenerate geometry for {subject}: {message}")]
    DegenerateGeometry { subject: Subject, message: String },

    #[error("cannot write image to '{}': {message}", .path.display())]
    RenderTarget { path: PathBuf, message: String },

    #[error("no display available: {0}")]
    NoDisplay(String),
}

impl VisError {
    pub fn malformed(subject: Subject, message: impl Into<String>) -> Self {
        VisError::MalformedInput {
            subject,
            message: message.into(),
        }
    }

    pub fn degenerate(subject: Subject, message: impl Into<String>) -> Self {
        VisError::DegenerateGeometry {
            subject,
            message: message.into(),
        }
    }

    pub fn render_target(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        VisError::RenderTarget {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Taxonomy name reported on the error channel.
    pub fn kind(&self) -> &'static str {
        match self {
            VisError::MalformedInput { .. } => "MalformedInputError",
            VisError::EmptyContainer { .. } => "EmptyContainerError",
            VisError::DegenerateGeometry { .. } => "DegenerateGeometryError",
            VisError::RenderTarget { .. } => "RenderTargetError",
            VisError::NoDisplay(_) => "NoDisplayError",
        }
    }
}

pub type Result<T> = std::result::Result<T, VisError>;
