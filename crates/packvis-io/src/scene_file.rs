use std::fs;
use std::path::{Path, PathBuf};

use packvis_core::normalize::{parse_container, parse_rectangles, parse_usable_area};
use packvis_core::{AnchorMode, LayoutInput, Result, Subject, VisError};
use packvis_renderer::RenderStyle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::document::read_json_file;

/// A saved render: the three payloads, the anchor convention and optional styling.
///
/// Geometry fields stay as raw JSON until [`SceneFile::into_input`] so that
/// validation reports the same rectangle-indexed messages as positional input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub rectangles: Option<Value>,
    #[serde(default)]
    pub container: Option<Value>,
    #[serde(default)]
    pub usable_area: Option<Value>,
    #[serde(default)]
    pub anchor_mode: Option<String>,
    #[serde(default)]
    pub style: Option<Value>,
}

impl SceneFile {
    pub fn load(path: &Path) -> Result<Self> {
        let value = read_json_file(path, Subject::SceneFile)?;
        serde_json::from_value(value).map_err(|e| {
            VisError::malformed(Subject::SceneFile, format!("'{}': {}", path.display(), e))
        })
    }

    /// Validate every field. `anchor` overrides the file's `anchor_mode`.
    pub fn into_input(self, anchor: Option<AnchorMode>) -> Result<(LayoutInput, Option<RenderStyle>)> {
        let anchor_mode = match (anchor, self.anchor_mode.as_deref()) {
            (Some(mode), _) => mode,
            (None, Some(text)) => text
                .parse()
                .map_err(|e: String| VisError::malformed(Subject::AnchorMode, e))?,
            (None, None) => {
                return Err(VisError::malformed(
                    Subject::AnchorMode,
                    "no anchor mode given (expected 'bottom-left' or 'top-left')",
                ))
            }
        };

        let rectangles = self
            .rectangles
            .ok_or_else(|| VisError::malformed(Subject::SceneFile, "missing field `rectangles`"))?;
        let container = self
            .container
            .ok_or_else(|| VisError::malformed(Subject::SceneFile, "missing field `container`"))?;

        let input = LayoutInput {
            rectangles: parse_rectangles(&rectangles)?,
            container: parse_container(&container)?,
            usable_area: match &self.usable_area {
                Some(value) => parse_usable_area(value)?,
                None => None,
            },
            anchor_mode,
        };

        let style = self
            .style
            .map(serde_json::from_value::<RenderStyle>)
            .transpose()
            .map_err(|e| VisError::malformed(Subject::SceneFile, format!("field `style`: {}", e)))?;

        Ok((input, style))
    }
}

/// Load and validate a scene file.
pub fn load_scene_file(
    path: &Path,
    anchor: Option<AnchorMode>,
) -> Result<(LayoutInput, Option<RenderStyle>)> {
    let (input, style) = SceneFile::load(path)?.into_input(anchor)?;
    log::info!(
        "Loaded scene file {} ({} rectangles, {})",
        path.display(),
        input.rectangles.len(),
        input.anchor_mode
    );
    Ok((input, style))
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read style settings '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid style settings in '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a style settings file. Missing fields take their defaults.
pub fn load_style(path: &Path) -> std::result::Result<RenderStyle, SettingsError> {
    let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
