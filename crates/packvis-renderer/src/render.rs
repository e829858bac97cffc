//! The `render` entry point: scene in, image or window out.

use std::fs;
use std::path::{Path, PathBuf};

use packvis_core::{Result, Scene, SceneSummary, Subject, VisError};
use serde::{Deserialize, Serialize};

use crate::display;
use crate::painter::paint;
use crate::raster;
use crate::style::RenderStyle;
use crate::svg::SvgPainter;
use crate::viewport::{CanvasTransform, Margins, Viewport};

/// Where a rendered canvas goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderMode {
    /// Show in a window and block until it is closed.
    Display,
    /// Write an image file; the format follows the extension.
    Export(PathBuf),
}

/// Echo of what was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    pub rectangle_count: usize,
    pub container_present: bool,
    pub usable_area_present: bool,
}

impl From<SceneSummary> for RenderResult {
    fn from(summary: SceneSummary) -> Self {
        Self {
            rectangle_count: summary.rectangle_count,
            container_present: summary.container_present,
            usable_area_present: summary.usable_area_present,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
}

impl ExportFormat {
    /// Format for a path, by case-insensitive extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(ExportFormat::Svg),
            "png" => Some(ExportFormat::Png),
            _ => None,
        }
    }
}

/// Draw `scene` on a fresh canvas whose axis limits are `[0, width] x [0, height]`.
///
/// Export errors are [`VisError::RenderTarget`]; display errors are
/// [`VisError::NoDisplay`]. The display probe runs before any drawing.
pub fn render(
    scene: &Scene,
    viewport: Viewport,
    mode: &RenderMode,
    style: &RenderStyle,
) -> Result<RenderResult> {
    match mode {
        RenderMode::Display => {
            display::probe_environment()?;
            let svg = render_svg(scene, viewport, style)?;
            let title = style.title.as_deref().unwrap_or("packvis");
            display::show_svg(&svg, title)?;
        }
        RenderMode::Export(path) => {
            let format = ExportFormat::from_path(path).ok_or_else(|| {
                VisError::render_target(path, "unsupported image format (expected .svg or .png)")
            })?;
            check_parent(path)?;
            let svg = render_svg(scene, viewport, style)?;
            let bytes = match format {
                ExportFormat::Svg => svg.into_bytes(),
                ExportFormat::Png => raster::rasterize(&svg)
                    .and_then(|pixmap| raster::encode_png(&pixmap))
                    .map_err(|e| VisError::render_target(path, e.to_string()))?,
            };
            fs::write(path, bytes).map_err(|e| VisError::render_target(path, e.to_string()))?;
            log::info!("Wrote {} ({} rectangles)", path.display(), scene.rectangle_count());
        }
    }
    Ok(scene.summary().into())
}

/// Build the SVG document for a scene.
pub fn render_svg(scene: &Scene, viewport: Viewport, style: &RenderStyle) -> Result<String> {
    if !viewport.is_valid() {
        return Err(VisError::EmptyContainer {
            width: viewport.width,
            height: viewport.height,
        });
    }
    let (canvas_w, canvas_h) = (style.figure_width as f64, style.figure_height as f64);
    let transform = CanvasTransform::fit(viewport, canvas_w, canvas_h, Margins::default())
        .ok_or_else(|| {
            VisError::degenerate(
                Subject::Container,
                format!(
                    "cannot fit a {} x {} layout into a {}x{} pixel figure",
                    viewport.width, viewport.height, style.figure_width, style.figure_height
                ),
            )
        })?;
    log::debug!(
        "Canvas {}x{} px, {:.3} px per layout unit",
        canvas_w,
        canvas_h,
        transform.scale()
    );

    let mut painter = SvgPainter::new(canvas_w, canvas_h, &style.font_family);
    paint(scene, &transform, style, &mut painter);
    Ok(painter.finish())
}

fn check_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => Err(
            VisError::render_target(path, format!("directory '{}' does not exist", parent.display())),
        ),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packvis_core::{build, normalize, AnchorMode, ContainerShape, Rectangle};
    use tempfile::TempDir;

    fn example_scene() -> Scene {
        let rects = [
            Rectangle::new(0.0, 0.0, 10.0, 5.0),
            Rectangle::new(10.0, 0.0, 5.0, 5.0),
        ];
        let container = ContainerShape::Bounds(Rectangle::new(0.0, 0.0, 20.0, 10.0));
        build(&normalize(&rects, &container, None, AnchorMode::BottomLeft).unwrap()).unwrap()
    }

    #[test]
    fn test_export_svg_and_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.svg");
        let result = render(
            &example_scene(),
            Viewport::new(20.0, 10.0),
            &RenderMode::Export(path.clone()),
            &RenderStyle::default(),
        )
        .unwrap();

        assert_eq!(
            result,
            RenderResult {
                rectangle_count: 2,
                container_present: true,
                usable_area_present: false,
            }
        );
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<clipPath"));
        assert!(svg.contains(">(10, 0)</text>"));
        assert!(svg.contains("X Coordinate"));
    }

    #[test]
    fn test_export_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.PNG");
        let style = RenderStyle::default().with_figure_size(320, 240);
        render(&example_scene(), Viewport::new(20.0, 10.0), &RenderMode::Export(path.clone()), &style)
            .unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.bmp");
        let err = render(
            &example_scene(),
            Viewport::new(20.0, 10.0),
            &RenderMode::Export(path.clone()),
            &RenderStyle::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "RenderTargetError");
        assert!(err.to_string().contains("layout.bmp"));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("layout.svg");
        let err = render(
            &example_scene(),
            Viewport::new(20.0, 10.0),
            &RenderMode::Export(path),
            &RenderStyle::default(),
        )
        .unwrap_err();
        assert!(matches!(err, VisError::RenderTarget { .. }));
    }

    #[test]
    fn test_invalid_viewport() {
        let err = render_svg(&example_scene(), Viewport::new(0.0, 10.0), &RenderStyle::default())
            .unwrap_err();
        assert_eq!(err.kind(), "EmptyContainerError");
    }

    #[test]
    fn test_far_rectangle_exports_finite_svg() {
        let rects = [Rectangle::new(1e307, 0.0, 1.0, 1.0)];
        let container = ContainerShape::Bounds(Rectangle::new(0.0, 0.0, 20.0, 10.0));
        let scene =
            build(&normalize(&rects, &container, None, AnchorMode::BottomLeft).unwrap()).unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("far.svg");
        let result = render(
            &scene,
            Viewport::new(20.0, 10.0),
            &RenderMode::Export(path.clone()),
            &RenderStyle::default(),
        )
        .unwrap();

        assert_eq!(result.rectangle_count, 1);
        let svg = fs::read_to_string(&path).unwrap();
        assert!(!svg.contains("inf"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_subnormal_viewport_is_an_error() {
        let container = ContainerShape::Size {
            width: 5e-324,
            height: 5e-324,
        };
        let scene =
            build(&normalize(&[], &container, None, AnchorMode::BottomLeft).unwrap()).unwrap();
        let err = render_svg(&scene, Viewport::new(5e-324, 5e-324), &RenderStyle::default())
            .unwrap_err();
        assert_eq!(err.kind(), "DegenerateGeometryError");
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[test]
    fn test_display_without_server_fails_before_drawing() {
        let headless = ["DISPLAY", "WAYLAND_DISPLAY"]
            .iter()
            .all(|name| std::env::var(name).map_or(true, |v| v.is_empty()));
        if !headless {
            return;
        }
        let err = render(
            &example_scene(),
            Viewport::new(20.0, 10.0),
            &RenderMode::Display,
            &RenderStyle::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "NoDisplayError");
    }

    #[test]
    fn test_figure_too_small() {
        let style = RenderStyle::default().with_figure_size(60, 60);
        let err = render_svg(&example_scene(), Viewport::new(20.0, 10.0), &style).unwrap_err();
        assert_eq!(err.kind(), "DegenerateGeometryError");
    }

    #[test]
    fn test_usable_area_absent_for_empty_shape() {
        let container = ContainerShape::Size {
            width: 1.0,
            height: 1.0,
        };
        let scene = build(&normalize(&[], &container, None, AnchorMode::TopLeft).unwrap()).unwrap();
        let svg = render_svg(&scene, Viewport::new(1.0, 1.0), &RenderStyle::default()).unwrap();
        let result: RenderResult = scene.summary().into();
        assert!(!result.usable_area_present);
        assert!(!result.container_present);
        assert!(!svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_result_json_names() {
        let result: RenderResult = example_scene().summary().into();
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rectangleCount": 2,
                "containerPresent": true,
                "usableAreaPresent": false
            })
        );
    }
}
