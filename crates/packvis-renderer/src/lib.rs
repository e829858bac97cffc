//! # packvis Renderer
//!
//! Draws a [`packvis_core::Scene`] on an equal-aspect canvas with a reference
//! grid and numeric axes, then either writes it to an SVG or PNG file or shows
//! it in a native window.
//!
//! Drawing goes through the [`Painter`] trait; [`SvgPainter`] is the only
//! painter, and PNG output and the window both rasterize its SVG.

pub mod display;
pub mod painter;
pub mod raster;
pub mod render;
pub mod style;
pub mod svg;
pub mod viewport;

pub use painter::{paint, Painter, TextStyle};
pub use render::{render, render_svg, ExportFormat, RenderMode, RenderResult};
pub use style::{Color, LinePattern, RenderStyle, Stroke};
pub use svg::SvgPainter;
pub use viewport::{CanvasTransform, Margins, Viewport};
