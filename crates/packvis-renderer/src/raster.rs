//! SVG to pixel conversion.

use thiserror::Error;
use tiny_skia::{Pixmap, Transform};

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("failed to parse generated SVG: {0}")]
    Parse(String),

    #[error("failed to allocate {width}x{height} pixel surface")]
    Allocate { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    Encode(String),
}

/// Rasterize an SVG document at its own pixel size.
pub fn rasterize(svg: &str) -> Result<Pixmap, RasterError> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| RasterError::Parse(e.to_string()))?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::Allocate { width, height })?;

    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    log::debug!("Rasterized canvas at {}x{}", width, height);
    Ok(pixmap)
}

pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RasterError> {
    pixmap
        .encode_png()
        .map_err(|e| RasterError::Encode(e.to_string()))
}
