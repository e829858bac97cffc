use serde::{Deserialize, Serialize};

/// Axis limits of the canvas: `[0, width] x [0, height]` in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn from_extent((width, height): (f64, f64)) -> Self {
        Self::new(width, height)
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Space reserved around the plot area for tick labels, axis titles and the title.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 70.0,
            right: 20.0,
            top: 40.0,
            bottom: 60.0,
        }
    }
}

/// Maps layout coordinates (y up) to canvas pixels (y down).
///
/// One scale factor serves both axes, so a layout unit spans the same number
/// of pixels horizontally and vertically. The plot area is centred in the
/// space left after margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    viewport: Viewport,
    /// Pixels per layout unit.
    scale: f64,
    /// Screen position of layout `(0, viewport.height)`.
    offset_x: f64,
    offset_y: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl CanvasTransform {
    /// Fit `viewport` into a `canvas_width x canvas_height` pixel canvas.
    ///
    /// Returns `None` if the viewport is empty, no pixels remain after margins,
    /// or the viewport is too small for a finite scale.
    pub fn fit(
        viewport: Viewport,
        canvas_width: f64,
        canvas_height: f64,
        margins: Margins,
    ) -> Option<Self> {
        if !viewport.is_valid() {
            return None;
        }
        let plot_w = canvas_width - margins.left - margins.right;
        let plot_h = canvas_height - margins.top - margins.bottom;
        if plot_w <= 0.0 || plot_h <= 0.0 {
            return None;
        }

        let scale = (plot_w / viewport.width).min(plot_h / viewport.height);
        if !scale.is_finite() {
            return None;
        }
        let used_w = viewport.width * scale;
        let used_h = viewport.height * scale;

        Some(Self {
            viewport,
            scale,
            offset_x: margins.left + (plot_w - used_w) / 2.0,
            offset_y: margins.top + (plot_h - used_h) / 2.0,
            canvas_width,
            canvas_height,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Pixels per layout unit, identical for both axes.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }

    /// Convert layout X coordinate to screen coordinate.
    pub fn layout_to_screen_x(&self, layout_x: f64) -> f64 {
        self.offset_x + layout_x * self.scale
    }

    /// Convert layout Y coordinate to screen coordinate.
    pub fn layout_to_screen_y(&self, layout_y: f64) -> f64 {
        self.offset_y + (self.viewport.height - layout_y) * self.scale
    }

    /// Convert screen X coordinate to layout coordinate.
    pub fn screen_to_layout_x(&self, screen_x: f64) -> f64 {
        (screen_x - self.offset_x) / self.scale
    }

    /// Convert screen Y coordinate to layout coordinate.
    pub fn screen_to_layout_y(&self, screen_y: f64) -> f64 {
        self.viewport.height - (screen_y - self.offset_y) / self.scale
    }

    /// Screen-space box `(x, y, width, height)` of a layout box anchored at its lower-left corner.
    pub fn layout_rect_to_screen(&self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64, f64, f64) {
        (
            self.layout_to_screen_x(x),
            self.layout_to_screen_y(y + height),
            width * self.scale,
            height * self.scale,
        )
    }

    /// The plot area (axis limits) in screen space.
    pub fn plot_rect(&self) -> (f64, f64, f64, f64) {
        self.layout_rect_to_screen(0.0, 0.0, self.viewport.width, self.viewport.height)
    }
}

/// Grid step of the form 1, 2 or 5 times a power of ten, giving about six divisions.
pub fn nice_step(range: f64) -> f64 {
    if !range.is_finite() || range <= 0.0 {
        return 1.0;
    }
    let raw = range / 6.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let step = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    let step = step * magnitude;
    if step.is_finite() && step > 0.0 {
        step
    } else {
        range
    }
}

/// Tick positions from 0 to `extent` inclusive.
pub fn ticks(extent: f64, step: f64) -> Vec<f64> {
    if !(extent > 0.0 && step > 0.0) {
        return vec![0.0];
    }
    let count = (extent / step + 1e-9).floor() as usize;
    (0..=count).map(|k| k as f64 * step).collect()
}

const MAX_TICK_DECIMALS: usize = 17;

/// Tick label with as many decimals as the step needs.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        ((-step.log10().floor()) as usize).min(MAX_TICK_DECIMALS)
    };
    format!("{:.*}", decimals, value)
}
