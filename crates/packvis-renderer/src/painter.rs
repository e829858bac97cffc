//! Drawing seam between a scene and a concrete canvas.
//!
//! [`paint`] lays out the figure (background, grid, axes, titles) and walks the
//! scene in order; a [`Painter`] turns each call into output. All coordinates a
//! painter receives are canvas pixels with y growing downward.

use packvis_core::scene::{HAlign, MarkerRole, OutlineRole, Primitive, TextRole, VAlign};
use packvis_core::{Point, Scene};

use crate::style::{Color, RenderStyle, Stroke};
use crate::viewport::{format_tick, nice_step, ticks, CanvasTransform};

/// Font and placement of one text run.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub h_align: HAlign,
    pub v_align: VAlign,
    /// Clockwise rotation in degrees about the anchor point.
    pub rotation: f64,
}

/// Target of drawing calls. Implementations own their output.
pub trait Painter {
    /// Fill an axis-aligned box, optionally edged.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Color, edge: Option<Stroke>);

    /// Outline an axis-aligned box without filling it.
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, stroke: Stroke);

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke);

    /// Filled circle.
    fn circle(&mut self, cx: f64, cy: f64, radius: f64, fill: Color);

    fn text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle);

    /// Restrict subsequent drawing to a box until [`Painter::end_clip`].
    fn begin_clip(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn end_clip(&mut self);
}

/// Draw the whole figure for `scene` through `painter`.
pub fn paint<P: Painter>(scene: &Scene, transform: &CanvasTransform, style: &RenderStyle, painter: &mut P) {
    let (canvas_w, canvas_h) = transform.canvas_size();
    painter.fill_rect(0.0, 0.0, canvas_w, canvas_h, style.background, None);

    paint_axes(transform, style, painter);

    let (px, py, pw, ph) = transform.plot_rect();
    let band = Band::around(transform);
    painter.begin_clip(px, py, pw, ph);
    for primitive in scene.primitives() {
        paint_primitive(primitive, transform, &band, style, painter);
    }
    painter.end_clip();

    if let Some(title) = &style.title {
        painter.text(
            px + pw / 2.0,
            py - 12.0,
            title,
            &TextStyle {
                size: style.axis_title_font_size + 2.0,
                color: style.axis_color,
                h_align: HAlign::Center,
                v_align: VAlign::Baseline,
                rotation: 0.0,
            },
        );
    }
}

fn paint_primitive<P: Painter>(
    primitive: &Primitive,
    transform: &CanvasTransform,
    band: &Band,
    style: &RenderStyle,
    painter: &mut P,
) {
    match primitive {
        Primitive::FilledRect { origin, width, height, .. } => {
            if let Some((x, y, w, h)) = band.crop_layout_box(transform, origin, *width, *height) {
                painter.fill_rect(x, y, w, h, style.rect_fill, Some(style.rect_edge));
            }
        }
        Primitive::OutlineRect { role, origin, width, height } => {
            let stroke = match role {
                OutlineRole::Container => style.container_edge,
                OutlineRole::UsableArea => style.usable_area_edge,
            };
            if let Some((x, y, w, h)) = band.crop_layout_box(transform, origin, *width, *height) {
                painter.stroke_rect(x, y, w, h, stroke);
            }
        }
        Primitive::Marker { role, at } => {
            let (radius, color) = match role {
                MarkerRole::Anchor(_) => (style.anchor_radius, style.anchor_color),
                MarkerRole::ContainerCenter => {
                    (style.container_center_radius, style.container_center_color)
                }
            };
            let (x, y) = (transform.layout_to_screen_x(at.x), transform.layout_to_screen_y(at.y));
            if band.contains(x, y) {
                painter.circle(x, y, radius, color);
            }
        }
        Primitive::Text { role, at, text, h_align, v_align } => {
            let (size, color) = match role {
                TextRole::AnchorLabel(_) => (style.anchor_font_size, style.anchor_color),
                TextRole::IndexLabel(_) => (style.index_font_size, style.index_color),
            };
            let (x, y) = (transform.layout_to_screen_x(at.x), transform.layout_to_screen_y(at.y));
            if band.contains(x, y) {
                painter.text(
                    x,
                    y,
                    text,
                    &TextStyle {
                        size,
                        color,
                        h_align: *h_align,
                        v_align: *v_align,
                        rotation: 0.0,
                    },
                );
            }
        }
    }
}

/// Screen region that scene primitives are kept within.
///
/// It extends one canvas size beyond the plot area on every side. Everything
/// outside the plot area is clipped anyway, so boxes are cropped to the band
/// and points beyond it are dropped. Layout coordinates far from the
/// container can overflow to infinity once scaled; cropping keeps every
/// emitted coordinate finite.
struct Band {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Band {
    fn around(transform: &CanvasTransform) -> Self {
        let (px, py, pw, ph) = transform.plot_rect();
        let (canvas_w, canvas_h) = transform.canvas_size();
        Self {
            left: px - canvas_w,
            top: py - canvas_h,
            right: px + pw + canvas_w,
            bottom: py + ph + canvas_h,
        }
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Screen box `(x, y, width, height)` of a layout box, cropped to the band.
    fn crop_layout_box(
        &self,
        transform: &CanvasTransform,
        origin: &Point,
        width: f64,
        height: f64,
    ) -> Option<(f64, f64, f64, f64)> {
        let xs = [
            transform.layout_to_screen_x(origin.x),
            transform.layout_to_screen_x(origin.x + width),
        ];
        let ys = [
            transform.layout_to_screen_y(origin.y),
            transform.layout_to_screen_y(origin.y + height),
        ];
        if xs.iter().chain(ys.iter()).any(|v| v.is_nan()) {
            return None;
        }
        let (left, right) = (xs[0].min(xs[1]), xs[0].max(xs[1]));
        let (top, bottom) = (ys[0].min(ys[1]), ys[0].max(ys[1]));
        if right < self.left || left > self.right || bottom < self.top || top > self.bottom {
            return None;
        }
        let (left, right) = (left.max(self.left), right.min(self.right));
        let (top, bottom) = (top.max(self.top), bottom.min(self.bottom));
        Some((left, top, right - left, bottom - top))
    }
}

/// Grid, axis frame, tick labels and axis titles.
fn paint_axes<P: Painter>(transform: &CanvasTransform, style: &RenderStyle, painter: &mut P) {
    let viewport = transform.viewport();
    let step = nice_step(viewport.width.max(viewport.height));
    let (px, py, pw, ph) = transform.plot_rect();
    let bottom = py + ph;

    log::debug!(
        "Axes: {}x{} units at {:.3} px/unit, grid step {}",
        viewport.width,
        viewport.height,
        transform.scale(),
        step
    );

    let tick_style = |h_align, v_align| TextStyle {
        size: style.tick_font_size,
        color: style.axis_color,
        h_align,
        v_align,
        rotation: 0.0,
    };
    let tick_mark = Stroke::solid(style.axis_color, 1.0);

    for value in ticks(viewport.width, step) {
        let x = transform.layout_to_screen_x(value);
        if style.grid_visible {
            painter.line(x, py, x, bottom, style.grid);
        }
        painter.line(x, bottom, x, bottom + 4.0, tick_mark);
        painter.text(
            x,
            bottom + 6.0 + style.tick_font_size,
            &format_tick(value, step),
            &tick_style(HAlign::Center, VAlign::Baseline),
        );
    }

    for value in ticks(viewport.height, step) {
        let y = transform.layout_to_screen_y(value);
        if style.grid_visible {
            painter.line(px, y, px + pw, y, style.grid);
        }
        painter.line(px - 4.0, y, px, y, tick_mark);
        painter.text(
            px - 7.0,
            y,
            &format_tick(value, step),
            &tick_style(HAlign::Right, VAlign::Middle),
        );
    }

    painter.stroke_rect(px, py, pw, ph, Stroke::solid(style.axis_color, 1.0));

    let title_style = |rotation| TextStyle {
        size: style.axis_title_font_size,
        color: style.axis_color,
        h_align: HAlign::Center,
        v_align: VAlign::Middle,
        rotation,
    };
    painter.text(
        px + pw / 2.0,
        bottom + 2.0 * style.tick_font_size + 18.0,
        &style.x_axis_title,
        &title_style(0.0),
    );
    painter.text(
        px - 52.0,
        py + ph / 2.0,
        &style.y_axis_title,
        &title_style(-90.0),
    );
}
