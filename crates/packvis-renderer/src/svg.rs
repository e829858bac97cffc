//! SVG output for the canvas.

use std::fmt::Write;

use packvis_core::scene::{HAlign, VAlign};

use crate::painter::{Painter, TextStyle};
use crate::style::{Color, Stroke};

/// Builds an SVG document from painter calls.
pub struct SvgPainter {
    width: f64,
    height: f64,
    font_family: String,
    defs: String,
    body: String,
    clip_count: usize,
    open_clips: usize,
}

impl SvgPainter {
    pub fn new(width: f64, height: f64, font_family: &str) -> Self {
        Self {
            width,
            height,
            font_family: font_family.to_string(),
            defs: String::new(),
            body: String::new(),
            clip_count: 0,
            open_clips: 0,
        }
    }

    /// Close any open groups and return the document.
    pub fn finish(mut self) -> String {
        while self.open_clips > 0 {
            self.end_clip();
        }
        let mut svg = String::with_capacity(self.defs.len() + self.body.len() + 256);
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"{font}\">",
            w = self.width,
            h = self.height,
            font = escape_xml(&self.font_family)
        );
        if !self.defs.is_empty() {
            svg.push_str("  <defs>\n");
            svg.push_str(&self.defs);
            svg.push_str("  </defs>\n");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    fn indent(&self) -> String {
        "  ".repeat(self.open_clips + 1)
    }
}

impl Painter for SvgPainter {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Color, edge: Option<Stroke>) {
        let indent = self.indent();
        let _ = writeln!(
            self.body,
            "{}<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"{}/>",
            indent,
            x,
            y,
            width,
            height,
            fill.to_hex(),
            edge.map(|s| stroke_attrs(&s)).unwrap_or_default()
        );
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, stroke: Stroke) {
        let indent = self.indent();
        let _ = writeln!(
            self.body,
            "{}<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\"{}/>",
            indent,
            x,
            y,
            width,
            height,
            stroke_attrs(&stroke)
        );
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) {
        let indent = self.indent();
        let _ = writeln!(
            self.body,
            "{}<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"{}/>",
            indent,
            x1,
            y1,
            x2,
            y2,
            stroke_attrs(&stroke)
        );
    }

    fn circle(&mut self, cx: f64, cy: f64, radius: f64, fill: Color) {
        let indent = self.indent();
        let _ = writeln!(
            self.body,
            "{}<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"/>",
            indent,
            cx,
            cy,
            radius,
            fill.to_hex()
        );
    }

    fn text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        let anchor = match style.h_align {
            HAlign::Left => "start",
            HAlign::Center => "middle",
            HAlign::Right => "end",
        };
        let baseline = match style.v_align {
            VAlign::Baseline => "",
            VAlign::Middle => " dominant-baseline=\"central\"",
        };
        let rotation = if style.rotation != 0.0 {
            format!(" transform=\"rotate({} {:.2} {:.2})\"", style.rotation, x, y)
        } else {
            String::new()
        };
        let indent = self.indent();
        let _ = writeln!(
            self.body,
            "{}<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{}\"{}{}>{}</text>",
            indent,
            x,
            y,
            style.size,
            style.color.to_hex(),
            anchor,
            baseline,
            rotation,
            escape_xml(text)
        );
    }

    fn begin_clip(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.clip_count += 1;
        let id = format!("clip{}", self.clip_count);
        let _ = writeln!(
            self.defs,
            "    <clipPath id=\"{}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/></clipPath>",
            id, x, y, width, height
        );
        let indent = self.indent();
        let _ = writeln!(self.body, "{}<g clip-path=\"url(#{})\">", indent, id);
        self.open_clips += 1;
    }

    fn end_clip(&mut self) {
        if self.open_clips == 0 {
            return;
        }
        self.open_clips -= 1;
        let indent = self.indent();
        let _ = writeln!(self.body, "{}</g>", indent);
    }
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut attrs = format!(
        " stroke=\"{}\" stroke-width=\"{}\"",
        stroke.color.to_hex(),
        stroke.width
    );
    if let Some(dash) = stroke.dash_array() {
        let _ = write!(attrs, " stroke-dasharray=\"{}\"", dash);
    }
    attrs
}

pub fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
