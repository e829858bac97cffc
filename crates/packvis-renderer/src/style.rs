use serde::{Deserialize, Serialize};

/// RGB color for canvas elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const GREEN: Self = Self::new(0, 128, 0);
    pub const LIGHT_BLUE: Self = Self::new(173, 216, 230);
    pub const LIGHT_GRAY: Self = Self::new(176, 176, 176);

    /// `#rrggbb` form used in SVG attributes.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Dash pattern for outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinePattern {
    Solid,
    Dashed,
    Dotted,
}

/// A stroke in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub pattern: LinePattern,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            pattern: LinePattern::Solid,
        }
    }

    /// SVG `stroke-dasharray` value, scaled with the stroke width.
    pub fn dash_array(&self) -> Option<String> {
        match self.pattern {
            LinePattern::Solid => None,
            LinePattern::Dashed => Some(format!("{} {}", self.width * 4.0, self.width * 2.0)),
            LinePattern::Dotted => Some(format!("{} {}", self.width, self.width * 2.0)),
        }
    }
}

/// Look of every element on the canvas. Sizes are in pixels.
///
/// Deserializes from partial documents; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub figure_width: u32,
    pub figure_height: u32,
    pub background: Color,
    pub font_family: String,
    pub title: Option<String>,

    pub rect_fill: Color,
    pub rect_edge: Stroke,

    pub anchor_color: Color,
    pub anchor_radius: f64,
    pub anchor_font_size: f64,

    pub index_color: Color,
    pub index_font_size: f64,

    pub container_edge: Stroke,
    pub container_center_color: Color,
    pub container_center_radius: f64,

    pub usable_area_edge: Stroke,

    pub grid_visible: bool,
    pub grid: Stroke,
    pub axis_color: Color,
    pub tick_font_size: f64,
    pub axis_title_font_size: f64,
    pub x_axis_title: String,
    pub y_axis_title: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            figure_width: 800,
            figure_height: 600,
            background: Color::WHITE,
            font_family: "sans-serif".to_string(),
            title: None,
            rect_fill: Color::LIGHT_BLUE,
            rect_edge: Stroke::solid(Color::BLUE, 2.0),
            anchor_color: Color::RED,
            anchor_radius: 3.0,
            anchor_font_size: 10.0,
            index_color: Color::BLACK,
            index_font_size: 13.0,
            container_edge: Stroke::solid(Color::BLACK, 1.5),
            container_center_color: Color::BLACK,
            container_center_radius: 3.0,
            usable_area_edge: Stroke {
                color: Color::GREEN,
                width: 1.5,
                pattern: LinePattern::Dashed,
            },
            grid_visible: true,
            grid: Stroke::solid(Color::LIGHT_GRAY, 0.8),
            axis_color: Color::BLACK,
            tick_font_size: 11.0,
            axis_title_font_size: 12.0,
            x_axis_title: "X Coordinate".to_string(),
            y_axis_title: "Y Coordinate".to_string(),
        }
    }
}

impl RenderStyle {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_figure_size(mut self, width: u32, height: u32) -> Self {
        self.figure_width = width;
        self.figure_height = height;
        self
    }
}
