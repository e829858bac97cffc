use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A 2D point in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned bounding box in canonical space (y up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    /// Box anchored at its lower-left corner.
    pub fn from_origin(origin: Point, width: f64, height: f64) -> Self {
        Self {
            min: origin,
            max: origin.translate(width, height),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min.x + self.width() / 2.0,
            self.min.y + self.height() / 2.0,
        )
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Which corner the `(x, y)` of a [`Rectangle`] refers to.
///
/// The same `{x, y, w, h}` record means different things under each mode, so
/// the mode always comes from the caller and is never guessed from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorMode {
    BottomLeft,
    TopLeft,
}

impl AnchorMode {
    /// Canonical bottom-left corner of a box reported at `anchor`.
    pub fn to_canonical(self, anchor: Point, height: f64) -> Point {
        match self {
            AnchorMode::BottomLeft => anchor,
            AnchorMode::TopLeft => Point::new(anchor.x, anchor.y - height),
        }
    }

    /// Inverse of [`AnchorMode::to_canonical`].
    pub fn to_reported(self, origin: Point, height: f64) -> Point {
        match self {
            AnchorMode::BottomLeft => origin,
            AnchorMode::TopLeft => Point::new(origin.x, origin.y + height),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnchorMode::BottomLeft => "bottom-left",
            AnchorMode::TopLeft => "top-left",
        }
    }
}

impl fmt::Display for AnchorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnchorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bottom-left" | "bottom_left" | "bottomleft" | "bl" => Ok(AnchorMode::BottomLeft),
            "top-left" | "top_left" | "topleft" | "tl" => Ok(AnchorMode::TopLeft),
            other => Err(format!(
                "unknown anchor mode '{}', expected 'bottom-left' or 'top-left'",
                other
            )),
        }
    }
}

/// A packed rectangle as reported by a packer: anchor corner plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// The reported `(x, y)` corner.
    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }

    /// Bounds in canonical space, interpreting `(x, y)` with `mode`.
    pub fn bbox(&self, mode: AnchorMode) -> BBox {
        BBox::from_origin(mode.to_canonical(self.anchor(), self.h), self.w, self.h)
    }
}

/// The outer shape a layout is packed into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContainerShape {
    /// Explicit bounds; drawn as an outline with a center marker.
    Bounds(Rectangle),
    /// Size only; sets the canvas extent and draws nothing.
    Size { width: f64, height: f64 },
}

impl ContainerShape {
    pub fn width(&self) -> f64 {
        match self {
            ContainerShape::Bounds(r) => r.w,
            ContainerShape::Size { width, .. } => *width,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            ContainerShape::Bounds(r) => r.h,
            ContainerShape::Size { height, .. } => *height,
        }
    }

    pub fn bounds(&self) -> Option<&Rectangle> {
        match self {
            ContainerShape::Bounds(r) => Some(r),
            ContainerShape::Size { .. } => None,
        }
    }
}
