//! Input normalization: serialized values in, validated canonical geometry out.
//!
//! Canonical space has its origin at the bottom-left with y growing upward.
//! The anchor-to-canonical conversion happens here and nowhere else.

use serde_json::{Map, Value};

use crate::error::{Result, Subject, VisError};
use crate::geometry::{AnchorMode, BBox, ContainerShape, Point, Rectangle};

/// The structured input of one render: named, typed fields validated once.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutInput {
    pub rectangles: Vec<Rectangle>,
    pub container: ContainerShape,
    pub usable_area: Option<Rectangle>,
    pub anchor_mode: AnchorMode,
}

impl LayoutInput {
    /// Parse the three serialized payloads.
    pub fn from_values(
        rectangles: &Value,
        container: &Value,
        usable_area: Option<&Value>,
        anchor_mode: AnchorMode,
    ) -> Result<Self> {
        Ok(Self {
            rectangles: parse_rectangles(rectangles)?,
            container: parse_container(container)?,
            usable_area: match usable_area {
                Some(value) => parse_usable_area(value)?,
                None => None,
            },
            anchor_mode,
        })
    }

    pub fn normalize(&self) -> Result<NormalizedScene> {
        normalize(
            &self.rectangles,
            &self.container,
            self.usable_area.as_ref(),
            self.anchor_mode,
        )
    }
}

/// A rectangle resolved into canonical space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRect {
    /// Position in the input sequence. Never renumbered.
    pub index: usize,
    /// The corner the packer reported.
    pub anchor: Point,
    /// Canonical bottom-left corner.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl NormalizedRect {
    pub fn bbox(&self) -> BBox {
        BBox::from_origin(self.origin, self.width, self.height)
    }

    pub fn center(&self) -> Point {
        self.bbox().center()
    }

    /// Recover the reported corner from the canonical one.
    pub fn reported_anchor(&self, mode: AnchorMode) -> Point {
        mode.to_reported(self.origin, self.height)
    }
}

/// Validated geometry ready for scene building.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedScene {
    pub rects: Vec<NormalizedRect>,
    pub container: ContainerShape,
    pub usable_area: Option<BBox>,
    pub anchor_mode: AnchorMode,
}

impl NormalizedScene {
    /// Canvas extent `(width, height)`, taken from the container.
    pub fn viewport_extent(&self) -> (f64, f64) {
        (self.container.width(), self.container.height())
    }

    pub fn rectangle_count(&self) -> usize {
        self.rects.len()
    }
}

/// Validate the typed input and resolve every rectangle into canonical space.
///
/// Rectangles may lie partly or fully outside the container; that is not an
/// error. Checks run container first, then usable area, then rectangles in
/// input order, and the first failure is returned.
pub fn normalize(
    rectangles: &[Rectangle],
    container: &ContainerShape,
    usable_area: Option<&Rectangle>,
    anchor_mode: AnchorMode,
) -> Result<NormalizedScene> {
    validate_container(container)?;

    // Reference shapes are always given bottom-left, in the container's frame.
    let usable_area = match usable_area {
        Some(area) => {
            validate_extent(area, Subject::UsableArea)?;
            Some(area.bbox(AnchorMode::BottomLeft))
        }
        None => None,
    };

    let rects = rectangles
        .iter()
        .enumerate()
        .map(|(index, rect)| {
            validate_extent(rect, Subject::Rectangle(index))?;
            Ok(NormalizedRect {
                index,
                anchor: rect.anchor(),
                origin: anchor_mode.to_canonical(rect.anchor(), rect.h),
                width: rect.w,
                height: rect.h,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "Normalized {} rectangles ({} anchors), container {}x{}",
        rects.len(),
        anchor_mode,
        container.width(),
        container.height()
    );

    Ok(NormalizedScene {
        rects,
        container: *container,
        usable_area,
        anchor_mode,
    })
}

fn validate_container(container: &ContainerShape) -> Result<()> {
    if let ContainerShape::Bounds(rect) = container {
        ensure_finite(rect, Subject::Container)?;
    }
    let (width, height) = (container.width(), container.height());
    if !width.is_finite() || !height.is_finite() {
        return Err(VisError::malformed(
            Subject::Container,
            format!("size {} x {} is not finite", width, height),
        ));
    }
    if width <= 0.0 || height <= 0.0 {
        return Err(VisError::EmptyContainer { width, height });
    }
    Ok(())
}

fn validate_extent(rect: &Rectangle, subject: Subject) -> Result<()> {
    ensure_finite(rect, subject)?;
    if rect.w < 0.0 {
        return Err(VisError::malformed(
            subject,
            format!("width {} is negative", rect.w),
        ));
    }
    if rect.h < 0.0 {
        return Err(VisError::malformed(
            subject,
            format!("height {} is negative", rect.h),
        ));
    }
    Ok(())
}

fn ensure_finite(rect: &Rectangle, subject: Subject) -> Result<()> {
    if rect.is_finite() {
        return Ok(());
    }
    for (name, value) in [("x", rect.x), ("y", rect.y), ("w", rect.w), ("h", rect.h)] {
        if !value.is_finite() {
            return Err(VisError::malformed(
                subject,
                format!("field `{}` is not finite ({})", name, value),
            ));
        }
    }
    Ok(())
}

// ── Parsing serialized values ─────────────────────────────────────────

/// Parse an ordered array of `{x, y, w, h}` records.
pub fn parse_rectangles(value: &Value) -> Result<Vec<Rectangle>> {
    let items = value.as_array().ok_or_else(|| {
        VisError::malformed(
            Subject::RectangleList,
            format!("expected an array of rectangles, found {}", value_kind(value)),
        )
    })?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_rectangle(item, Subject::Rectangle(index)))
        .collect()
}

/// Parse a container given as `{x, y, w, h}`, `{width, height}` or `[width, height]`.
pub fn parse_container(value: &Value) -> Result<ContainerShape> {
    let subject = Subject::Container;
    match value {
        Value::Array(items) => match items.as_slice() {
            [width, height] => Ok(ContainerShape::Size {
                width: width.as_f64().ok_or_else(|| {
                    VisError::malformed(subject, "width in [width, height] is not a number")
                })?,
                height: height.as_f64().ok_or_else(|| {
                    VisError::malformed(subject, "height in [width, height] is not a number")
                })?,
            }),
            _ => Err(VisError::malformed(
                subject,
                format!("expected [width, height], found {} elements", items.len()),
            )),
        },
        Value::Object(fields) if fields.contains_key("width") || fields.contains_key("height") => {
            Ok(ContainerShape::Size {
                width: number_field(fields, "width", subject)?,
                height: number_field(fields, "height", subject)?,
            })
        }
        Value::Object(_) => Ok(ContainerShape::Bounds(parse_rectangle(value, subject)?)),
        other => Err(VisError::malformed(
            subject,
            format!("expected a size or a rectangle, found {}", value_kind(other)),
        )),
    }
}

/// Parse an optional usable area; `null`, `{}` and `[]` all mean absent.
pub fn parse_usable_area(value: &Value) -> Result<Option<Rectangle>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) if items.is_empty() => Ok(None),
        Value::Object(fields) if fields.is_empty() => Ok(None),
        Value::Object(_) => parse_rectangle(value, Subject::UsableArea).map(Some),
        other => Err(VisError::malformed(
            Subject::UsableArea,
            format!("expected a rectangle or null, found {}", value_kind(other)),
        )),
    }
}

fn parse_rectangle(value: &Value, subject: Subject) -> Result<Rectangle> {
    let fields = value.as_object().ok_or_else(|| {
        VisError::malformed(
            subject,
            format!("expected an object with x, y, w, h, found {}", value_kind(value)),
        )
    })?;
    Ok(Rectangle::new(
        number_field(fields, "x", subject)?,
        number_field(fields, "y", subject)?,
        number_field(fields, "w", subject)?,
        number_field(fields, "h", subject)?,
    ))
}

fn number_field(fields: &Map<String, Value>, name: &str, subject: Subject) -> Result<f64> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(VisError::malformed(
            subject,
            format!("missing field `{}`", name),
        )),
        Some(value) => value.as_f64().ok_or_else(|| {
            VisError::malformed(subject, format!("field `{}` is not a number", name))
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn container() -> ContainerShape {
        ContainerShape::Bounds(Rectangle::new(0.0, 0.0, 20.0, 10.0))
    }

    #[test]
    fn test_bottom_left_keeps_anchor() {
        let rects = [Rectangle::new(10.0, 0.0, 5.0, 5.0)];
        let scene = normalize(&rects, &container(), None, AnchorMode::BottomLeft).unwrap();
        assert_eq!(scene.rects[0].origin, Point::new(10.0, 0.0));
        assert_eq!(scene.rects[0].anchor, Point::new(10.0, 0.0));
    }

    #[test]
    fn test_top_left_subtracts_height_once() {
        let rects = [Rectangle::new(2.0, 9.0, 4.0, 3.0)];
        let scene = normalize(&rects, &container(), None, AnchorMode::TopLeft).unwrap();
        let r = scene.rects[0];
        assert_eq!(r.anchor, Point::new(2.0, 9.0));
        assert_eq!(r.origin, Point::new(2.0, 6.0));
        assert!((r.origin.y + r.height - 9.0).abs() < 1e-10);
        assert_eq!(r.reported_anchor(AnchorMode::TopLeft), r.anchor);
    }

    #[test]
    fn test_empty_rectangles_are_valid() {
        let scene = normalize(&[], &container(), None, AnchorMode::BottomLeft).unwrap();
        assert_eq!(scene.rectangle_count(), 0);
        assert_eq!(scene.viewport_extent(), (20.0, 10.0));
    }

    #[test]
    fn test_rectangles_outside_container_accepted() {
        let rects = [Rectangle::new(-50.0, 100.0, 5.0, 5.0)];
        assert!(normalize(&rects, &container(), None, AnchorMode::BottomLeft).is_ok());
    }

    #[test]
    fn test_negative_width_rejected() {
        let rects = [
            Rectangle::new(0.0, 0.0, 1.0, 1.0),
            Rectangle::new(0.0, 0.0, -1.0, 1.0),
        ];
        let err = normalize(&rects, &container(), None, AnchorMode::BottomLeft).unwrap_err();
        assert_eq!(
            err,
            VisError::malformed(Subject::Rectangle(1), "width -1 is negative")
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let rects = [Rectangle::new(f64::NAN, 0.0, 1.0, 1.0)];
        let err = normalize(&rects, &container(), None, AnchorMode::BottomLeft).unwrap_err();
        assert_eq!(err.kind(), "MalformedInputError");
        assert!(err.to_string().contains("rectangle #0"));

        let rects = [
            Rectangle::new(0.0, 0.0, 1.0, 1.0),
            Rectangle::new(0.0, 0.0, 1.0, f64::INFINITY),
        ];
        let err = normalize(&rects, &container(), None, AnchorMode::BottomLeft).unwrap_err();
        assert_eq!(err.to_string(), "malformed rectangle #1: field `h` is not finite (inf)");
    }

    #[test]
    fn test_empty_container_rejected() {
        let sized = ContainerShape::Size { width: 0.0, height: 10.0 };
        let err = normalize(&[], &sized, None, AnchorMode::BottomLeft).unwrap_err();
        assert_eq!(err, VisError::EmptyContainer { width: 0.0, height: 10.0 });

        let bounded = ContainerShape::Bounds(Rectangle::new(0.0, 0.0, 5.0, -2.0));
        let err = normalize(&[], &bounded, None, AnchorMode::BottomLeft).unwrap_err();
        assert_eq!(err.kind(), "EmptyContainerError");
    }

    #[test]
    fn test_container_checked_before_rectangles() {
        let rects = [Rectangle::new(0.0, 0.0, -1.0, 1.0)];
        let sized = ContainerShape::Size { width: 0.0, height: 0.0 };
        let err = normalize(&rects, &sized, None, AnchorMode::BottomLeft).unwrap_err();
        assert_eq!(err.kind(), "EmptyContainerError");
    }

    #[test]
    fn test_usable_area_negative_rejected() {
        let area = Rectangle::new(1.0, 1.0, 5.0, -3.0);
        let err = normalize(&[], &container(), Some(&area), AnchorMode::TopLeft).unwrap_err();
        assert_eq!(
            err,
            VisError::malformed(Subject::UsableArea, "height -3 is negative")
        );
    }

    #[test]
    fn test_usable_area_stays_bottom_left() {
        let area = Rectangle::new(1.0, 1.0, 18.0, 8.0);
        let scene = normalize(&[], &container(), Some(&area), AnchorMode::TopLeft).unwrap();
        let bbox = scene.usable_area.unwrap();
        assert_eq!(bbox.min, Point::new(1.0, 1.0));
        assert_eq!(bbox.max, Point::new(19.0, 9.0));
    }

    #[test]
    fn test_parse_rectangles() {
        let rects = parse_rectangles(&json!([
            {"x": 0, "y": 0, "w": 10, "h": 5},
            {"x": 10.5, "y": 0, "w": 5, "h": 5, "id": "extra fields ignored"}
        ]))
        .unwrap();
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[1], Rectangle::new(10.5, 0.0, 5.0, 5.0));
    }

    #[test]
    fn test_parse_missing_and_non_numeric_fields() {
        let err = parse_rectangles(&json!([{"x": 0, "y": 0, "w": 1}])).unwrap_err();
        assert_eq!(err, VisError::malformed(Subject::Rectangle(0), "missing field `h`"));

        let err = parse_rectangles(&json!([{"x": 0, "y": 0, "w": 1, "h": 1}, {"x": "a", "y": 0, "w": 1, "h": 1}]))
            .unwrap_err();
        assert_eq!(
            err,
            VisError::malformed(Subject::Rectangle(1), "field `x` is not a number")
        );

        let err = parse_rectangles(&json!({"x": 0})).unwrap_err();
        assert!(matches!(
            err,
            VisError::MalformedInput { subject: Subject::RectangleList, .. }
        ));
    }

    #[test]
    fn test_parse_container_forms() {
        assert_eq!(
            parse_container(&json!([355, 180])).unwrap(),
            ContainerShape::Size { width: 355.0, height: 180.0 }
        );
        assert_eq!(
            parse_container(&json!({"width": 20, "height": 10})).unwrap(),
            ContainerShape::Size { width: 20.0, height: 10.0 }
        );
        assert_eq!(
            parse_container(&json!({"x": 0, "y": 0, "w": 20, "h": 10})).unwrap(),
            container()
        );
        assert!(parse_container(&json!([1, 2, 3])).is_err());
        assert!(parse_container(&json!({"width": 20})).is_err());
        assert!(parse_container(&json!("20x10")).is_err());
    }

    #[test]
    fn test_parse_usable_area_absent_forms() {
        assert_eq!(parse_usable_area(&json!(null)).unwrap(), None);
        assert_eq!(parse_usable_area(&json!({})).unwrap(), None);
        assert_eq!(parse_usable_area(&json!([])).unwrap(), None);
        assert_eq!(
            parse_usable_area(&json!({"x": 1, "y": 1, "w": 2, "h": 2})).unwrap(),
            Some(Rectangle::new(1.0, 1.0, 2.0, 2.0))
        );
        assert!(parse_usable_area(&json!(7)).is_err());
    }

    #[test]
    fn test_layout_input_from_values() {
        let input = LayoutInput::from_values(
            &json!([{"x": 0, "y": 5, "w": 10, "h": 5}]),
            &json!([20, 10]),
            Some(&json!(null)),
            AnchorMode::TopLeft,
        )
        .unwrap();
        assert!(input.usable_area.is_none());
        let scene = input.normalize().unwrap();
        assert_eq!(scene.rects[0].origin, Point::new(0.0, 0.0));
    }
}
