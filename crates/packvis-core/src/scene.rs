//! Scene building: normalized geometry becomes an ordered list of drawable primitives.
//!
//! Primitives are emitted in layer passes so that no label is ever covered by a fill:
//! fills, then context outlines, then markers, then text.

use serde::Serialize;

use crate::error::{Result, Subject, VisError};
use crate::geometry::{BBox, ContainerShape, Point};
use crate::normalize::NormalizedScene;

/// Drawing pass a primitive belongs to. Scenes are sorted by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Layer {
    Fill,
    Outline,
    Marker,
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutlineRole {
    Container,
    UsableArea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerRole {
    /// Reported corner of the rectangle with this input index.
    Anchor(usize),
    ContainerCenter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextRole {
    /// `"(x, y)"` next to the reported corner.
    AnchorLabel(usize),
    /// Input index at the rectangle center.
    IndexLabel(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VAlign {
    Baseline,
    Middle,
}

/// One atomic drawing instruction in canonical space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Primitive {
    FilledRect {
        index: usize,
        origin: Point,
        width: f64,
        height: f64,
    },
    OutlineRect {
        role: OutlineRole,
        origin: Point,
        width: f64,
        height: f64,
    },
    Marker {
        role: MarkerRole,
        at: Point,
    },
    Text {
        role: TextRole,
        at: Point,
        text: String,
        h_align: HAlign,
        v_align: VAlign,
    },
}

impl Primitive {
    pub fn layer(&self) -> Layer {
        match self {
            Primitive::FilledRect { .. } => Layer::Fill,
            Primitive::OutlineRect { .. } => Layer::Outline,
            Primitive::Marker { .. } => Layer::Marker,
            Primitive::Text { .. } => Layer::Label,
        }
    }
}

/// Counts of what a scene draws, echoed back by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    pub rectangle_count: usize,
    pub container_present: bool,
    pub usable_area_present: bool,
}

/// An ordered, validated primitive list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    primitives: Vec<Primitive>,
}

impl Scene {
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn rectangle_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::FilledRect { .. }))
            .count()
    }

    pub fn has_container(&self) -> bool {
        self.has_outline(OutlineRole::Container)
    }

    pub fn has_usable_area(&self) -> bool {
        self.has_outline(OutlineRole::UsableArea)
    }

    fn has_outline(&self, wanted: OutlineRole) -> bool {
        self.primitives
            .iter()
            .any(|p| matches!(p, Primitive::OutlineRect { role, .. } if *role == wanted))
    }

    /// Center index labels as `(index, position, text)`, in emission order.
    pub fn index_labels(&self) -> Vec<(usize, Point, &str)> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Text {
                    role: TextRole::IndexLabel(index),
                    at,
                    text,
                    ..
                } => Some((*index, *at, text.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            rectangle_count: self.rectangle_count(),
            container_present: self.has_container(),
            usable_area_present: self.has_usable_area(),
        }
    }
}

/// Build the primitive list for a normalized scene.
///
/// Fails with [`VisError::DegenerateGeometry`] if any derived coordinate is
/// not finite (e.g. a center that overflows).
pub fn build(normalized: &NormalizedScene) -> Result<Scene> {
    let mut fills = Vec::with_capacity(normalized.rects.len());
    let mut outlines = Vec::new();
    let mut markers = Vec::with_capacity(normalized.rects.len() + 1);
    let mut labels = Vec::with_capacity(normalized.rects.len() * 2);

    for rect in &normalized.rects {
        let subject = Subject::Rectangle(rect.index);
        let center = rect.center();
        check_point(rect.origin, subject, "canonical corner")?;
        check_point(rect.bbox().max, subject, "far corner")?;
        check_point(center, subject, "center")?;

        fills.push(Primitive::FilledRect {
            index: rect.index,
            origin: rect.origin,
            width: rect.width,
            height: rect.height,
        });
        markers.push(Primitive::Marker {
            role: MarkerRole::Anchor(rect.index),
            at: rect.anchor,
        });
        labels.push(Primitive::Text {
            role: TextRole::AnchorLabel(rect.index),
            at: rect.anchor,
            text: format!("({}, {})", rect.anchor.x, rect.anchor.y),
            h_align: HAlign::Right,
            v_align: VAlign::Baseline,
        });
        labels.push(Primitive::Text {
            role: TextRole::IndexLabel(rect.index),
            at: center,
            text: rect.index.to_string(),
            h_align: HAlign::Center,
            v_align: VAlign::Middle,
        });
    }

    if let ContainerShape::Bounds(bounds) = &normalized.container {
        let bbox = BBox::from_origin(bounds.anchor(), bounds.w, bounds.h);
        let center = bbox.center();
        check_point(bbox.max, Subject::Container, "far corner")?;
        check_point(center, Subject::Container, "center")?;
        outlines.push(outline(OutlineRole::Container, &bbox));
        markers.push(Primitive::Marker {
            role: MarkerRole::ContainerCenter,
            at: center,
        });
    }

    if let Some(area) = &normalized.usable_area {
        check_point(area.max, Subject::UsableArea, "far corner")?;
        outlines.push(outline(OutlineRole::UsableArea, area));
    }

    let mut primitives = fills;
    primitives.append(&mut outlines);
    primitives.append(&mut markers);
    primitives.append(&mut labels);

    log::debug!(
        "Built scene with {} primitives for {} rectangles",
        primitives.len(),
        normalized.rects.len()
    );

    Ok(Scene { primitives })
}

fn outline(role: OutlineRole, bbox: &BBox) -> Primitive {
    Primitive::OutlineRect {
        role,
        origin: bbox.min,
        width: bbox.width(),
        height: bbox.height(),
    }
}

fn check_point(point: Point, subject: Subject, what: &str) -> Result<()> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(VisError::degenerate(
            subject,
            format!("{} ({}, {}) is not finite", what, point.x, point.y),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{AnchorMode, Rectangle};
    use crate::normalize::normalize;

    fn bounded(w: f64, h: f64) -> ContainerShape {
        ContainerShape::Bounds(Rectangle::new(0.0, 0.0, w, h))
    }

    fn scene_for(rects: &[Rectangle], mode: AnchorMode) -> Scene {
        let normalized = normalize(rects, &bounded(20.0, 10.0), None, mode).unwrap();
        build(&normalized).unwrap()
    }

    #[test]
    fn test_two_rectangle_example() {
        let scene = scene_for(
            &[
                Rectangle::new(0.0, 0.0, 10.0, 5.0),
                Rectangle::new(10.0, 0.0, 5.0, 5.0),
            ],
            AnchorMode::BottomLeft,
        );

        assert_eq!(scene.rectangle_count(), 2);
        let anchors: Vec<Point> = scene
            .primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Marker { role: MarkerRole::Anchor(_), at } => Some(*at),
                _ => None,
            })
            .collect();
        assert_eq!(anchors, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);

        let labels = scene.index_labels();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0], (0, Point::new(5.0, 2.5), "0"));
        assert_eq!(labels[1], (1, Point::new(12.5, 2.5), "1"));

        let outlines = scene
            .primitives()
            .iter()
            .filter(|p| matches!(p, Primitive::OutlineRect { role: OutlineRole::Container, .. }))
            .count();
        assert_eq!(outlines, 1);
        assert_eq!(
            scene.summary(),
            SceneSummary {
                rectangle_count: 2,
                container_present: true,
                usable_area_present: false,
            }
        );
    }

    #[test]
    fn test_layers_are_ordered() {
        let scene = scene_for(
            &[
                Rectangle::new(0.0, 0.0, 10.0, 5.0),
                Rectangle::new(10.0, 0.0, 5.0, 5.0),
            ],
            AnchorMode::BottomLeft,
        );
        let layers: Vec<Layer> = scene.primitives().iter().map(|p| p.layer()).collect();
        assert!(layers.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(layers.first(), Some(&Layer::Fill));
        assert_eq!(layers.last(), Some(&Layer::Label));
    }

    #[test]
    fn test_zero_area_rectangle() {
        let scene = scene_for(
            &[Rectangle::new(4.0, 4.0, 0.0, 0.0), Rectangle::new(1.0, 1.0, 6.0, 0.0)],
            AnchorMode::BottomLeft,
        );
        assert_eq!(scene.rectangle_count(), 2);
        let labels = scene.index_labels();
        assert_eq!(labels[0].1, Point::new(4.0, 4.0));
        assert_eq!(labels[1].1, Point::new(4.0, 1.0));
    }

    #[test]
    fn test_anchor_marker_uses_reported_corner() {
        let scene = scene_for(&[Rectangle::new(2.0, 9.0, 4.0, 3.0)], AnchorMode::TopLeft);
        let prims = scene.primitives();
        assert!(prims.contains(&Primitive::FilledRect {
            index: 0,
            origin: Point::new(2.0, 6.0),
            width: 4.0,
            height: 3.0,
        }));
        assert!(prims.contains(&Primitive::Marker {
            role: MarkerRole::Anchor(0),
            at: Point::new(2.0, 9.0),
        }));
        assert!(prims.contains(&Primitive::Text {
            role: TextRole::AnchorLabel(0),
            at: Point::new(2.0, 9.0),
            text: "(2, 9)".to_string(),
            h_align: HAlign::Right,
            v_align: VAlign::Baseline,
        }));
        assert_eq!(scene.index_labels()[0].1, Point::new(4.0, 7.5));
    }

    #[test]
    fn test_anchor_label_keeps_precision() {
        let scene = scene_for(&[Rectangle::new(0.125, 3.3, 1.0, 1.0)], AnchorMode::BottomLeft);
        let text = scene.primitives().iter().find_map(|p| match p {
            Primitive::Text { role: TextRole::AnchorLabel(0), text, .. } => Some(text.clone()),
            _ => None,
        });
        assert_eq!(text.as_deref(), Some("(0.125, 3.3)"));
    }

    #[test]
    fn test_index_fidelity_with_overlap() {
        let rects: Vec<Rectangle> = (0..7)
            .rev()
            .map(|i| Rectangle::new(i as f64, 0.0, 3.0, 3.0))
            .collect();
        let scene = scene_for(&rects, AnchorMode::BottomLeft);
        let labels = scene.index_labels();
        assert_eq!(labels.len(), 7);
        for (position, (index, _, text)) in labels.iter().enumerate() {
            assert_eq!(*index, position);
            assert_eq!(*text, position.to_string());
        }
    }

    #[test]
    fn test_usable_area_outline_and_size_only_container() {
        let area = Rectangle::new(1.0, 1.0, 18.0, 8.0);
        let sized = ContainerShape::Size { width: 20.0, height: 10.0 };
        let normalized = normalize(&[], &sized, Some(&area), AnchorMode::BottomLeft).unwrap();
        let scene = build(&normalized).unwrap();
        assert!(scene.has_usable_area());
        assert!(!scene.has_container());
        assert_eq!(scene.len(), 1);
        assert_eq!(
            scene.primitives()[0],
            Primitive::OutlineRect {
                role: OutlineRole::UsableArea,
                origin: Point::new(1.0, 1.0),
                width: 18.0,
                height: 8.0,
            }
        );
    }

    #[test]
    fn test_no_usable_area_primitive_when_absent() {
        let normalized =
            normalize(&[], &bounded(1.0, 1.0), None, AnchorMode::BottomLeft).unwrap();
        let scene = build(&normalized).unwrap();
        assert!(!scene.has_usable_area());
        assert!(scene.has_container());
        assert!(scene.primitives().contains(&Primitive::Marker {
            role: MarkerRole::ContainerCenter,
            at: Point::new(0.5, 0.5),
        }));
    }

    #[test]
    fn test_overflowing_center_is_degenerate() {
        let rects = [Rectangle::new(f64::MAX, 0.0, f64::MAX, 1.0)];
        let normalized =
            normalize(&rects, &bounded(20.0, 10.0), None, AnchorMode::BottomLeft).unwrap();
        let err = build(&normalized).unwrap_err();
        assert_eq!(err.kind(), "DegenerateGeometryError");
        assert!(err.to_string().contains("rectangle #0"));
    }
}
