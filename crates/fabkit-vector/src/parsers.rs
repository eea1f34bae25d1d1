//! Per-tag parsers that normalize elements into canonical shapes.
//!
//! Each parser reads its element's pre-coerced attributes and drives a
//! [`PathBuilder`] to emit geometry in the element's local coordinate
//! space; the flattening pass is responsible for lifting the result into
//! root space. Dispatch is one exhaustive `match` over [`TagKind`], so
//! coverage of new kinds is checked at compile time.
//!
//! Data irregularities never abort parsing: missing or malformed numeric
//! attributes fall back to 0, out-of-range radii are clamped, and an odd
//! trailing coordinate in a point list is ignored.

use std::collections::HashMap;

use fabkit_core::{Point, CIRCLE_KAPPA};

use crate::element::{AttrValue, ElementNode, TagKind};
use crate::path::{Shape, StyleValue};
use crate::path_builder::PathBuilder;

/// Style attributes copied verbatim from the element onto the shape.
const STYLE_KEYS: &[&str] = &["fill", "stroke", "stroke-width", "opacity"];

/// Produces the canonical shape for one element, or `None` for kinds that
/// emit no geometry of their own (containers and definition blocks).
pub fn parse_element(node: &ElementNode) -> Option<Shape> {
    match node.tag {
        // Containers carry structure, not geometry; the flattener recurses
        // into them. Defs subtrees additionally have their visibility
        // suppressed there.
        TagKind::Svg | TagKind::Group | TagKind::Defs => None,
        TagKind::Rect => Some(parse_rect(node)),
        TagKind::Polygon => Some(parse_poly(node, true)),
        TagKind::Polyline => Some(parse_poly(node, false)),
        TagKind::Line => Some(parse_line(node)),
        TagKind::Circle => Some(parse_circle(node)),
        TagKind::Ellipse => Some(parse_ellipse(node)),
    }
}

/// Resolves the attributes every geometric element shares: the visibility
/// flag and the pass-through style keys.
fn resolve_common(node: &ElementNode) -> (bool, HashMap<String, StyleValue>) {
    let visible = node.text_attr("visibility") != Some("hidden")
        && node.text_attr("display") != Some("none");

    let mut style = HashMap::new();
    for key in STYLE_KEYS {
        match node.attributes.get(*key) {
            Some(AttrValue::Text(s)) => {
                style.insert(key.to_string(), StyleValue::Text(s.clone()));
            }
            Some(AttrValue::Number(v)) => {
                style.insert(key.to_string(), StyleValue::Number(*v));
            }
            _ => {}
        }
    }
    (visible, style)
}

/// Resolves the rect corner radii: a missing radius mirrors the other one,
/// negatives clamp to zero, and each radius is capped at half of its
/// dimension.
fn resolve_corner_radii(node: &ElementNode, width: f64, height: f64) -> (f64, f64) {
    let rx = node.opt_number_attr("rx");
    let ry = node.opt_number_attr("ry");
    let (rx, ry) = match (rx, ry) {
        (None, None) => (0.0, 0.0),
        (Some(rx), None) => (rx, rx),
        (None, Some(ry)) => (ry, ry),
        (Some(rx), Some(ry)) => (rx, ry),
    };
    (
        rx.max(0.0).min(width / 2.0),
        ry.max(0.0).min(height / 2.0),
    )
}

fn parse_rect(node: &ElementNode) -> Shape {
    let (visible, style) = resolve_common(node);
    let x = node.number_attr("x", 0.0);
    let y = node.number_attr("y", 0.0);
    let width = node.number_attr("width", 0.0).max(0.0);
    let height = node.number_attr("height", 0.0).max(0.0);
    let (rx, ry) = resolve_corner_radii(node, width, height);

    let mut builder = PathBuilder::new();
    if rx > 0.0 && ry > 0.0 {
        // Quarter-circle corners approximated with one cubic each, using
        // the standard control-point offset of radius * kappa.
        let kx = rx * CIRCLE_KAPPA;
        let ky = ry * CIRCLE_KAPPA;
        builder.move_to(Point::new(x + rx, y));
        builder.line_to(Point::new(x + width - rx, y));
        builder.cubic_bezier_to(
            Point::new(x + width - rx + kx, y),
            Point::new(x + width, y + ry - ky),
            Point::new(x + width, y + ry),
        );
        builder.line_to(Point::new(x + width, y + height - ry));
        builder.cubic_bezier_to(
            Point::new(x + width, y + height - ry + ky),
            Point::new(x + width - rx + kx, y + height),
            Point::new(x + width - rx, y + height),
        );
        builder.line_to(Point::new(x + rx, y + height));
        builder.cubic_bezier_to(
            Point::new(x + rx - kx, y + height),
            Point::new(x, y + height - ry + ky),
            Point::new(x, y + height - ry),
        );
        builder.line_to(Point::new(x, y + ry));
        builder.cubic_bezier_to(
            Point::new(x, y + ry - ky),
            Point::new(x + rx - kx, y),
            Point::new(x + rx, y),
        );
    } else {
        // Sharp corners: three stored edges, the fourth is the implicit
        // closing edge back to the start point.
        builder.move_to(Point::new(x, y));
        builder.line_to(Point::new(x + width, y));
        builder.line_to(Point::new(x + width, y + height));
        builder.line_to(Point::new(x, y + height));
    }
    builder.commit_path(true);
    builder.build_shape(visible, style)
}

/// Shared body of the polygon and polyline parsers; they differ only in
/// whether the contour is committed closed.
fn parse_poly(node: &ElementNode, close: bool) -> Shape {
    let (visible, style) = resolve_common(node);
    let coords = node.number_list_attr("points").unwrap_or(&[]);
    // Odd trailing value has no partner and is dropped.
    let pairs = coords.chunks_exact(2);

    let mut builder = PathBuilder::new();
    let mut started = false;
    for pair in pairs {
        let p = Point::new(pair[0], pair[1]);
        if started {
            builder.line_to(p);
        } else {
            builder.move_to(p);
            started = true;
        }
    }
    if started {
        builder.commit_path(close);
    }
    // Zero pairs leaves an empty path: a degenerate but valid shape.
    builder.build_shape(visible, style)
}

fn parse_line(node: &ElementNode) -> Shape {
    let (visible, style) = resolve_common(node);
    let x1 = node.number_attr("x1", 0.0);
    let y1 = node.number_attr("y1", 0.0);
    let x2 = node.number_attr("x2", 0.0);
    let y2 = node.number_attr("y2", 0.0);

    let mut builder = PathBuilder::new();
    builder.move_to(Point::new(x1, y1));
    builder.line_to(Point::new(x2, y2));
    builder.commit_path(false);
    builder.build_shape(visible, style)
}

fn parse_circle(node: &ElementNode) -> Shape {
    let (visible, style) = resolve_common(node);
    let cx = node.number_attr("cx", 0.0);
    let cy = node.number_attr("cy", 0.0);
    let r = node.number_attr("r", 0.0).max(0.0);

    let mut builder = PathBuilder::new();
    emit_ellipse_contour(&mut builder, cx, cy, r, r);
    builder.build_shape(visible, style)
}

fn parse_ellipse(node: &ElementNode) -> Shape {
    let (visible, style) = resolve_common(node);
    let cx = node.number_attr("cx", 0.0);
    let cy = node.number_attr("cy", 0.0);
    // Radii follow the rect mirror rule: one given radius stands in for a
    // missing other.
    let rx = node.opt_number_attr("rx");
    let ry = node.opt_number_attr("ry");
    let (rx, ry) = match (rx, ry) {
        (None, None) => (0.0, 0.0),
        (Some(rx), None) => (rx, rx),
        (None, Some(ry)) => (ry, ry),
        (Some(rx), Some(ry)) => (rx, ry),
    };

    let mut builder = PathBuilder::new();
    emit_ellipse_contour(&mut builder, cx, cy, rx.max(0.0), ry.max(0.0));
    builder.build_shape(visible, style)
}

/// Emits a closed ellipse contour as four quarter-arc cubics. A zero
/// radius degenerates to a single-point closed subpath.
fn emit_ellipse_contour(builder: &mut PathBuilder, cx: f64, cy: f64, rx: f64, ry: f64) {
    if rx == 0.0 && ry == 0.0 {
        builder.move_to(Point::new(cx, cy));
        builder.commit_path(true);
        return;
    }
    let kx = rx * CIRCLE_KAPPA;
    let ky = ry * CIRCLE_KAPPA;
    builder.move_to(Point::new(cx + rx, cy));
    builder.cubic_bezier_to(
        Point::new(cx + rx, cy + ky),
        Point::new(cx + kx, cy + ry),
        Point::new(cx, cy + ry),
    );
    builder.cubic_bezier_to(
        Point::new(cx - kx, cy + ry),
        Point::new(cx - rx, cy + ky),
        Point::new(cx - rx, cy),
    );
    builder.cubic_bezier_to(
        Point::new(cx - rx, cy - ky),
        Point::new(cx - kx, cy - ry),
        Point::new(cx, cy - ry),
    );
    builder.cubic_bezier_to(
        Point::new(cx + kx, cy - ry),
        Point::new(cx + rx, cy - ky),
        Point::new(cx + rx, cy),
    );
    builder.commit_path(true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Segment;

    fn rect_node(x: f64, y: f64, w: f64, h: f64) -> ElementNode {
        ElementNode::new(TagKind::Rect)
            .with_number("x", x)
            .with_number("y", y)
            .with_number("width", w)
            .with_number("height", h)
    }

    #[test]
    fn sharp_rect_is_three_edges_closed() {
        let shape = parse_element(&rect_node(0.0, 0.0, 10.0, 5.0)).unwrap();
        assert_eq!(shape.path.subpaths.len(), 1);
        let sub = &shape.path.subpaths[0];
        assert!(sub.closed);
        assert_eq!(sub.start, Point::new(0.0, 0.0));
        let expected = [
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(0.0, 5.0),
        ];
        assert_eq!(sub.segments.len(), expected.len());
        for (segment, want) in sub.segments.iter().zip(expected) {
            match segment {
                Segment::Line { to } => assert_eq!(*to, want),
                other => panic!("expected line segment, got {:?}", other),
            }
        }
    }

    #[test]
    fn rect_attributes_default_to_zero() {
        let shape = parse_element(&ElementNode::new(TagKind::Rect)).unwrap();
        let sub = &shape.path.subpaths[0];
        assert_eq!(sub.start, Point::new(0.0, 0.0));
        assert!(sub.segments.iter().all(|s| s.end_point() == Point::new(0.0, 0.0)));
    }

    #[test]
    fn rounded_rect_has_eight_segments() {
        let node = rect_node(0.0, 0.0, 20.0, 10.0).with_number("rx", 2.0);
        let shape = parse_element(&node).unwrap();
        let sub = &shape.path.subpaths[0];
        assert!(sub.closed);
        assert_eq!(sub.segments.len(), 8);
        let cubics = sub
            .segments
            .iter()
            .filter(|s| matches!(s, Segment::CubicBezier { .. }))
            .count();
        assert_eq!(cubics, 4);
        // Mirror rule: ry takes rx's value, so the contour starts at (rx, 0).
        assert_eq!(sub.start, Point::new(2.0, 0.0));
    }

    #[test]
    fn rounded_corner_control_points_follow_kappa() {
        let node = rect_node(0.0, 0.0, 20.0, 10.0)
            .with_number("rx", 4.0)
            .with_number("ry", 4.0);
        let shape = parse_element(&node).unwrap();
        let sub = &shape.path.subpaths[0];
        // First corner: from (16, 0) to (20, 4).
        match sub.segments[1] {
            Segment::CubicBezier { c1, c2, to } => {
                let k = 4.0 * CIRCLE_KAPPA;
                assert!((c1.x - (16.0 + k)).abs() < 1e-9);
                assert_eq!(c1.y, 0.0);
                assert_eq!(c2.x, 20.0);
                assert!((c2.y - (4.0 - k)).abs() < 1e-9);
                assert_eq!(to, Point::new(20.0, 4.0));
            }
            other => panic!("expected corner cubic, got {:?}", other),
        }
    }

    #[test]
    fn oversized_radius_clamps_to_half_dimension() {
        let big = rect_node(0.0, 0.0, 10.0, 6.0)
            .with_number("rx", 50.0)
            .with_number("ry", 50.0);
        let clamped = rect_node(0.0, 0.0, 10.0, 6.0)
            .with_number("rx", 5.0)
            .with_number("ry", 3.0);
        assert_eq!(
            parse_element(&big).unwrap().path,
            parse_element(&clamped).unwrap().path
        );
    }

    #[test]
    fn negative_radius_clamps_to_sharp() {
        let node = rect_node(0.0, 0.0, 10.0, 6.0).with_number("rx", -3.0);
        let shape = parse_element(&node).unwrap();
        assert_eq!(shape.path.subpaths[0].segments.len(), 3);
    }

    #[test]
    fn polygon_closes_contour() {
        let node = ElementNode::new(TagKind::Polygon).with_attr(
            "points",
            AttrValue::NumberList(vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0]),
        );
        let shape = parse_element(&node).unwrap();
        let sub = &shape.path.subpaths[0];
        assert!(sub.closed);
        assert_eq!(sub.start, Point::new(0.0, 0.0));
        assert_eq!(sub.segments.len(), 2);
        assert_eq!(sub.segments[1].end_point(), Point::new(10.0, 10.0));
    }

    #[test]
    fn polygon_ignores_odd_trailing_value() {
        let node = ElementNode::new(TagKind::Polygon).with_attr(
            "points",
            AttrValue::NumberList(vec![0.0, 0.0, 4.0, 0.0, 99.0]),
        );
        let shape = parse_element(&node).unwrap();
        assert_eq!(shape.path.subpaths[0].segments.len(), 1);
    }

    #[test]
    fn single_point_polygon_is_degenerate_not_error() {
        let node = ElementNode::new(TagKind::Polygon)
            .with_attr("points", AttrValue::NumberList(vec![3.0, 4.0]));
        let shape = parse_element(&node).unwrap();
        let sub = &shape.path.subpaths[0];
        assert!(sub.closed);
        assert_eq!(sub.start, Point::new(3.0, 4.0));
        assert!(sub.segments.is_empty());
    }

    #[test]
    fn empty_polygon_yields_empty_path() {
        let node = ElementNode::new(TagKind::Polygon)
            .with_attr("points", AttrValue::NumberList(vec![]));
        let shape = parse_element(&node).unwrap();
        assert!(shape.path.is_empty());
    }

    #[test]
    fn polyline_stays_open() {
        let node = ElementNode::new(TagKind::Polyline).with_attr(
            "points",
            AttrValue::NumberList(vec![0.0, 0.0, 5.0, 5.0, 10.0, 0.0]),
        );
        let shape = parse_element(&node).unwrap();
        let sub = &shape.path.subpaths[0];
        assert!(!sub.closed);
        assert_eq!(sub.segments.len(), 2);
    }

    #[test]
    fn line_emits_single_open_segment() {
        let node = ElementNode::new(TagKind::Line)
            .with_number("x1", 1.0)
            .with_number("y1", 2.0)
            .with_number("x2", 3.0)
            .with_number("y2", 4.0);
        let shape = parse_element(&node).unwrap();
        let sub = &shape.path.subpaths[0];
        assert!(!sub.closed);
        assert_eq!(sub.start, Point::new(1.0, 2.0));
        assert_eq!(sub.segments.len(), 1);
        assert_eq!(sub.segments[0].end_point(), Point::new(3.0, 4.0));
    }

    #[test]
    fn circle_is_four_cubics() {
        let node = ElementNode::new(TagKind::Circle)
            .with_number("cx", 5.0)
            .with_number("cy", 5.0)
            .with_number("r", 3.0);
        let shape = parse_element(&node).unwrap();
        let sub = &shape.path.subpaths[0];
        assert!(sub.closed);
        assert_eq!(sub.segments.len(), 4);
        assert!(sub
            .segments
            .iter()
            .all(|s| matches!(s, Segment::CubicBezier { .. })));
        assert_eq!(sub.start, Point::new(8.0, 5.0));
        assert_eq!(sub.end_point(), Point::new(8.0, 5.0));
    }

    #[test]
    fn zero_radius_circle_degenerates_to_point() {
        let node = ElementNode::new(TagKind::Circle)
            .with_number("cx", 2.0)
            .with_number("cy", 3.0);
        let shape = parse_element(&node).unwrap();
        let sub = &shape.path.subpaths[0];
        assert!(sub.closed);
        assert!(sub.segments.is_empty());
        assert_eq!(sub.start, Point::new(2.0, 3.0));
    }

    #[test]
    fn ellipse_mirrors_missing_radius() {
        let node = ElementNode::new(TagKind::Ellipse)
            .with_number("cx", 0.0)
            .with_number("cy", 0.0)
            .with_number("rx", 6.0);
        let shape = parse_element(&node).unwrap();
        let bbox = shape.bounding_box().unwrap();
        assert_eq!(bbox, (-6.0, -6.0, 6.0, 6.0));
    }

    #[test]
    fn containers_emit_no_shape() {
        assert!(parse_element(&ElementNode::new(TagKind::Svg)).is_none());
        assert!(parse_element(&ElementNode::new(TagKind::Group)).is_none());
        assert!(parse_element(&ElementNode::new(TagKind::Defs)).is_none());
    }

    #[test]
    fn style_attributes_pass_through() {
        let node = rect_node(0.0, 0.0, 1.0, 1.0)
            .with_text("fill", "#ff0000")
            .with_text("stroke", "black")
            .with_number("stroke-width", 0.5)
            .with_text("id", "not-a-style-key");
        let shape = parse_element(&node).unwrap();
        assert_eq!(
            shape.style.get("fill"),
            Some(&StyleValue::Text("#ff0000".to_string()))
        );
        assert_eq!(
            shape.style.get("stroke-width"),
            Some(&StyleValue::Number(0.5))
        );
        assert!(!shape.style.contains_key("id"));
    }

    #[test]
    fn hidden_visibility_clears_flag() {
        let node = rect_node(0.0, 0.0, 1.0, 1.0).with_text("visibility", "hidden");
        assert!(!parse_element(&node).unwrap().visible);

        let node = rect_node(0.0, 0.0, 1.0, 1.0).with_text("display", "none");
        assert!(!parse_element(&node).unwrap().visible);

        let node = rect_node(0.0, 0.0, 1.0, 1.0);
        assert!(parse_element(&node).unwrap().visible);
    }
}
