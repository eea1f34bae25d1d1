//! Canonical path representation produced by the engine.
//!
//! Every recognized element kind is normalized into this one model:
//! straight segments and cubic Bézier segments, grouped into subpaths,
//! grouped into a path, wrapped in a [`Shape`] with style and visibility.
//! Downstream toolpath generation and rendering consume nothing else.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use fabkit_core::{Point, Transform2D};

/// Number of segments a subpath can hold before spilling to the heap.
/// Every shape the tag parsers emit fits: a rounded rect is the largest at
/// 8 segments.
pub const SUBPATH_INLINE_SEGMENTS: usize = 8;

/// A style attribute value carried through from the source element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StyleValue {
    Text(String),
    Number(f64),
}

/// One path segment, relative to the implicit current point (the end of
/// the previous segment, or the subpath start for the first segment).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    /// Straight segment to `to`.
    Line { to: Point },
    /// Cubic Bézier segment with control points `c1`, `c2`, ending at `to`.
    CubicBezier { c1: Point, c2: Point, to: Point },
}

impl Segment {
    /// The point this segment ends at.
    pub fn end_point(&self) -> Point {
        match self {
            Segment::Line { to } => *to,
            Segment::CubicBezier { to, .. } => *to,
        }
    }

    /// Applies an affine map to every point of the segment. Control points
    /// transform exactly like endpoints under an affine map.
    pub fn transformed(&self, t: &Transform2D) -> Segment {
        match self {
            Segment::Line { to } => Segment::Line { to: t.apply(*to) },
            Segment::CubicBezier { c1, c2, to } => Segment::CubicBezier {
                c1: t.apply(*c1),
                c2: t.apply(*c2),
                to: t.apply(*to),
            },
        }
    }
}

/// An ordered run of segments starting at `start`.
///
/// A closed subpath is implicitly followed by a final straight edge back to
/// `start`; that edge is not stored. Consumers that need an explicit closed
/// contour must honor the flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subpath {
    pub start: Point,
    pub segments: SmallVec<[Segment; SUBPATH_INLINE_SEGMENTS]>,
    pub closed: bool,
}

impl Subpath {
    /// The point the subpath ends at before any implicit closing edge.
    pub fn end_point(&self) -> Point {
        self.segments.last().map_or(self.start, Segment::end_point)
    }

    fn transformed(&self, t: &Transform2D) -> Subpath {
        Subpath {
            start: t.apply(self.start),
            segments: self.segments.iter().map(|s| s.transformed(t)).collect(),
            closed: self.closed,
        }
    }

    fn fold_bounds(&self, bounds: &mut Bounds) {
        bounds.include(self.start);
        for segment in &self.segments {
            match segment {
                Segment::Line { to } => bounds.include(*to),
                Segment::CubicBezier { c1, c2, to } => {
                    bounds.include(*c1);
                    bounds.include(*c2);
                    bounds.include(*to);
                }
            }
        }
    }
}

/// An ordered sequence of subpaths. One shape owns exactly one path; a
/// shape with disjoint contours (a rect with a hole) uses multiple
/// subpaths.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    pub subpaths: Vec<Subpath>,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }
}

/// The canonical output unit of the engine: one path in absolute
/// coordinates plus visibility and style hints. Immutable once committed;
/// the flattener produces transformed copies rather than editing in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub path: Path,
    pub visible: bool,
    pub style: HashMap<String, StyleValue>,
}

impl Shape {
    /// Returns a copy of the shape with `t` applied to every start point,
    /// endpoint, and Bézier control point.
    pub fn transformed(&self, t: &Transform2D) -> Shape {
        Shape {
            path: Path {
                subpaths: self.path.subpaths.iter().map(|s| s.transformed(t)).collect(),
            },
            visible: self.visible,
            style: self.style.clone(),
        }
    }

    /// Axis-aligned bounding box `(min_x, min_y, max_x, max_y)` over every
    /// stored point, or `None` for a shape with no geometry. Bézier control
    /// points are included, so the box is conservative for curved shapes.
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        if self.path.is_empty() {
            return None;
        }
        let mut bounds = Bounds::empty();
        for subpath in &self.path.subpaths {
            subpath.fold_bounds(&mut bounds);
        }
        Some((bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y))
    }
}

struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    fn empty() -> Self {
        Self {
            min_x: f64::MAX,
            min_y: f64::MAX,
            max_x: f64::MIN,
            max_y: f64::MIN,
        }
    }

    fn include(&mut self, p: Point) {
        if p.x < self.min_x {
            self.min_x = p.x;
        }
        if p.y < self.min_y {
            self.min_y = p.y;
        }
        if p.x > self.max_x {
            self.max_x = p.x;
        }
        if p.y > self.max_y {
            self.max_y = p.y;
        }
    }
}
