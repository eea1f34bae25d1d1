//! Mutable accumulator the tag parsers drive to emit geometry.
//!
//! The builder carries the implicit current point as explicit state: a
//! pending subpath is opened by `move_to`, extended by `line_to` and
//! `cubic_bezier_to`, and sealed by `commit_path`. Calling a
//! segment-emitting method with no subpath in progress is a contract
//! violation in the calling parser, not a data condition, and panics.
//!
//! A builder is scoped to one shape's construction; [`build_shape`]
//! snapshots the accumulated path and resets the builder for reuse by the
//! next element.
//!
//! [`build_shape`]: PathBuilder::build_shape

use std::collections::HashMap;

use smallvec::SmallVec;

use fabkit_core::Point;

use crate::path::{Path, Segment, Shape, StyleValue, Subpath, SUBPATH_INLINE_SEGMENTS};

#[derive(Debug)]
struct PendingSubpath {
    start: Point,
    segments: SmallVec<[Segment; SUBPATH_INLINE_SEGMENTS]>,
}

/// Path-construction state shared by every tag parser.
#[derive(Debug, Default)]
pub struct PathBuilder {
    subpaths: Vec<Subpath>,
    pending: Option<PendingSubpath>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new subpath at `p`. An in-progress subpath is flushed into
    /// the path as-is, unclosed, unless it was committed first.
    pub fn move_to(&mut self, p: Point) {
        self.flush_pending(false);
        self.pending = Some(PendingSubpath {
            start: p,
            segments: SmallVec::new(),
        });
    }

    /// Appends a straight segment to the current subpath.
    ///
    /// # Panics
    ///
    /// Panics if no subpath has been started with [`move_to`].
    ///
    /// [`move_to`]: PathBuilder::move_to
    pub fn line_to(&mut self, p: Point) {
        let pending = self
            .pending
            .as_mut()
            .unwrap_or_else(|| panic!("PathBuilder::line_to called before move_to"));
        pending.segments.push(Segment::Line { to: p });
    }

    /// Appends a cubic Bézier segment to the current subpath, under the
    /// same precondition as [`line_to`].
    ///
    /// [`line_to`]: PathBuilder::line_to
    pub fn cubic_bezier_to(&mut self, c1: Point, c2: Point, p: Point) {
        let pending = self
            .pending
            .as_mut()
            .unwrap_or_else(|| panic!("PathBuilder::cubic_bezier_to called before move_to"));
        pending.segments.push(Segment::CubicBezier { c1, c2, to: p });
    }

    /// Seals the current subpath with the given closed flag. The caller may
    /// `move_to` again afterward to add another disjoint subpath.
    ///
    /// # Panics
    ///
    /// Panics if no subpath is in progress.
    pub fn commit_path(&mut self, close: bool) {
        if self.pending.is_none() {
            panic!("PathBuilder::commit_path called with no subpath in progress");
        }
        self.flush_pending(close);
    }

    /// Snapshots the accumulated path into an immutable [`Shape`] and
    /// resets the builder. A subpath still in progress is flushed unclosed.
    pub fn build_shape(&mut self, visible: bool, style: HashMap<String, StyleValue>) -> Shape {
        self.flush_pending(false);
        Shape {
            path: Path {
                subpaths: std::mem::take(&mut self.subpaths),
            },
            visible,
            style,
        }
    }

    fn flush_pending(&mut self, close: bool) {
        if let Some(pending) = self.pending.take() {
            self.subpaths.push(Subpath {
                start: pending.start,
                segments: pending.segments,
                closed: close,
            });
        }
    }
}
