//! Group flattening: bakes ancestor transforms into leaf geometry.
//!
//! The walk is depth-first pre-order over the loader's element tree. Each
//! node's accumulated transform is its own transform expressed in parent
//! space followed by the parent's accumulated transform, so ancestor
//! transforms multiply from the root down to each leaf. Leaves are parsed
//! in local coordinates and lifted into root space; containers recurse and
//! emit nothing. The input tree is never mutated; the pass produces a new
//! flat shape list.
//!
//! A node carrying a non-finite transform keeps its own geometry error to
//! itself: that node falls back to the identity transform (with a warning)
//! and the rest of the walk proceeds.

use thiserror::Error;
use tracing::warn;

use fabkit_core::Transform2D;

use crate::element::{ElementNode, TagKind};
use crate::parsers::parse_element;
use crate::path::Shape;

/// Document-level normalization error.
#[derive(Error, Debug, Clone)]
pub enum NormalizeError {
    /// The tree root must be the document root or a group.
    #[error("root element {tag:?} is not a valid document root")]
    InvalidRoot {
        /// Tag kind found at the root.
        tag: TagKind,
    },
}

/// Walks a grouped, transformed element tree and produces the flat,
/// transform-free shape list every downstream consumer operates on.
#[derive(Debug, Default)]
pub struct GroupFlattener;

impl GroupFlattener {
    pub fn new() -> Self {
        Self
    }

    /// Flattens the tree rooted at `root` into shapes in root coordinate
    /// space, in document order of the leaves.
    pub fn flatten(&self, root: &ElementNode) -> Vec<Shape> {
        let mut shapes = Vec::new();
        self.walk(root, &Transform2D::identity(), false, &mut shapes);
        shapes
    }

    fn walk(
        &self,
        node: &ElementNode,
        parent: &Transform2D,
        in_defs: bool,
        out: &mut Vec<Shape>,
    ) {
        let accumulated = match &node.transform {
            Some(own) if own.is_finite() => own.then(parent),
            Some(own) => {
                warn!(tag = ?node.tag, transform = ?own, "non-finite transform, using identity");
                *parent
            }
            None => *parent,
        };

        if node.tag.is_container() {
            // Definition subtrees are still walked so their geometry stays
            // available to an external reference resolver, but nothing
            // under them may render directly.
            let in_defs = in_defs || node.tag == TagKind::Defs;
            for child in &node.children {
                self.walk(child, &accumulated, in_defs, out);
            }
            return;
        }

        if let Some(shape) = parse_element(node) {
            let mut shape = shape.transformed(&accumulated);
            if in_defs {
                shape.visible = false;
            }
            out.push(shape);
        }
    }
}

/// A normalized document: the flat shape list plus the aggregate bounding
/// box of its visible geometry.
#[derive(Debug, Clone)]
pub struct NormalizedDesign {
    /// Shapes in root coordinates, document order.
    pub shapes: Vec<Shape>,
    /// Aggregate bounding box `(min_x, min_y, max_x, max_y)` of the
    /// visible geometry, all zeros when nothing is visible.
    pub bounds: (f64, f64, f64, f64),
    /// Number of leaf elements that produced a shape.
    pub leaf_count: usize,
}

impl NormalizedDesign {
    /// Width and height of the visible geometry's bounding box.
    pub fn dimensions(&self) -> (f64, f64) {
        let (min_x, min_y, max_x, max_y) = self.bounds;
        (max_x - min_x, max_y - min_y)
    }
}

/// Normalizes a whole document tree. The root must be the document root or
/// a group; anything else indicates the caller handed over a bare leaf (or
/// a definitions block) instead of a document.
pub fn normalize_document(root: &ElementNode) -> anyhow::Result<NormalizedDesign> {
    if !matches!(root.tag, TagKind::Svg | TagKind::Group) {
        return Err(NormalizeError::InvalidRoot { tag: root.tag }.into());
    }

    let shapes = GroupFlattener::new().flatten(root);
    let leaf_count = shapes.len();

    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for shape in shapes.iter().filter(|s| s.visible) {
        if let Some((min_x, min_y, max_x, max_y)) = shape.bounding_box() {
            bounds = Some(match bounds {
                None => (min_x, min_y, max_x, max_y),
                Some((bx0, by0, bx1, by1)) => (
                    bx0.min(min_x),
                    by0.min(min_y),
                    bx1.max(max_x),
                    by1.max(max_y),
                ),
            });
        }
    }

    Ok(NormalizedDesign {
        shapes,
        bounds: bounds.unwrap_or((0.0, 0.0, 0.0, 0.0)),
        leaf_count,
    })
}
