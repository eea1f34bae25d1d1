//! # FabKit Vector
//!
//! The vector-shape normalization engine. It converts the heterogeneous
//! element kinds of a loaded vector document (rects, polygons, circles,
//! definition blocks, nested groups) into one canonical representation:
//! straight segments and cubic Bézier segments in absolute coordinates,
//! which toolpath generation and rendering consume directly. Neither of
//! those layers can operate on a nested, per-element-transform tree; this
//! crate is where that tree goes away.
//!
//! ## Architecture
//!
//! ```text
//! ElementNode tree (from the document loader, attributes pre-coerced)
//!   └── GroupFlattener (pre-order walk, accumulates affine transforms)
//!         ├── parse_element (exhaustive dispatch over TagKind)
//!         │     └── PathBuilder (move_to / line_to / cubic_bezier_to)
//!         └── Shape list (flat, transform-free, document order)
//! ```
//!
//! ## Behavior notes
//!
//! - All data-driven irregularities are absorbed locally: missing numeric
//!   attributes default to 0, out-of-range radii clamp, non-finite node
//!   transforms fall back to identity for that node only (logged via
//!   `tracing`). Only path-builder misuse by a parser panics.
//! - Rounded rect corners use the true quarter-circle cubic approximation
//!   (control offset `r * CIRCLE_KAPPA`).
//! - `defs` subtrees are walked but every shape produced under one is
//!   forced invisible; resolving references into them is an external
//!   collaborator's job.
//!
//! The engine is synchronous and pure: no I/O, no shared state beyond a
//! per-shape [`PathBuilder`], and the input tree is never mutated.

pub mod element;
pub mod flatten;
pub mod parsers;
pub mod path;
pub mod path_builder;

pub use element::{AttrValue, ElementNode, TagKind};
pub use flatten::{normalize_document, GroupFlattener, NormalizeError, NormalizedDesign};
pub use parsers::parse_element;
pub use path::{Path, Segment, Shape, StyleValue, Subpath};
pub use path_builder::PathBuilder;
