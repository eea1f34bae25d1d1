//! # FabKit Core
//!
//! Foundation types for FabKit: 2D geometry primitives, affine transforms,
//! and the shared error taxonomy used by the vector-normalization engine
//! and downstream toolpath layers.

pub mod error;
pub mod geometry;

pub use error::{Error, Result};
pub use geometry::{Point, Transform2D, CIRCLE_KAPPA};
