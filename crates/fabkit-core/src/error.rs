//! Error handling for FabKit
//!
//! Data-driven irregularities in the vector engine (missing attributes,
//! out-of-range radii, unsupported content) are absorbed locally with
//! documented fallbacks and never reach this module. The errors defined
//! here cover the few genuinely fallible operations, such as validating
//! a transform matrix handed over by a document loader.

use thiserror::Error;

/// Geometry error type.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A transform coefficient is NaN or infinite.
    #[error("Non-finite transform coefficient {coefficient}: {value}")]
    NonFiniteTransform {
        /// Name of the offending matrix coefficient (a-f).
        coefficient: char,
        /// The non-finite value.
        value: f64,
    },
}

/// Result alias for FabKit operations.
pub type Result<T> = std::result::Result<T, Error>;
