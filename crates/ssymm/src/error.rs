//! Error types for SSYMM operations.

use thiserror::Error;

/// Errors reported by the caller layer before any kernel runs.
///
/// The kernels themselves have no runtime failure modes; every variant here
/// is a violated precondition detected while validating a call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SsymmError {
    /// Leading dimension smaller than the number of rows it must span.
    #[error("Invalid leading dimension for {matrix}: ld={ld}, required at least {required}")]
    InvalidLeadingDimension {
        /// Matrix name ("A", "B" or "C").
        matrix: &'static str,
        ld: usize,
        required: usize,
    },

    /// Backing slice too short for the declared extents.
    #[error("Buffer for {matrix} too small: expected at least {required} elements, got {actual}")]
    BufferTooSmall {
        matrix: &'static str,
        required: usize,
        actual: usize,
    },

    /// A kernel variant was requested for a problem it cannot handle.
    #[error("Kernel variant {variant} is not eligible: {reason}")]
    IneligibleVariant { variant: String, reason: String },

    /// Parameters disagree with the matrix descriptors they describe.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
}

/// Result type for SSYMM operations.
pub type Result<T> = std::result::Result<T, SsymmError>;
