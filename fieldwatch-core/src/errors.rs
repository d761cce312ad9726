//! Error types for the field-monitoring core
//!
//! The taxonomy is deliberately small. Threshold comparisons and the
//! derivative are total functions over finite floats and never fail;
//! errors exist only for the three ways a caller can misuse the core:
//!
//! - `EmptyWindow`: a statistic was requested before the first sample
//!   was appended. Programmer error, checked defensively.
//! - `InvalidConfig`: a configuration carried a non-positive threshold or
//!   averaging duration. Surfaced at configuration time; callers keep the
//!   previous configuration.
//! - `DegenerateDerivative`: a distance estimate was requested with a zero
//!   derivative. Cannot happen for callers that gate on `is_lightning()`
//!   first, since that guarantees `|d|` exceeds a positive threshold.
//!
//! Errors are `Copy` with `&'static str` payloads only, so they can be
//! returned from the per-sample hot path without allocation.

use thiserror_no_std::Error;

/// Result type for core operations
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors raised by the field window and monitor
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// A statistic was requested from a window with no samples
    #[error("window is empty: append a sample first")]
    EmptyWindow,

    /// Rejected configuration; the previous configuration remains in effect
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the supplied configuration
        reason: &'static str,
    },

    /// Distance estimate requested while the field derivative is zero
    #[error("distance estimate undefined for zero field derivative")]
    DegenerateDerivative,
}
