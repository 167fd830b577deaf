#![forbid(unsafe_code)]

//! Synchronous error types.
//!
//! Only malformed input and unsupported configurations fail a call. Every
//! outcome decided by the engine (completion, interruption, being ignored)
//! is reported through the completion event for that request instead.

use thiserror::Error;

/// Rejected snap-point declaration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapPointError {
    #[error("snap point value {value} is not finite")]
    NonFinite { value: f64 },

    #[error("applicable range must be positive, got {range}")]
    NonPositiveRange { range: f64 },

    #[error("repeated snap point end ({end}) must be greater than start ({start})")]
    EmptyRepetition { start: f64, end: f64 },

    #[error("repeated snap point offset {offset} lies outside [{start}, {end}]")]
    OffsetOutOfRange { offset: f64, start: f64, end: f64 },

    #[error("repeated snap point interval must be positive, got {interval}")]
    NonPositiveInterval { interval: f64 },

    #[error("snap point at {value} overlaps repeated snap points spanning [{start}, {end}]")]
    Overlap { value: f64, start: f64, end: f64 },

    #[error("repeated snap points spanning [{start}, {end}] are declared twice")]
    DuplicateRepetition { start: f64, end: f64 },
}

/// Synchronous failure of a public view-change call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewChangeError {
    /// Malformed numeric input. No operation was queued.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: &'static str,
    },

    /// The configured engine cannot service this request.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    #[error(transparent)]
    SnapPoint(#[from] SnapPointError),
}

impl ViewChangeError {
    /// Shorthand for [`ViewChangeError::InvalidArgument`].
    #[must_use]
    pub const fn invalid(name: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { name, reason }
    }
}
