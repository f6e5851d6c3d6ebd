//! Error types surfaced by curve operations.
//!
//! Only precondition violations become errors; numerically marginal inputs
//! degrade to the documented fallback answers instead.

use num_traits::ToPrimitive;
use thiserror::Error;

/// Convert a curve scalar into the `f64` payload carried by [CurveError].
pub(crate) fn err_coord<T: ToPrimitive>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, CurveError>;

/// Precondition violations reported by curve operations.
///
/// Numeric payloads are carried as `f64` regardless of the curve's scalar
/// type so the error type stays non-generic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// A curve was inserted or appended whose junction endpoint does not
    /// coincide with the composite's current start/end within tolerance.
    #[error(
        "junction mismatch: endpoint ({x:.6}, {y:.6}) is {distance:.6} away from the \
         composite endpoint, tolerance {tolerance:.6}"
    )]
    JunctionMismatch {
        x: f64,
        y: f64,
        distance: f64,
        tolerance: f64,
    },

    /// An explicit tolerance must be strictly positive.
    #[error("tolerance must be strictly positive, got {value}")]
    NonPositiveTolerance { value: f64 },

    /// Scaling a curve by zero would collapse it.
    #[error("scale factor must be non-zero")]
    ZeroScaleFactor,

    /// A relative position (arc-length fraction) outside `[0, 1]`.
    #[error("relative position {value} is outside [0, 1]")]
    PositionOutOfRange { value: f64 },

    /// A point that was required to lie on the curve does not.
    #[error("point ({x:.6}, {y:.6}) does not lie on the curve within tolerance")]
    PointNotOnCurve { x: f64, y: f64 },

    /// The operation requires a populated curve.
    #[error("operation requires a non-empty curve")]
    EmptyCurve,

    /// An affine frame could not be built because its matrix is singular.
    #[error("affine frame matrix is singular")]
    SingularTransform,

    /// The two curves are not contiguous at the queried point.
    #[error("curves are not contiguous at ({x:.6}, {y:.6})")]
    NotContiguous { x: f64, y: f64 },

    /// An endpoint adjustment target is farther from the current endpoint
    /// than the curve's tolerance allows.
    #[error(
        "adjustment target ({x:.6}, {y:.6}) is {distance:.6} away from the endpoint, \
         tolerance {tolerance:.6}"
    )]
    AdjustTargetTooFar {
        x: f64,
        y: f64,
        distance: f64,
        tolerance: f64,
    },
}
