use super::{Curve, CurveRef, EndPointPolicy, ExtremityPolicy, TravelDirection};
use crate::core::traits::Real;
use crate::errors::Result;
use crate::frame::Frame;
use crate::geom::{Bearing, Displacement, Point2D};
use static_aabb2d_index::AABB;

/// Capability set shared by every curve kind: frame and tolerance ownership,
/// extent, and the tolerance-aware relational predicates.
///
/// All cross-curve predicates compare with `min(self.tolerance(),
/// other.tolerance())` and internally re-express the other curve when the
/// frames differ, so callers never need to pre-align frames.
pub trait GeometricCurve<T>
where
    T: Real,
{
    /// Frame the curve's coordinates are interpreted in.
    fn frame(&self) -> &Frame<T>;

    /// Current tolerance value.
    fn tolerance(&self) -> T;

    /// True while the tolerance is rederived from the extent after each
    /// mutation.
    fn is_auto_tolerance(&self) -> bool;

    /// Set an explicit tolerance, disabling auto mode.
    ///
    /// # Errors
    ///
    /// [CurveError::NonPositiveTolerance](crate::errors::CurveError::NonPositiveTolerance)
    /// when `tolerance <= 0`.
    fn set_tolerance(&mut self, tolerance: T) -> Result<()>;

    /// Enable or disable auto tolerance mode; enabling rederives immediately.
    fn set_auto_tolerance(&mut self, active: bool);

    /// Axis aligned bounding extent, `None` when the curve is empty.
    fn extent(&self) -> Option<AABB<T>>;

    /// True for a zero-length (degenerate) curve.
    fn is_null(&self) -> bool;

    /// Borrowed tagged view used for double dispatch between curve kinds.
    fn as_curve(&self) -> CurveRef<'_, T>;

    /// True if `point` lies on the curve within `tol` (curve tolerance when
    /// `None`). `policy` controls whether points coinciding with the curve's
    /// own extremities count.
    fn is_point_on(&self, point: &Point2D<T>, policy: ExtremityPolicy, tol: Option<T>) -> bool;

    /// Strict crossing test: true only for a transversal crossing whose
    /// point is not an extremity of either curve and the pair is neither
    /// contiguous nor linked end to end.
    fn crosses(&self, other: CurveRef<'_, T>) -> bool;

    /// Collect the crossing points with `other` (extremity touches
    /// included), expressed in this curve's frame.
    fn intersect(&self, other: CurveRef<'_, T>) -> Vec<Point2D<T>>;

    /// True if an extremity of one curve lies on the other (touching,
    /// without requiring collinear overlap).
    fn are_adjacent(&self, other: CurveRef<'_, T>) -> bool;

    /// True if the curves are collinear and overlap for positive length.
    fn are_contiguous(&self, other: CurveRef<'_, T>) -> bool;

    /// Ordered boundary points of every contiguous span shared with
    /// `other`, consecutive spans merged at shared junctions.
    fn contiguousness_points(&self, other: CurveRef<'_, T>) -> Vec<Point2D<T>>;

    /// True if the curves are contiguous on a span containing `point`.
    ///
    /// # Errors
    ///
    /// [CurveError::PointNotOnCurve](crate::errors::CurveError::PointNotOnCurve)
    /// when `point` does not lie on this curve.
    fn are_contiguous_at(&self, other: CurveRef<'_, T>, point: &Point2D<T>) -> Result<bool>;

    /// The two ordered boundary points of the contiguous span containing
    /// `point`.
    ///
    /// # Errors
    ///
    /// [CurveError::PointNotOnCurve](crate::errors::CurveError::PointNotOnCurve)
    /// when `point` is not on this curve,
    /// [CurveError::NotContiguous](crate::errors::CurveError::NotContiguous)
    /// when no contiguous span contains it.
    fn contiguousness_points_at(
        &self,
        other: CurveRef<'_, T>,
        point: &Point2D<T>,
    ) -> Result<(Point2D<T>, Point2D<T>)>;

    /// Combined form of [GeometricCurve::are_contiguous_at] and
    /// [GeometricCurve::contiguousness_points_at]: `Ok(None)` when not
    /// contiguous at `point`.
    ///
    /// # Errors
    ///
    /// [CurveError::PointNotOnCurve](crate::errors::CurveError::PointNotOnCurve)
    /// when `point` does not lie on this curve.
    fn are_contiguous_at_and_get(
        &self,
        other: CurveRef<'_, T>,
        point: &Point2D<T>,
    ) -> Result<Option<(Point2D<T>, Point2D<T>)>>;

    /// Clone this curve into `frame`.
    ///
    /// When the frame relation preserves linearity the copy re-expresses
    /// endpoints directly; otherwise segments are recursively bisected until
    /// each chord tracks the transformed curve within tolerance, which may
    /// turn a single segment into a composite.
    fn copy_in_frame(&self, frame: &Frame<T>) -> Curve<T>;
}

/// A curve with a start, an end, and a single arc-length parameterization
/// between them.
pub trait LinearCurve<T>: GeometricCurve<T>
where
    T: Real,
{
    fn start_point(&self) -> Point2D<T>;

    fn end_point(&self) -> Point2D<T>;

    /// Total arc length.
    fn length(&self) -> T;

    /// Tangent bearing at `point` facing `direction` of travel.
    ///
    /// # Errors
    ///
    /// [CurveError::PointNotOnCurve](crate::errors::CurveError::PointNotOnCurve)
    /// when `point` does not lie on the curve.
    fn bearing_at(&self, point: &Point2D<T>, direction: TravelDirection) -> Result<Bearing<T>>;

    /// Rate of bearing change per unit arc length at `point` (always zero
    /// for piecewise-linear curves; kept for interface parity with curved
    /// kinds).
    ///
    /// # Errors
    ///
    /// [CurveError::PointNotOnCurve](crate::errors::CurveError::PointNotOnCurve)
    /// when `point` does not lie on the curve.
    fn angular_acceleration_at(&self, point: &Point2D<T>, direction: TravelDirection)
    -> Result<T>;

    /// Closest point on the curve to `point`. Equidistant endpoint ties are
    /// broken by matching the curve's outgoing bearing rather than raw
    /// distance.
    ///
    /// # Errors
    ///
    /// [CurveError::EmptyCurve](crate::errors::CurveError::EmptyCurve) for
    /// an empty composite.
    fn closest_point(&self, point: &Point2D<T>) -> Result<Point2D<T>>;

    /// Point at arc-length fraction `position` in `[0, 1]`; exactly the
    /// stored start/end at the interval bounds.
    ///
    /// # Errors
    ///
    /// [CurveError::PositionOutOfRange](crate::errors::CurveError::PositionOutOfRange)
    /// when `position` is outside `[0, 1]`,
    /// [CurveError::EmptyCurve](crate::errors::CurveError::EmptyCurve) for
    /// an empty composite.
    fn relative_point(&self, position: T) -> Result<Point2D<T>>;

    /// Arc-length fraction of `point` along the curve (inverse of
    /// [LinearCurve::relative_point]).
    ///
    /// # Errors
    ///
    /// [CurveError::PointNotOnCurve](crate::errors::CurveError::PointNotOnCurve)
    /// when `point` does not lie on the curve.
    fn relative_position(&self, point: &Point2D<T>) -> Result<T>;

    /// Translate in the curve's own frame.
    fn move_by(&mut self, displacement: &Displacement<T>);

    /// Uniformly scale about `origin`.
    ///
    /// # Errors
    ///
    /// [CurveError::ZeroScaleFactor](crate::errors::CurveError::ZeroScaleFactor)
    /// when `factor` is zero.
    fn scale(&mut self, factor: T, origin: &Point2D<T>) -> Result<()>;

    /// Remove the part before arc-length fraction `position`.
    ///
    /// # Errors
    ///
    /// [CurveError::PositionOutOfRange](crate::errors::CurveError::PositionOutOfRange)
    /// when `position` is outside `[0, 1]`.
    fn shorten_from(&mut self, position: T) -> Result<()>;

    /// Remove the part after arc-length fraction `position`.
    ///
    /// # Errors
    ///
    /// [CurveError::PositionOutOfRange](crate::errors::CurveError::PositionOutOfRange)
    /// when `position` is outside `[0, 1]`.
    fn shorten_to(&mut self, position: T) -> Result<()>;

    /// Keep only the part between fractions `from_position` and
    /// `to_position`.
    ///
    /// # Errors
    ///
    /// [CurveError::PositionOutOfRange](crate::errors::CurveError::PositionOutOfRange)
    /// when either fraction is outside `[0, 1]` or they are out of order.
    fn shorten(&mut self, from_position: T, to_position: T) -> Result<()>;

    /// Flip the direction of travel, swapping start and end.
    fn reverse(&mut self);

    /// Snap the start point to `point`, which must lie within tolerance of
    /// the current start.
    ///
    /// # Errors
    ///
    /// [CurveError::AdjustTargetTooFar](crate::errors::CurveError::AdjustTargetTooFar)
    /// when `point` is farther than the tolerance allows.
    fn adjust_start_point_to(&mut self, point: &Point2D<T>) -> Result<()>;

    /// Snap the end point to `point`, which must lie within tolerance of
    /// the current end.
    ///
    /// # Errors
    ///
    /// [CurveError::AdjustTargetTooFar](crate::errors::CurveError::AdjustTargetTooFar)
    /// when `point` is farther than the tolerance allows.
    fn adjust_end_point_to(&mut self, point: &Point2D<T>) -> Result<()>;

    /// True if the curve crosses itself.
    fn auto_crosses(&self) -> bool;

    /// Append an ordered point-sequence approximation of the curve to
    /// `out`. For piecewise-linear curves the approximation is exact and
    /// `tolerance` is unused. `policy` controls whether the final point is
    /// emitted, so concatenated flattenings don't duplicate junctions.
    fn flatten(&self, tolerance: T, policy: EndPointPolicy, out: &mut Vec<Point2D<T>>);
}
