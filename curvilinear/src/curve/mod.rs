//! Curve kinds and their capability traits.
//!
//! Exactly two linear curve kinds exist: the [LineSegment] leaf and the
//! [CompositeCurve] chain. [Curve] is the closed tagged variant over them;
//! [CurveRef] is its borrowed form, used by every cross-curve query so
//! segment/composite double dispatch needs neither cloning nor virtual
//! inheritance.

mod composite;
mod segment;
mod traits;

pub use composite::CompositeCurve;
pub use segment::LineSegment;
pub use traits::{GeometricCurve, LinearCurve};

use crate::core::math::Vector2;
use crate::core::traits::Real;
use crate::errors::Result;
use crate::frame::Frame;
use crate::geom::{Bearing, Displacement, Point2D};
use static_aabb2d_index::AABB;
use std::fmt;

/// Whether points coinciding with a curve's own extremities count as lying
/// on the curve.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExtremityPolicy {
    Include,
    Exclude,
}

/// Whether a flattening emits the curve's final point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EndPointPolicy {
    Include,
    Exclude,
}

/// Direction of travel along a curve for tangent queries. At a junction the
/// forward tangent belongs to the outgoing component, the backward tangent
/// to the incoming one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TravelDirection {
    Forward,
    Backward,
}

/// Owned curve of either kind.
#[derive(Debug, Clone)]
pub enum Curve<T = f64> {
    Segment(LineSegment<T>),
    Composite(CompositeCurve<T>),
}

/// Borrowed tagged view of a curve, carried by all cross-curve queries.
#[derive(Debug, Copy, Clone)]
pub enum CurveRef<'a, T>
where
    T: Real,
{
    Segment(&'a LineSegment<T>),
    Composite(&'a CompositeCurve<T>),
}

impl<'a, T> CurveRef<'a, T>
where
    T: Real,
{
    /// View through the shared linear-curve interface.
    pub fn linear(&self) -> &'a dyn LinearCurve<T> {
        match self {
            CurveRef::Segment(s) => *s,
            CurveRef::Composite(c) => *c,
        }
    }
}

impl<'a, T: Real> From<&'a Curve<T>> for CurveRef<'a, T> {
    fn from(curve: &'a Curve<T>) -> Self {
        curve.as_curve()
    }
}

impl<'a, T: Real> From<&'a LineSegment<T>> for CurveRef<'a, T> {
    fn from(segment: &'a LineSegment<T>) -> Self {
        CurveRef::Segment(segment)
    }
}

impl<'a, T: Real> From<&'a CompositeCurve<T>> for CurveRef<'a, T> {
    fn from(composite: &'a CompositeCurve<T>) -> Self {
        CurveRef::Composite(composite)
    }
}

impl<T> Curve<T>
where
    T: Real,
{
    pub fn as_segment(&self) -> Option<&LineSegment<T>> {
        match self {
            Curve::Segment(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeCurve<T>> {
        match self {
            Curve::Composite(c) => Some(c),
            _ => None,
        }
    }

    /// Raw start coordinates in the curve's own frame.
    pub(crate) fn raw_start(&self) -> Vector2<T> {
        match self {
            Curve::Segment(s) => s.raw_start(),
            Curve::Composite(c) => c.raw_start(),
        }
    }

    /// Raw end coordinates in the curve's own frame.
    pub(crate) fn raw_end(&self) -> Vector2<T> {
        match self {
            Curve::Segment(s) => s.raw_end(),
            Curve::Composite(c) => c.raw_end(),
        }
    }

    /// Move the start point to `p` with no distance precondition (composite
    /// junction welding).
    pub(crate) fn snap_start_to(&mut self, p: Vector2<T>) {
        match self {
            Curve::Segment(s) => s.snap_start_to(p),
            Curve::Composite(c) => c.snap_start_to(p),
        }
    }

    /// Move the end point to `p` with no distance precondition.
    pub(crate) fn snap_end_to(&mut self, p: Vector2<T>) {
        match self {
            Curve::Segment(s) => s.snap_end_to(p),
            Curve::Composite(c) => c.snap_end_to(p),
        }
    }

    /// Cut away everything after `p`, which must lie on the curve.
    pub(crate) fn shorten_to_point(&mut self, p: Vector2<T>) {
        match self {
            Curve::Segment(s) => s.shorten_to_point(p),
            Curve::Composite(c) => c.shorten_to_point(p),
        }
    }

    /// Cut away everything before `p`, which must lie on the curve.
    pub(crate) fn shorten_from_point(&mut self, p: Vector2<T>) {
        match self {
            Curve::Segment(s) => s.shorten_from_point(p),
            Curve::Composite(c) => c.shorten_from_point(p),
        }
    }

    /// Force a fixed tolerance value, recursing into composite components
    /// (used when a composite adopts a component).
    pub(crate) fn sync_tolerance(&mut self, value: T) {
        match self {
            Curve::Segment(s) => s.sync_tolerance(value),
            Curve::Composite(c) => c.sync_tolerance(value),
        }
    }
}

/// Cross-curve queries bottom out in same-frame coordinate math, so the
/// "other" curve is re-expressed up front whenever its frame handle differs.
/// Borrowed when already aligned, owned when a reprojected copy was needed
/// (a nonlinear reprojection may turn a segment into a composite).
pub(crate) enum AlignedCurve<'a, T>
where
    T: Real,
{
    Borrowed(CurveRef<'a, T>),
    Owned(Curve<T>),
}

impl<'a, T> AlignedCurve<'a, T>
where
    T: Real,
{
    pub(crate) fn view(&self) -> CurveRef<'_, T> {
        match self {
            AlignedCurve::Borrowed(r) => *r,
            AlignedCurve::Owned(c) => c.as_curve(),
        }
    }
}

pub(crate) fn align_to_frame<'a, T>(frame: &Frame<T>, other: CurveRef<'a, T>) -> AlignedCurve<'a, T>
where
    T: Real,
{
    if frame.is_same(other.linear().frame()) {
        AlignedCurve::Borrowed(other)
    } else {
        AlignedCurve::Owned(other.linear().copy_in_frame(frame))
    }
}

/// Validate an arc-length fraction, returning it clamped to `[0, 1]`.
pub(crate) fn check_position<T>(position: T) -> Result<T>
where
    T: Real,
{
    if !position.fuzzy_in_range(T::zero(), T::one()) {
        return Err(crate::errors::CurveError::PositionOutOfRange {
            value: crate::errors::err_coord(position),
        });
    }
    Ok(num_traits::real::Real::min(
        num_traits::real::Real::max(position, T::zero()),
        T::one(),
    ))
}

macro_rules! dispatch {
    ($self:ident, $inner:ident => $e:expr) => {
        match $self {
            Curve::Segment($inner) => $e,
            Curve::Composite($inner) => $e,
        }
    };
}

impl<T> GeometricCurve<T> for Curve<T>
where
    T: Real,
{
    fn frame(&self) -> &Frame<T> {
        dispatch!(self, c => c.frame())
    }

    fn tolerance(&self) -> T {
        dispatch!(self, c => c.tolerance())
    }

    fn is_auto_tolerance(&self) -> bool {
        dispatch!(self, c => c.is_auto_tolerance())
    }

    fn set_tolerance(&mut self, tolerance: T) -> Result<()> {
        dispatch!(self, c => c.set_tolerance(tolerance))
    }

    fn set_auto_tolerance(&mut self, active: bool) {
        dispatch!(self, c => c.set_auto_tolerance(active))
    }

    fn extent(&self) -> Option<AABB<T>> {
        dispatch!(self, c => c.extent())
    }

    fn is_null(&self) -> bool {
        dispatch!(self, c => c.is_null())
    }

    fn as_curve(&self) -> CurveRef<'_, T> {
        match self {
            Curve::Segment(s) => CurveRef::Segment(s),
            Curve::Composite(c) => CurveRef::Composite(c),
        }
    }

    fn is_point_on(&self, point: &Point2D<T>, policy: ExtremityPolicy, tol: Option<T>) -> bool {
        dispatch!(self, c => c.is_point_on(point, policy, tol))
    }

    fn crosses(&self, other: CurveRef<'_, T>) -> bool {
        dispatch!(self, c => c.crosses(other))
    }

    fn intersect(&self, other: CurveRef<'_, T>) -> Vec<Point2D<T>> {
        dispatch!(self, c => c.intersect(other))
    }

    fn are_adjacent(&self, other: CurveRef<'_, T>) -> bool {
        dispatch!(self, c => c.are_adjacent(other))
    }

    fn are_contiguous(&self, other: CurveRef<'_, T>) -> bool {
        dispatch!(self, c => c.are_contiguous(other))
    }

    fn contiguousness_points(&self, other: CurveRef<'_, T>) -> Vec<Point2D<T>> {
        dispatch!(self, c => c.contiguousness_points(other))
    }

    fn are_contiguous_at(&self, other: CurveRef<'_, T>, point: &Point2D<T>) -> Result<bool> {
        dispatch!(self, c => c.are_contiguous_at(other, point))
    }

    fn contiguousness_points_at(
        &self,
        other: CurveRef<'_, T>,
        point: &Point2D<T>,
    ) -> Result<(Point2D<T>, Point2D<T>)> {
        dispatch!(self, c => c.contiguousness_points_at(other, point))
    }

    fn are_contiguous_at_and_get(
        &self,
        other: CurveRef<'_, T>,
        point: &Point2D<T>,
    ) -> Result<Option<(Point2D<T>, Point2D<T>)>> {
        dispatch!(self, c => c.are_contiguous_at_and_get(other, point))
    }

    fn copy_in_frame(&self, frame: &Frame<T>) -> Curve<T> {
        dispatch!(self, c => c.copy_in_frame(frame))
    }
}

impl<T> LinearCurve<T> for Curve<T>
where
    T: Real,
{
    fn start_point(&self) -> Point2D<T> {
        dispatch!(self, c => c.start_point())
    }

    fn end_point(&self) -> Point2D<T> {
        dispatch!(self, c => c.end_point())
    }

    fn length(&self) -> T {
        dispatch!(self, c => c.length())
    }

    fn bearing_at(&self, point: &Point2D<T>, direction: TravelDirection) -> Result<Bearing<T>> {
        dispatch!(self, c => c.bearing_at(point, direction))
    }

    fn angular_acceleration_at(
        &self,
        point: &Point2D<T>,
        direction: TravelDirection,
    ) -> Result<T> {
        dispatch!(self, c => c.angular_acceleration_at(point, direction))
    }

    fn closest_point(&self, point: &Point2D<T>) -> Result<Point2D<T>> {
        dispatch!(self, c => c.closest_point(point))
    }

    fn relative_point(&self, position: T) -> Result<Point2D<T>> {
        dispatch!(self, c => c.relative_point(position))
    }

    fn relative_position(&self, point: &Point2D<T>) -> Result<T> {
        dispatch!(self, c => c.relative_position(point))
    }

    fn move_by(&mut self, displacement: &Displacement<T>) {
        dispatch!(self, c => c.move_by(displacement))
    }

    fn scale(&mut self, factor: T, origin: &Point2D<T>) -> Result<()> {
        dispatch!(self, c => c.scale(factor, origin))
    }

    fn shorten_from(&mut self, position: T) -> Result<()> {
        dispatch!(self, c => c.shorten_from(position))
    }

    fn shorten_to(&mut self, position: T) -> Result<()> {
        dispatch!(self, c => c.shorten_to(position))
    }

    fn shorten(&mut self, from_position: T, to_position: T) -> Result<()> {
        dispatch!(self, c => c.shorten(from_position, to_position))
    }

    fn reverse(&mut self) {
        dispatch!(self, c => c.reverse())
    }

    fn adjust_start_point_to(&mut self, point: &Point2D<T>) -> Result<()> {
        dispatch!(self, c => c.adjust_start_point_to(point))
    }

    fn adjust_end_point_to(&mut self, point: &Point2D<T>) -> Result<()> {
        dispatch!(self, c => c.adjust_end_point_to(point))
    }

    fn auto_crosses(&self) -> bool {
        dispatch!(self, c => c.auto_crosses())
    }

    fn flatten(&self, tolerance: T, policy: EndPointPolicy, out: &mut Vec<Point2D<T>>) {
        dispatch!(self, c => c.flatten(tolerance, policy, out))
    }
}

impl<T> From<LineSegment<T>> for Curve<T> {
    fn from(segment: LineSegment<T>) -> Self {
        Curve::Segment(segment)
    }
}

impl<T> From<CompositeCurve<T>> for Curve<T> {
    fn from(composite: CompositeCurve<T>) -> Self {
        Curve::Composite(composite)
    }
}

impl<T> fmt::Display for Curve<T>
where
    T: Real,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::Segment(s) => write!(f, "{}", s),
            Curve::Composite(c) => write!(f, "{}", c),
        }
    }
}
