//! Coordinate reference frames.
//!
//! A [Frame] is an opaque, externally owned handle describing how raw (x, y)
//! coordinates are to be interpreted. Frames compare by identity (two handles
//! are the same frame only if they share the same underlying model
//! allocation) and classify their relation to another frame, which governs
//! which fast paths are legal when curves are re-expressed between frames.

use crate::core::math::Vector2;
use crate::core::traits::Real;
use crate::errors::{CurveError, Result};
use std::fmt;
use std::sync::Arc;

/// Pluggable coordinate-interpretation behavior backing a [Frame].
///
/// Models map frame-local coordinates to a common world space and back.
/// `from_world` must invert `to_world` for every model, including nonlinear
/// ones, since frame-changing curve copies rely on the round trip.
pub trait FrameModel<T>: fmt::Debug {
    /// Map a frame-local coordinate pair to world space.
    fn to_world(&self, p: Vector2<T>) -> Vector2<T>;

    /// Map a world-space coordinate pair into this frame.
    fn from_world(&self, p: Vector2<T>) -> Vector2<T>;

    /// True if the mapping carries straight lines to straight lines.
    fn preserves_linearity(&self) -> bool;

    /// True if the mapping additionally preserves orientation (no
    /// reflection). Implies linearity preservation.
    fn preserves_direction(&self) -> bool;
}

/// How two frames relate, ordered from strongest to weakest guarantee.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameRelation {
    /// Identical frame handles.
    Same,
    /// Both mappings are linear and orientation preserving.
    DirectionPreserving,
    /// Both mappings carry straight lines to straight lines.
    LinearityPreserving,
    /// No structural guarantee; geometry must be re-expressed point by point.
    General,
}

impl FrameRelation {
    /// True if straight segments stay straight when moving between the
    /// frames, so endpoint re-expression is sufficient.
    #[inline]
    pub fn preserves_linearity(&self) -> bool {
        !matches!(self, FrameRelation::General)
    }

    /// True if direction-sensitive queries (crossing side tests) can run
    /// without reprojection.
    #[inline]
    pub fn preserves_direction(&self) -> bool {
        matches!(self, FrameRelation::Same | FrameRelation::DirectionPreserving)
    }
}

/// Cheaply clonable handle to a coordinate reference frame.
///
/// Cloning shares the underlying model; equality is handle identity.
#[derive(Debug, Clone)]
pub struct Frame<T = f64> {
    model: Arc<dyn FrameModel<T>>,
}

impl<T> Frame<T>
where
    T: Real,
{
    /// Wrap a frame model into a handle.
    pub fn new(model: impl FrameModel<T> + 'static) -> Self {
        Frame {
            model: Arc::new(model),
        }
    }

    /// The world frame: coordinates pass through unchanged.
    ///
    /// Each call allocates a fresh handle, so two world frames are not
    /// [`is_same`](Frame::is_same) but do classify as direction preserving
    /// and map coordinates identically. Clone a handle to keep identity.
    pub fn world() -> Self {
        Frame::new(IdentityFrame)
    }

    /// True if `other` is the same frame handle.
    #[inline]
    pub fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.model, &other.model)
    }

    /// Classify how this frame relates to `other`.
    pub fn relation_to(&self, other: &Self) -> FrameRelation {
        if self.is_same(other) {
            FrameRelation::Same
        } else if self.model.preserves_direction() && other.model.preserves_direction() {
            FrameRelation::DirectionPreserving
        } else if self.model.preserves_linearity() && other.model.preserves_linearity() {
            FrameRelation::LinearityPreserving
        } else {
            FrameRelation::General
        }
    }

    /// Map a coordinate pair from this frame to world space.
    #[inline]
    pub fn to_world(&self, p: Vector2<T>) -> Vector2<T> {
        self.model.to_world(p)
    }

    /// Map a world-space coordinate pair into this frame.
    #[inline]
    pub fn from_world(&self, p: Vector2<T>) -> Vector2<T> {
        self.model.from_world(p)
    }

    /// Re-express a coordinate pair of this frame in `target`.
    #[inline]
    pub fn express(&self, p: Vector2<T>, target: &Self) -> Vector2<T> {
        if self.is_same(target) {
            p
        } else {
            target.from_world(self.to_world(p))
        }
    }
}

impl<T> PartialEq for Frame<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.model, &other.model)
    }
}

/// Model for the world frame (identity mapping).
#[derive(Debug, Copy, Clone, Default)]
pub struct IdentityFrame;

impl<T> FrameModel<T> for IdentityFrame
where
    T: Real,
{
    #[inline]
    fn to_world(&self, p: Vector2<T>) -> Vector2<T> {
        p
    }

    #[inline]
    fn from_world(&self, p: Vector2<T>) -> Vector2<T> {
        p
    }

    #[inline]
    fn preserves_linearity(&self) -> bool {
        true
    }

    #[inline]
    fn preserves_direction(&self) -> bool {
        true
    }
}

/// Invertible affine frame model.
///
/// Frame-local `(x, y)` maps to world
/// `(a * x + b * y + tx, c * x + d * y + ty)`.
#[derive(Debug, Copy, Clone)]
pub struct AffineFrame<T = f64> {
    fwd: [T; 6],
    inv: [T; 6],
    direct: bool,
}

impl<T> AffineFrame<T>
where
    T: Real,
{
    /// Build from matrix coefficients `[a, b, c, d]` and translation
    /// `(tx, ty)`.
    ///
    /// # Errors
    ///
    /// Returns [CurveError::SingularTransform] when the matrix has no
    /// inverse.
    pub fn new(a: T, b: T, c: T, d: T, tx: T, ty: T) -> Result<Self> {
        let det = a * d - b * c;
        if det.fuzzy_eq_zero() {
            return Err(CurveError::SingularTransform);
        }

        let ia = d / det;
        let ib = -b / det;
        let ic = -c / det;
        let id = a / det;
        Ok(AffineFrame {
            fwd: [a, b, c, d, tx, ty],
            inv: [ia, ib, ic, id, -(ia * tx + ib * ty), -(ic * tx + id * ty)],
            direct: det > T::zero(),
        })
    }

    /// Pure translation by `(tx, ty)`.
    pub fn translation(tx: T, ty: T) -> Self {
        // identity matrix is never singular
        AffineFrame::new(T::one(), T::zero(), T::zero(), T::one(), tx, ty).unwrap()
    }

    /// Counterclockwise rotation about the world origin by `angle` radians.
    pub fn rotation(angle: T) -> Self {
        let (s, c) = angle.sin_cos();
        AffineFrame::new(c, -s, s, c, T::zero(), T::zero()).unwrap()
    }

    /// Uniform scaling about the world origin.
    ///
    /// # Errors
    ///
    /// Returns [CurveError::SingularTransform] when `factor` is zero.
    pub fn scaling(factor: T) -> Result<Self> {
        AffineFrame::new(factor, T::zero(), T::zero(), factor, T::zero(), T::zero())
    }
}

impl<T> FrameModel<T> for AffineFrame<T>
where
    T: Real,
{
    fn to_world(&self, p: Vector2<T>) -> Vector2<T> {
        let [a, b, c, d, tx, ty] = self.fwd;
        Vector2::new(a * p.x + b * p.y + tx, c * p.x + d * p.y + ty)
    }

    fn from_world(&self, p: Vector2<T>) -> Vector2<T> {
        let [a, b, c, d, tx, ty] = self.inv;
        Vector2::new(a * p.x + b * p.y + tx, c * p.x + d * p.y + ty)
    }

    #[inline]
    fn preserves_linearity(&self) -> bool {
        true
    }

    #[inline]
    fn preserves_direction(&self) -> bool {
        self.direct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;

    #[test]
    fn identity_relation() {
        let f = Frame::<f64>::world();
        let g = f.clone();
        assert!(f.is_same(&g));
        assert_eq!(f.relation_to(&g), FrameRelation::Same);

        // distinct world handles are not the same frame but are still
        // direction preserving
        let h = Frame::<f64>::world();
        assert!(!f.is_same(&h));
        assert_eq!(f.relation_to(&h), FrameRelation::DirectionPreserving);
    }

    #[test]
    fn affine_round_trip() {
        let frame = Frame::new(AffineFrame::new(2.0, 1.0, -1.0, 3.0, 5.0, -2.0).unwrap());
        let p = vec2(1.5, -4.0);
        assert!(frame.from_world(frame.to_world(p)).fuzzy_eq(p));
    }

    #[test]
    fn reflection_is_not_direction_preserving() {
        let mirror = Frame::new(AffineFrame::new(-1.0, 0.0, 0.0, 1.0, 0.0, 0.0).unwrap());
        let world = Frame::<f64>::world();
        assert_eq!(
            mirror.relation_to(&world),
            FrameRelation::LinearityPreserving
        );
    }

    #[test]
    fn singular_matrix_rejected() {
        assert!(AffineFrame::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn express_between_frames() {
        let shifted = Frame::new(AffineFrame::translation(10.0, 0.0));
        let world = Frame::<f64>::world();
        let p = shifted.express(vec2(1.0, 1.0), &world);
        assert!(p.fuzzy_eq(vec2(11.0, 1.0)));
    }
}
