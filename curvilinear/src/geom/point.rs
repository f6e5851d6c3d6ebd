//! Frame-tagged points, displacements between them, and bearings.

use crate::core::math::{Vector2, delta_angle, normalize_radians, vec2};
use crate::core::traits::Real;
use crate::frame::Frame;
use std::ops;

/// A 2D location tied to the [Frame] its coordinates are interpreted in.
///
/// Exact equality (`==`) requires the identical frame handle and identical
/// coordinates; tolerance-aware comparison goes through
/// [Point2D::is_equal_to], which reprojects when the frames differ.
#[derive(Debug, Clone, PartialEq)]
pub struct Point2D<T = f64> {
    pos: Vector2<T>,
    frame: Frame<T>,
}

impl<T> Point2D<T>
where
    T: Real,
{
    pub fn new(x: T, y: T, frame: &Frame<T>) -> Self {
        Point2D {
            pos: vec2(x, y),
            frame: frame.clone(),
        }
    }

    pub fn from_vector(pos: Vector2<T>, frame: &Frame<T>) -> Self {
        Point2D {
            pos,
            frame: frame.clone(),
        }
    }

    #[inline]
    pub fn x(&self) -> T {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> T {
        self.pos.y
    }

    /// Raw coordinates in this point's own frame.
    #[inline]
    pub fn position(&self) -> Vector2<T> {
        self.pos
    }

    #[inline]
    pub fn frame(&self) -> &Frame<T> {
        &self.frame
    }

    /// This point re-expressed in `frame`. Same-frame calls are a cheap
    /// clone.
    pub fn expressed_in(&self, frame: &Frame<T>) -> Point2D<T> {
        if self.frame.is_same(frame) {
            self.clone()
        } else {
            Point2D::from_vector(self.frame.express(self.pos, frame), frame)
        }
    }

    /// Coordinates of this point as seen from `frame`.
    pub fn position_in(&self, frame: &Frame<T>) -> Vector2<T> {
        self.frame.express(self.pos, frame)
    }

    /// Tolerance-aware equality. `other` is reprojected into this point's
    /// frame when the handles differ (the same-frame fast path skips the
    /// reprojection entirely).
    pub fn is_equal_to(&self, other: &Point2D<T>, tol: T) -> bool {
        self.pos.fuzzy_eq_eps(other.position_in(&self.frame), tol)
    }

    /// Distance to `other`, reprojecting when the frames differ.
    pub fn distance_to(&self, other: &Point2D<T>) -> T {
        (other.position_in(&self.frame) - self.pos).length()
    }
}

/// Subtraction of two points yields the displacement carrying the right
/// operand to the left one, measured in the left operand's frame.
impl<T> ops::Sub for &Point2D<T>
where
    T: Real,
{
    type Output = Displacement<T>;

    fn sub(self, rhs: &Point2D<T>) -> Displacement<T> {
        Displacement::from_vector(self.pos - rhs.position_in(&self.frame))
    }
}

/// A frame-free coordinate offset (dx, dy).
///
/// Displacements are applied in whatever frame the receiving curve or point
/// lives in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Displacement<T = f64> {
    v: Vector2<T>,
}

impl<T> Displacement<T>
where
    T: Real,
{
    pub fn new(dx: T, dy: T) -> Self {
        Displacement { v: vec2(dx, dy) }
    }

    pub fn from_vector(v: Vector2<T>) -> Self {
        Displacement { v }
    }

    #[inline]
    pub fn dx(&self) -> T {
        self.v.x
    }

    #[inline]
    pub fn dy(&self) -> T {
        self.v.y
    }

    #[inline]
    pub fn as_vector(&self) -> Vector2<T> {
        self.v
    }

    pub fn length(&self) -> T {
        self.v.length()
    }

    pub fn bearing(&self) -> Bearing<T> {
        Bearing::from_vector(self.v)
    }
}

/// Direction angle in radians, counterclockwise from the +X axis, normalized
/// to `[0, 2PI)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bearing<T = f64> {
    radians: T,
}

impl<T> Bearing<T>
where
    T: Real,
{
    pub fn new(radians: T) -> Self {
        Bearing {
            radians: normalize_radians(radians),
        }
    }

    /// Bearing of a direction vector. The zero vector maps to bearing 0.
    pub fn from_vector(v: Vector2<T>) -> Self {
        if v.x == T::zero() && v.y == T::zero() {
            Bearing { radians: T::zero() }
        } else {
            Bearing::new(v.y.atan2(v.x))
        }
    }

    #[inline]
    pub fn radians(&self) -> T {
        self.radians
    }

    /// Unit vector pointing along this bearing.
    pub fn direction(&self) -> Vector2<T> {
        let (s, c) = self.radians.sin_cos();
        vec2(c, s)
    }

    /// Bearing pointing the opposite way.
    pub fn reversed(&self) -> Self {
        Bearing::new(self.radians + T::pi())
    }

    /// Fuzzy comparison across the angle wrap (e.g. bearings just above 0
    /// and just below 2PI compare equal).
    pub fn fuzzy_eq(&self, other: Self) -> bool {
        delta_angle(self.radians, other.radians).fuzzy_eq_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;
    use crate::frame::AffineFrame;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn equality_requires_same_frame_handle() {
        let f = Frame::world();
        let g = Frame::world();
        let a = Point2D::new(1.0, 2.0, &f);
        let b = Point2D::new(1.0, 2.0, &f);
        let c = Point2D::new(1.0, 2.0, &g);
        assert_eq!(a, b);
        assert_ne!(a, c);
        // distinct world handles still compare equal within tolerance
        assert!(a.is_equal_to(&c, 1e-8));
    }

    #[test]
    fn cross_frame_comparison_reprojects() {
        let world = Frame::world();
        let shifted = Frame::new(AffineFrame::translation(10.0, 0.0));
        let a = Point2D::new(11.0, 2.0, &world);
        let b = Point2D::new(1.0, 2.0, &shifted);
        assert!(a.is_equal_to(&b, 1e-8));
        assert!(a.distance_to(&b).fuzzy_eq_zero());
    }

    #[test]
    fn subtraction_gives_displacement() {
        let f = Frame::world();
        let a = Point2D::new(3.0, 4.0, &f);
        let o = Point2D::new(0.0, 0.0, &f);
        let d = &a - &o;
        assert!(d.length().fuzzy_eq(5.0));
        assert!(d.bearing().radians().fuzzy_eq(4.0f64.atan2(3.0)));
    }

    #[test]
    fn bearing_normalization_and_wrap() {
        assert!(Bearing::new(-FRAC_PI_2).radians().fuzzy_eq(3.0 * FRAC_PI_2));
        let a = Bearing::new(1e-10);
        let b = Bearing::new(2.0 * PI - 1e-10);
        assert!(a.fuzzy_eq(b));
        assert!(Bearing::new(0.0).reversed().radians().fuzzy_eq(PI));
    }
}
