use super::Vector2;
use super::min_max;
use crate::core::traits::Real;

/// Holds the result of finding the intersect between two line segments.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SegSegIntr<T>
where
    T: Real,
{
    /// The segments do not cross.
    NoCross,
    /// The segments cross at a single point.
    CrossFound { point: Vector2<T> },
    /// The supporting lines are parallel (this includes collinear segments,
    /// whose overlap is reported by the contiguity queries, not here).
    Parallel,
}

/// Classification of a supporting line used to route around slope/intercept
/// precision loss.
#[derive(Debug, Copy, Clone)]
enum SlopeClass<T> {
    /// Vertical, or steeper than [Real::max_exact_slope].
    Vertical,
    /// Slope exactly zero.
    Horizontal,
    /// Well conditioned slope/intercept form `y = m * x + b`.
    Sloped { m: T, b: T },
}

fn classify<T>(p1: Vector2<T>, p2: Vector2<T>) -> SlopeClass<T>
where
    T: Real,
{
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    if dx == T::zero() {
        return SlopeClass::Vertical;
    }

    let m = dy / dx;
    if m.abs() > T::max_exact_slope() {
        SlopeClass::Vertical
    } else if dy == T::zero() {
        SlopeClass::Horizontal
    } else {
        SlopeClass::Sloped { m, b: p1.y - m * p1.x }
    }
}

/// True if `point` lies inside the bounding box of the segment `p1` to `p2`
/// expanded by `eps` on every side.
fn in_seg_range<T>(point: Vector2<T>, p1: Vector2<T>, p2: Vector2<T>, eps: T) -> bool
where
    T: Real,
{
    let (min_x, max_x) = min_max(p1.x, p2.x);
    let (min_y, max_y) = min_max(p1.y, p2.y);
    point.x.fuzzy_in_range_eps(min_x, max_x, eps) && point.y.fuzzy_in_range_eps(min_y, max_y, eps)
}

/// Finds the intersect between two line segments `u1` to `u2` and `v1` to
/// `v2`, comparing coordinates with epsilon `eps`.
///
/// Rather than always solving the supporting lines' 2x2 system in
/// slope/intercept form, near-vertical lines (slope magnitude above
/// [Real::max_exact_slope]) and exactly horizontal lines are routed through
/// coordinate-range overlap tests, since the closed-form solution loses
/// precision catastrophically at extreme slopes. A candidate crossing point
/// only counts when it falls within the `eps`-expanded coordinate range of
/// both segments.
///
/// # Examples
///
/// ```
/// # use curvilinear::core::math::*;
/// let result = seg_seg_intr(
///     Vector2::new(0.0, 0.0),
///     Vector2::new(10.0, 0.0),
///     Vector2::new(5.0, -5.0),
///     Vector2::new(5.0, 5.0),
///     1e-8,
/// );
/// match result {
///     SegSegIntr::CrossFound { point } => assert!(point.fuzzy_eq(Vector2::new(5.0, 0.0))),
///     _ => panic!("expected cross"),
/// }
/// ```
pub fn seg_seg_intr<T>(
    u1: Vector2<T>,
    u2: Vector2<T>,
    v1: Vector2<T>,
    v2: Vector2<T>,
    eps: T,
) -> SegSegIntr<T>
where
    T: Real,
{
    use SlopeClass::*;
    let candidate = match (classify(u1, u2), classify(v1, v2)) {
        (Vertical, Vertical) | (Horizontal, Horizontal) => {
            return SegSegIntr::Parallel;
        }
        (Vertical, Horizontal) => Vector2::new(u1.x, v1.y),
        (Horizontal, Vertical) => Vector2::new(v1.x, u1.y),
        (Vertical, Sloped { m, b }) => Vector2::new(u1.x, m * u1.x + b),
        (Sloped { m, b }, Vertical) => Vector2::new(v1.x, m * v1.x + b),
        (Horizontal, Sloped { m, b }) => Vector2::new((u1.y - b) / m, u1.y),
        (Sloped { m, b }, Horizontal) => Vector2::new((v1.y - b) / m, v1.y),
        (Sloped { m: m1, b: b1 }, Sloped { m: m2, b: b2 }) => {
            if (m1 - m2).fuzzy_eq_zero() {
                return SegSegIntr::Parallel;
            }
            let x = (b2 - b1) / (m1 - m2);
            Vector2::new(x, m1 * x + b1)
        }
    };

    if in_seg_range(candidate, u1, u2, eps) && in_seg_range(candidate, v1, v2, eps) {
        SegSegIntr::CrossFound { point: candidate }
    } else {
        SegSegIntr::NoCross
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-8;

    #[test]
    fn cross_at_midpoint() {
        let result = seg_seg_intr(
            Vector2::new(-1.0, -1.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(-1.0, 1.0),
            Vector2::new(1.0, -1.0),
            EPS,
        );
        match result {
            SegSegIntr::CrossFound { point } => assert!(point.fuzzy_eq(Vector2::zero())),
            _ => panic!("expected cross, got {:?}", result),
        }
    }

    #[test]
    fn supporting_lines_cross_outside_span() {
        let result = seg_seg_intr(
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(5.0, -1.0),
            Vector2::new(5.0, 1.0),
            EPS,
        );
        assert_eq!(result, SegSegIntr::NoCross);
    }

    #[test]
    fn parallel_verticals() {
        let result = seg_seg_intr(
            Vector2::new(0.0, 0.0),
            Vector2::new(0.0, 5.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 5.0),
            EPS,
        );
        assert_eq!(result, SegSegIntr::Parallel);
    }

    #[test]
    fn steep_slope_treated_as_vertical() {
        // slope of 1e9 is beyond f64's max exact slope
        let result = seg_seg_intr(
            Vector2::new(5.0, -5.0e8),
            Vector2::new(5.000000001, 5.0e8),
            Vector2::new(0.0, 0.0),
            Vector2::new(10.0, 0.0),
            EPS,
        );
        match result {
            SegSegIntr::CrossFound { point } => {
                assert!(point.fuzzy_eq_eps(Vector2::new(5.0, 0.0), 1e-6));
            }
            _ => panic!("expected cross, got {:?}", result),
        }
    }
}
