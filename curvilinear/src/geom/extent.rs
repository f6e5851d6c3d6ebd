//! Bounding extent helpers built on [static_aabb2d_index::AABB].
//!
//! A curve's extent is `Option<AABB<T>>`: `None` for an empty composite.

use crate::core::math::{Vector2, min_max};
use crate::core::traits::Real;
use static_aabb2d_index::AABB;

/// Axis aligned bounding box of the segment `p1` to `p2`.
pub fn seg_extent<T>(p1: Vector2<T>, p2: Vector2<T>) -> AABB<T>
where
    T: Real,
{
    let (min_x, max_x) = min_max(p1.x, p2.x);
    let (min_y, max_y) = min_max(p1.y, p2.y);
    AABB::new(min_x, min_y, max_x, max_y)
}

/// Union of two boxes.
pub fn extent_union<T>(a: &AABB<T>, b: &AABB<T>) -> AABB<T>
where
    T: Real,
{
    AABB::new(
        num_traits::real::Real::min(a.min_x, b.min_x),
        num_traits::real::Real::min(a.min_y, b.min_y),
        num_traits::real::Real::max(a.max_x, b.max_x),
        num_traits::real::Real::max(a.max_y, b.max_y),
    )
}

/// Union folding for optional extents (empty curves contribute nothing).
pub fn fold_extents<T>(extents: impl IntoIterator<Item = Option<AABB<T>>>) -> Option<AABB<T>>
where
    T: Real,
{
    extents
        .into_iter()
        .flatten()
        .reduce(|acc, e| extent_union(&acc, &e))
}

/// True if `p` lies inside `extent` expanded by `eps` on every side.
pub fn extent_contains_eps<T>(extent: &AABB<T>, p: Vector2<T>, eps: T) -> bool
where
    T: Real,
{
    p.x >= extent.min_x - eps
        && p.x <= extent.max_x + eps
        && p.y >= extent.min_y - eps
        && p.y <= extent.max_y + eps
}

/// True if the two boxes overlap once each is expanded by `eps`.
pub fn extents_overlap_eps<T>(a: &AABB<T>, b: &AABB<T>, eps: T) -> bool
where
    T: Real,
{
    a.min_x - eps <= b.max_x + eps
        && a.max_x + eps >= b.min_x - eps
        && a.min_y - eps <= b.max_y + eps
        && a.max_y + eps >= b.min_y - eps
}

/// Largest coordinate magnitude found on the box boundary, used for
/// auto-tolerance derivation.
pub fn max_coordinate_magnitude<T>(extent: &AABB<T>) -> T
where
    T: Real,
{
    let mx = num_traits::real::Real::max(extent.min_x.abs(), extent.max_x.abs());
    let my = num_traits::real::Real::max(extent.min_y.abs(), extent.max_y.abs());
    num_traits::real::Real::max(mx, my)
}
