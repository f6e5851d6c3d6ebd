use super::FuzzyOrd;
use static_aabb2d_index::IndexableNum;

/// Trait representing a real number (e.g. 1.1, -3.5, etc.) that can be fuzzy
/// compared and ordered.
///
/// Beyond the usual constants this trait carries the precision-derived
/// thresholds the curve kernel depends on: the largest slope magnitude a
/// supporting line may have before it is handled as vertical, and the
/// relative factor used to derive a tolerance from a curve's extent. Both
/// are functions of the type's machine epsilon rather than fixed constants
/// so that f32 and f64 each get thresholds matched to their precision.
pub trait Real:
    num_traits::real::Real
    + num_traits::Bounded
    + FuzzyOrd
    + std::default::Default
    + std::fmt::Debug
    + IndexableNum
    + 'static
{
    #[inline]
    fn pi() -> Self {
        Self::from(std::f64::consts::PI).unwrap()
    }

    #[inline]
    fn tau() -> Self {
        Self::from(std::f64::consts::TAU).unwrap()
    }

    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    #[inline]
    fn half() -> Self {
        Self::one() / Self::two()
    }

    #[inline]
    fn min_value() -> Self {
        num_traits::real::Real::min_value()
    }

    #[inline]
    fn max_value() -> Self {
        num_traits::real::Real::max_value()
    }

    /// Absolute floor for tolerance values, equal to the default fuzzy
    /// epsilon. An auto-derived tolerance never goes below this.
    #[inline]
    fn global_epsilon() -> Self {
        Self::fuzzy_epsilon()
    }

    /// Relative factor applied to a curve extent's largest coordinate
    /// magnitude when auto-deriving a tolerance (`sqrt(machine epsilon)`).
    #[inline]
    fn extent_epsilon_scale() -> Self {
        <Self as num_traits::real::Real>::epsilon().sqrt()
    }

    /// Largest slope magnitude for which slope/intercept algebra remains
    /// numerically trustworthy (`1/sqrt(machine epsilon)`). Steeper
    /// supporting lines are treated as vertical.
    #[inline]
    fn max_exact_slope() -> Self {
        Self::one() / Self::extent_epsilon_scale()
    }
}

impl Real for f32 {
    #[inline]
    fn pi() -> Self {
        std::f32::consts::PI
    }

    #[inline]
    fn tau() -> Self {
        std::f32::consts::TAU
    }

    #[inline]
    fn two() -> Self {
        2.0f32
    }

    #[inline]
    fn half() -> Self {
        0.5f32
    }
}

impl Real for f64 {
    #[inline]
    fn pi() -> Self {
        std::f64::consts::PI
    }

    #[inline]
    fn tau() -> Self {
        std::f64::consts::TAU
    }

    #[inline]
    fn two() -> Self {
        2.0f64
    }

    #[inline]
    fn half() -> Self {
        0.5f64
    }
}
