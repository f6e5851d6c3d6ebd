//! Per-curve tolerance with an automatic derivation mode.

use super::extent::max_coordinate_magnitude;
use crate::core::traits::Real;
use crate::errors::{CurveError, Result, err_coord};
use static_aabb2d_index::AABB;

/// Tolerance value derived from a curve extent while auto mode is active:
/// `max(global_epsilon, extent_epsilon_scale * max(|xmin|, |xmax|, |ymin|, |ymax|))`.
///
/// Far-from-origin geometry gets a proportionally wider tolerance since its
/// coordinates carry proportionally less absolute precision.
pub fn derived_tolerance<T>(extent: Option<&AABB<T>>) -> T
where
    T: Real,
{
    let floor = T::global_epsilon();
    match extent {
        Some(e) => num_traits::real::Real::max(
            floor,
            T::extent_epsilon_scale() * max_coordinate_magnitude(e),
        ),
        None => floor,
    }
}

/// Scalar tolerance owned by a curve.
///
/// In auto mode (the default) the owning curve rederives the value from its
/// extent after every mutation. Setting an explicit value disables auto mode
/// until it is re-enabled.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerance<T = f64> {
    value: T,
    auto: bool,
}

impl<T> Default for Tolerance<T>
where
    T: Real,
{
    fn default() -> Self {
        Tolerance {
            value: T::global_epsilon(),
            auto: true,
        }
    }
}

impl<T> Tolerance<T>
where
    T: Real,
{
    /// Fixed tolerance, auto mode disabled.
    ///
    /// # Errors
    ///
    /// Returns [CurveError::NonPositiveTolerance] when `value <= 0`.
    pub fn fixed(value: T) -> Result<Self> {
        if value <= T::zero() {
            return Err(CurveError::NonPositiveTolerance {
                value: err_coord(value),
            });
        }
        Ok(Tolerance { value, auto: false })
    }

    /// Current tolerance value.
    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    /// True while auto derivation is active.
    #[inline]
    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// Set an explicit value, disabling auto mode.
    ///
    /// # Errors
    ///
    /// Returns [CurveError::NonPositiveTolerance] when `value <= 0`.
    pub fn set_value(&mut self, value: T) -> Result<()> {
        if value <= T::zero() {
            return Err(CurveError::NonPositiveTolerance {
                value: err_coord(value),
            });
        }
        self.value = value;
        self.auto = false;
        Ok(())
    }

    /// Enable or disable auto mode. The owning curve is responsible for
    /// calling [Tolerance::rederive] after enabling.
    #[inline]
    pub fn set_auto(&mut self, active: bool) {
        self.auto = active;
    }

    /// Rederive the value from `extent` if auto mode is active.
    pub fn rederive(&mut self, extent: Option<&AABB<T>>) {
        if self.auto {
            self.value = derived_tolerance(extent);
        }
    }

    /// Widen the value to at least `other` (used when absorbing a component
    /// whose tolerance is coarser).
    pub fn widen_to(&mut self, other: T) {
        if other > self.value {
            self.value = other;
        }
    }
}
