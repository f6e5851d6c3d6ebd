//! Shared geometric value types: frame-tagged points, displacements,
//! bearings, tolerances, and bounding extent helpers.
pub mod extent;
mod point;
mod tolerance;

pub use point::{Bearing, Displacement, Point2D};
pub use tolerance::{Tolerance, derived_tolerance};
