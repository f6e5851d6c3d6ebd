//! Core/common math functions for working with angles, 2D space, and segment
//! intersections.
mod base_math;
mod seg_seg_intersect;
mod vector2;

pub use base_math::*;
pub use seg_seg_intersect::{SegSegIntr, seg_seg_intr};
pub use vector2::{Vector2, vec2};
