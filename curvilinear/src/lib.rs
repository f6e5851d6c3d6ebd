//! Curvilinear is a 2D geometry library for piecewise linear curves carried
//! in pluggable reference frames.
//!
//! The two curve kinds are [LineSegment](crate::curve::LineSegment) and
//! [CompositeCurve](crate::curve::CompositeCurve), a chain of components
//! welded end to start. Every curve owns a [Frame](crate::frame::Frame)
//! its coordinates are interpreted in and a tolerance used by all the
//! relational predicates (crossing, adjacency, contiguity); in auto mode the
//! tolerance is rederived from the curve's extent after each mutation so
//! geometry far from the origin compares with proportionally wider slack.
//!
//! Cross-curve queries accept curves in any frame: the other operand is
//! re-expressed into the receiver's frame first, bisecting segments into
//! composites when the frame relation does not preserve linearity.
//!
//! # Examples
//!
//! ```
//! use curvilinear::curve::{CompositeCurve, CurveRef, GeometricCurve, LinearCurve, LineSegment};
//! use curvilinear::frame::Frame;
//! use curvilinear::geom::Point2D;
//!
//! let world: Frame<f64> = Frame::world();
//! let a = Point2D::new(0.0, 0.0, &world);
//! let b = Point2D::new(2.0, 0.0, &world);
//! let c = Point2D::new(2.0, 1.0, &world);
//!
//! let mut path = CompositeCurve::new(&world);
//! path.append_back(CurveRef::Segment(&LineSegment::new(&a, &b)))?;
//! path.append_back(CurveRef::Segment(&LineSegment::new(&b, &c)))?;
//! assert_eq!(path.component_count(), 2);
//! assert!((path.length() - 3.0).abs() < 1e-9);
//!
//! // a vertical segment through the first component crosses the path
//! let d = Point2D::new(1.0, -1.0, &world);
//! let e = Point2D::new(1.0, 1.0, &world);
//! let cutter = LineSegment::new(&d, &e);
//! assert!(path.crosses(CurveRef::Segment(&cutter)));
//! # Ok::<(), curvilinear::errors::CurveError>(())
//! ```

#[macro_use]
mod macros;

pub mod core;
pub mod curve;
pub mod errors;
pub mod frame;
pub mod geom;

pub use static_aabb2d_index::AABB;
