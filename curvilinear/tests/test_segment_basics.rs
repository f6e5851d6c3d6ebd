use curvilinear::assert_fuzzy_eq;
use curvilinear::core::traits::FuzzyEq;
use curvilinear::curve::{
    EndPointPolicy, ExtremityPolicy, GeometricCurve, LineSegment, LinearCurve, TravelDirection,
};
use curvilinear::errors::CurveError;
use curvilinear::frame::Frame;
use curvilinear::geom::{Displacement, Point2D};
use std::f64::consts::{FRAC_PI_2, PI};

fn seg(frame: &Frame<f64>, a: (f64, f64), b: (f64, f64)) -> LineSegment<f64> {
    LineSegment::new(
        &Point2D::new(a.0, a.1, frame),
        &Point2D::new(b.0, b.1, frame),
    )
}

#[test]
fn length_and_endpoints() {
    let world = Frame::world();
    let s = seg(&world, (1.0, 1.0), (4.0, 5.0));
    assert_fuzzy_eq!(s.length(), 5.0);
    assert_fuzzy_eq!(s.start_point().x(), 1.0);
    assert_fuzzy_eq!(s.end_point().y(), 5.0);
    assert!(!s.is_null());
}

#[test]
fn degenerate_segment_is_null() {
    let world = Frame::world();
    let s = seg(&world, (0.0, 0.0), (1.0e-12, 0.0));
    assert!(s.is_null());
}

#[test]
fn point_on_respects_extremity_policy() {
    let world = Frame::world();
    let s = seg(&world, (0.0, 0.0), (4.0, 0.0));
    let mid = Point2D::new(2.0, 1.0e-9, &world);
    let start = Point2D::new(0.0, 0.0, &world);
    let off = Point2D::new(2.0, 0.001, &world);

    assert!(s.is_point_on(&mid, ExtremityPolicy::Include, None));
    assert!(s.is_point_on(&mid, ExtremityPolicy::Exclude, None));
    assert!(s.is_point_on(&start, ExtremityPolicy::Include, None));
    assert!(!s.is_point_on(&start, ExtremityPolicy::Exclude, None));
    assert!(!s.is_point_on(&off, ExtremityPolicy::Include, None));
    // a wider explicit tolerance pulls the off-line point in
    assert!(s.is_point_on(&off, ExtremityPolicy::Include, Some(0.01)));
}

#[test]
fn bearing_forward_and_backward() {
    let world = Frame::world();
    let s = seg(&world, (0.0, 0.0), (4.0, 0.0));
    let p = Point2D::new(1.0, 0.0, &world);
    let fwd = s.bearing_at(&p, TravelDirection::Forward).unwrap();
    let bwd = s.bearing_at(&p, TravelDirection::Backward).unwrap();
    assert_fuzzy_eq!(fwd.radians(), 0.0);
    assert_fuzzy_eq!(bwd.radians(), PI);
    assert!(fwd.reversed().fuzzy_eq(bwd));

    let up = seg(&world, (0.0, 0.0), (0.0, 3.0));
    let q = Point2D::new(0.0, 1.5, &world);
    assert_fuzzy_eq!(
        up.bearing_at(&q, TravelDirection::Forward).unwrap().radians(),
        FRAC_PI_2
    );

    let far = Point2D::new(10.0, 10.0, &world);
    assert!(matches!(
        s.bearing_at(&far, TravelDirection::Forward),
        Err(CurveError::PointNotOnCurve { .. })
    ));
}

#[test]
fn angular_acceleration_is_zero_on_curve() {
    let world = Frame::world();
    let s = seg(&world, (0.0, 0.0), (4.0, 0.0));
    let p = Point2D::new(1.0, 0.0, &world);
    assert_eq!(
        s.angular_acceleration_at(&p, TravelDirection::Forward).unwrap(),
        0.0
    );
    let far = Point2D::new(9.0, 9.0, &world);
    assert!(s.angular_acceleration_at(&far, TravelDirection::Forward).is_err());
}

#[test]
fn closest_point_projects_and_clamps() {
    let world = Frame::world();
    let s = seg(&world, (0.0, 0.0), (4.0, 0.0));

    let interior = s.closest_point(&Point2D::new(2.0, 5.0, &world)).unwrap();
    assert!(interior.is_equal_to(&Point2D::new(2.0, 0.0, &world), 1e-9));

    let beyond = s.closest_point(&Point2D::new(5.0, 1.0, &world)).unwrap();
    assert!(beyond.is_equal_to(&Point2D::new(4.0, 0.0, &world), 1e-9));

    let before = s.closest_point(&Point2D::new(-2.0, -1.0, &world)).unwrap();
    assert!(before.is_equal_to(&Point2D::new(0.0, 0.0, &world), 1e-9));
}

#[test]
fn closest_point_far_field_tie_breaks_by_travel() {
    let world = Frame::world();
    // so short that a far query point is the same distance from both ends in
    // f64, yet long enough not to be null with this tolerance
    let mut s = seg(&world, (0.0, 0.0), (1.0e-9, 0.0));
    s.set_tolerance(1.0e-12).unwrap();

    // ahead of the segment's travel: the tie resolves to the end point
    let ahead = Point2D::new(1.0e8, 0.0, &world);
    assert_eq!(
        (ahead.position() - s.start_point().position()).length(),
        (ahead.position() - s.end_point().position()).length()
    );
    assert_eq!(s.closest_point(&ahead).unwrap().x(), 1.0e-9);

    // behind it: the tie resolves to the start point
    let behind = Point2D::new(-1.0e8, 0.0, &world);
    assert_eq!(s.closest_point(&behind).unwrap().x(), 0.0);
}

#[test]
fn relative_point_and_position_invert() {
    let world = Frame::world();
    let s = seg(&world, (0.0, 0.0), (4.0, 0.0));

    let mid = s.relative_point(0.5).unwrap();
    assert!(mid.is_equal_to(&Point2D::new(2.0, 0.0, &world), 1e-9));
    assert_fuzzy_eq!(s.relative_position(&mid).unwrap(), 0.5);

    // interval bounds return exactly the stored extremities
    assert_eq!(s.relative_point(0.0).unwrap().x(), 0.0);
    assert_eq!(s.relative_point(1.0).unwrap().x(), 4.0);

    assert!(matches!(
        s.relative_point(1.5),
        Err(CurveError::PositionOutOfRange { .. })
    ));
    assert!(matches!(
        s.relative_position(&Point2D::new(9.0, 9.0, &world)),
        Err(CurveError::PointNotOnCurve { .. })
    ));
}

#[test]
fn move_scale_and_reverse() {
    let world = Frame::world();
    let mut s = seg(&world, (1.0, 0.0), (3.0, 0.0));

    s.move_by(&Displacement::new(0.0, 2.0));
    assert!(s.start_point().is_equal_to(&Point2D::new(1.0, 2.0, &world), 1e-9));

    let origin = Point2D::new(0.0, 2.0, &world);
    s.scale(2.0, &origin).unwrap();
    assert!(s.start_point().is_equal_to(&Point2D::new(2.0, 2.0, &world), 1e-9));
    assert!(s.end_point().is_equal_to(&Point2D::new(6.0, 2.0, &world), 1e-9));
    assert_fuzzy_eq!(s.length(), 4.0);

    assert!(matches!(
        s.scale(0.0, &origin),
        Err(CurveError::ZeroScaleFactor)
    ));

    s.reverse();
    assert!(s.start_point().is_equal_to(&Point2D::new(6.0, 2.0, &world), 1e-9));
    assert!(s.end_point().is_equal_to(&Point2D::new(2.0, 2.0, &world), 1e-9));
}

#[test]
fn shorten_variants() {
    let world = Frame::world();
    let mut s = seg(&world, (0.0, 0.0), (4.0, 0.0));
    s.shorten(0.25, 0.75).unwrap();
    assert!(s.start_point().is_equal_to(&Point2D::new(1.0, 0.0, &world), 1e-9));
    assert!(s.end_point().is_equal_to(&Point2D::new(3.0, 0.0, &world), 1e-9));

    let mut t = seg(&world, (0.0, 0.0), (4.0, 0.0));
    t.shorten_from(0.5).unwrap();
    assert_fuzzy_eq!(t.length(), 2.0);
    t.shorten_to(0.5).unwrap();
    assert_fuzzy_eq!(t.length(), 1.0);

    let mut u = seg(&world, (0.0, 0.0), (4.0, 0.0));
    assert!(matches!(
        u.shorten(0.75, 0.25),
        Err(CurveError::PositionOutOfRange { .. })
    ));
    assert!(u.shorten_from(-0.5).is_err());
}

#[test]
fn adjust_extremities_within_tolerance() {
    let world = Frame::world();
    let mut s = seg(&world, (0.0, 0.0), (4.0, 0.0));
    s.set_tolerance(0.25).unwrap();
    assert!(!s.is_auto_tolerance());

    s.adjust_start_point_to(&Point2D::new(0.1, 0.1, &world)).unwrap();
    assert_eq!(s.start_point().x(), 0.1);

    assert!(matches!(
        s.adjust_end_point_to(&Point2D::new(5.0, 0.0, &world)),
        Err(CurveError::AdjustTargetTooFar { .. })
    ));

    assert!(matches!(
        s.set_tolerance(0.0),
        Err(CurveError::NonPositiveTolerance { .. })
    ));
}

#[test]
fn flatten_end_point_policy() {
    let world = Frame::world();
    let s = seg(&world, (0.0, 0.0), (4.0, 0.0));

    let mut pts = Vec::new();
    s.flatten(1e-3, EndPointPolicy::Include, &mut pts);
    assert_eq!(pts.len(), 2);

    pts.clear();
    s.flatten(1e-3, EndPointPolicy::Exclude, &mut pts);
    assert_eq!(pts.len(), 1);
    assert_eq!(pts[0].x(), 0.0);
}

#[test]
fn segments_never_self_cross() {
    let world = Frame::world();
    assert!(!seg(&world, (0.0, 0.0), (4.0, 0.0)).auto_crosses());
}
