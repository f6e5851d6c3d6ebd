use curvilinear::curve::{
    CompositeCurve, CurveRef, GeometricCurve, LineSegment, LinearCurve,
};
use curvilinear::frame::{AffineFrame, Frame};
use curvilinear::geom::Point2D;

fn seg(frame: &Frame<f64>, a: (f64, f64), b: (f64, f64)) -> LineSegment<f64> {
    LineSegment::new(
        &Point2D::new(a.0, a.1, frame),
        &Point2D::new(b.0, b.1, frame),
    )
}

fn path(frame: &Frame<f64>, pts: &[(f64, f64)]) -> CompositeCurve<f64> {
    let mut curve = CompositeCurve::new(frame);
    for w in pts.windows(2) {
        curve
            .append_back(CurveRef::Segment(&seg(frame, (w[0].0, w[0].1), (w[1].0, w[1].1))))
            .unwrap();
    }
    curve
}

#[test]
fn crossing_through_component_interior() {
    let world = Frame::world();
    let curve = path(&world, &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
    let cutter = seg(&world, (2.0, -1.0), (2.0, 1.0));

    assert!(curve.crosses(CurveRef::Segment(&cutter)));
    // symmetric from the segment's side
    assert!(cutter.crosses(CurveRef::Composite(&curve)));

    let points = curve.intersect(CurveRef::Segment(&cutter));
    assert_eq!(points.len(), 1);
    assert!(points[0].is_equal_to(&Point2D::new(2.0, 0.0, &world), 1e-9));
}

#[test]
fn crossing_threaded_through_a_junction() {
    let world = Frame::world();
    // tent whose apex is an interior junction
    let tent = path(&world, &[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
    let cutter = seg(&world, (1.0, -1.0), (1.0, 2.0));

    // neither component alone crosses the cutter (each only touches it at an
    // endpoint), yet the chain passes through to the other side
    for comp in tent.components() {
        assert!(!comp.crosses(CurveRef::Segment(&cutter)));
    }
    assert!(tent.crosses(CurveRef::Segment(&cutter)));
    assert!(cutter.crosses(CurveRef::Composite(&tent)));

    let points = tent.intersect(CurveRef::Segment(&cutter));
    assert_eq!(points.len(), 1);
    assert!(points[0].is_equal_to(&Point2D::new(1.0, 1.0, &world), 1e-9));
}

#[test]
fn tangent_touch_at_junction_is_not_a_cross() {
    let world = Frame::world();
    let tent = path(&world, &[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
    // grazes the apex and stays on one side
    let graze = seg(&world, (0.0, 1.0), (2.0, 1.0));

    assert!(!tent.crosses(CurveRef::Segment(&graze)));
    // the touch point still shows up as an intersection
    let points = tent.intersect(CurveRef::Segment(&graze));
    assert_eq!(points.len(), 1);
    assert!(points[0].is_equal_to(&Point2D::new(1.0, 1.0, &world), 1e-9));
}

#[test]
fn endpoint_touch_is_adjacency_not_crossing() {
    let world = Frame::world();
    let curve = path(&world, &[(0.0, 0.0), (4.0, 0.0)]);
    // T shape: the cutter starts on the curve's interior
    let tee = seg(&world, (2.0, 0.0), (2.0, 2.0));

    assert!(!curve.crosses(CurveRef::Segment(&tee)));
    assert!(curve.are_adjacent(CurveRef::Segment(&tee)));
    let points = curve.intersect(CurveRef::Segment(&tee));
    assert_eq!(points.len(), 1);
    assert!(points[0].is_equal_to(&Point2D::new(2.0, 0.0, &world), 1e-9));
}

#[test]
fn two_composites_crossing() {
    let world = Frame::world();
    let a = path(&world, &[(0.0, 0.0), (2.0, 0.0), (4.0, 0.0)]);
    let b = path(&world, &[(1.0, -1.0), (1.0, 1.0), (3.0, 1.0)]);

    assert!(a.crosses(CurveRef::Composite(&b)));
    assert!(b.crosses(CurveRef::Composite(&a)));

    let points = a.intersect(CurveRef::Composite(&b));
    assert_eq!(points.len(), 1);
    assert!(points[0].is_equal_to(&Point2D::new(1.0, 0.0, &world), 1e-9));
}

#[test]
fn intersection_is_symmetric() {
    let world = Frame::world();
    let a = path(&world, &[(0.0, 0.0), (2.0, 0.0), (4.0, 0.0)]);
    let b = path(&world, &[(1.0, -1.0), (1.0, 1.0), (3.0, 1.0)]);

    let ab = a.intersect(CurveRef::Composite(&b));
    let ba = b.intersect(CurveRef::Composite(&a));
    assert_eq!(ab.len(), ba.len());
    for p in &ab {
        assert!(ba.iter().any(|q| q.is_equal_to(p, 1e-9)));
    }

    // the same holds across frames: results come back in each receiver's
    // own frame but describe the same world locations
    let shifted = Frame::new(AffineFrame::translation(10.0, 0.0));
    // world (1.5, -1) -> (1.5, 1)
    let cutter = seg(&shifted, (-8.5, -1.0), (-8.5, 1.0));
    let ac = a.intersect(CurveRef::Segment(&cutter));
    let ca = cutter.intersect(CurveRef::Composite(&a));
    assert_eq!(ac.len(), 1);
    assert_eq!(ca.len(), 1);
    assert!(ac[0].is_equal_to(&ca[0], 1e-9));
    assert!(ac[0].is_equal_to(&Point2D::new(1.5, 0.0, &world), 1e-9));
}

#[test]
fn composite_contiguity_merges_spans_across_junctions() {
    let world = Frame::world();
    // two collinear components; the overlap runs across their junction
    let curve = path(&world, &[(0.0, 0.0), (2.0, 0.0), (4.0, 0.0)]);
    let cover = seg(&world, (1.0, 0.0), (3.0, 0.0));

    assert!(curve.are_contiguous(CurveRef::Segment(&cover)));
    let points = curve.contiguousness_points(CurveRef::Segment(&cover));
    assert_eq!(points.len(), 2, "spans should merge at the junction");
    assert!(points[0].is_equal_to(&Point2D::new(1.0, 0.0, &world), 1e-9));
    assert!(points[1].is_equal_to(&Point2D::new(3.0, 0.0, &world), 1e-9));

    // span query at a point inside the merged span
    let at = Point2D::new(2.0, 0.0, &world);
    let (lo, hi) = curve
        .contiguousness_points_at(CurveRef::Segment(&cover), &at)
        .unwrap();
    assert!(lo.is_equal_to(&Point2D::new(1.0, 0.0, &world), 1e-9));
    assert!(hi.is_equal_to(&Point2D::new(3.0, 0.0, &world), 1e-9));
}

#[test]
fn straight_chain_does_not_self_cross() {
    let world = Frame::world();
    assert!(!path(&world, &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]).auto_crosses());
    assert!(!path(&world, &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)]).auto_crosses());
}

#[test]
fn closed_loop_does_not_self_cross() {
    let world = Frame::world();
    let square = path(
        &world,
        &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)],
    );
    assert!(!square.auto_crosses());
}

#[test]
fn self_crossing_through_component_interior() {
    let world = Frame::world();
    let curve = path(&world, &[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (2.0, -2.0)]);
    assert!(curve.auto_crosses());
}

#[test]
fn self_crossing_threaded_through_own_junction() {
    let world = Frame::world();
    // the final leg passes exactly through the junction at (2, 0)
    let curve = path(
        &world,
        &[(0.0, 0.0), (2.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, -2.0)],
    );
    assert!(curve.auto_crosses());
}
