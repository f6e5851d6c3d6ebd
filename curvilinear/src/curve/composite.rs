use super::traits::{GeometricCurve, LinearCurve};
use super::{
    Curve, CurveRef, EndPointPolicy, ExtremityPolicy, LineSegment, TravelDirection,
    align_to_frame, check_position,
};
use crate::core::math::Vector2;
use crate::core::traits::Real;
use crate::errors::{CurveError, Result, err_coord};
use crate::frame::Frame;
use crate::geom::extent::{extents_overlap_eps, fold_extents};
use crate::geom::{Bearing, Displacement, Point2D, Tolerance};
use static_aabb2d_index::AABB;
use std::fmt;

/// Ordered chain of curve components connected end to start.
///
/// All components live in the composite's frame and share its tolerance
/// value. Appending and inserting weld the junction: an incoming extremity
/// within the junction tolerance is snapped exactly onto the existing one,
/// so consecutive components always chain with zero gap. The composite's
/// start is its first component's start, its end the last component's end.
#[derive(Debug, Clone)]
pub struct CompositeCurve<T = f64> {
    components: Vec<Curve<T>>,
    frame: Frame<T>,
    tolerance: Tolerance<T>,
}

impl<T> CompositeCurve<T>
where
    T: Real,
{
    /// New empty composite in `frame`, auto tolerance.
    pub fn new(frame: &Frame<T>) -> Self {
        CompositeCurve {
            components: Vec::new(),
            frame: frame.clone(),
            tolerance: Tolerance::default(),
        }
    }

    /// Components in travel order.
    pub fn components(&self) -> &[Curve<T>] {
        &self.components
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Build from components already expressed in `frame` and chained end to
    /// start (no junction checks).
    pub(crate) fn from_components_unchecked(
        components: Vec<Curve<T>>,
        frame: &Frame<T>,
        tolerance: Tolerance<T>,
    ) -> Self {
        let mut composite = CompositeCurve {
            components,
            frame: frame.clone(),
            tolerance,
        };
        composite.after_geometry_change();
        composite
    }

    #[inline]
    pub(crate) fn raw_start(&self) -> Vector2<T> {
        self.components
            .first()
            .map(|c| c.raw_start())
            .unwrap_or_else(Vector2::zero)
    }

    #[inline]
    pub(crate) fn raw_end(&self) -> Vector2<T> {
        self.components
            .last()
            .map(|c| c.raw_end())
            .unwrap_or_else(Vector2::zero)
    }

    pub(crate) fn snap_start_to(&mut self, p: Vector2<T>) {
        if let Some(first) = self.components.first_mut() {
            first.snap_start_to(p);
            self.after_geometry_change();
        }
    }

    pub(crate) fn snap_end_to(&mut self, p: Vector2<T>) {
        if let Some(last) = self.components.last_mut() {
            last.snap_end_to(p);
            self.after_geometry_change();
        }
    }

    pub(crate) fn shorten_to_point(&mut self, p: Vector2<T>) {
        if let Some(i) = self.component_containing(p) {
            self.components.truncate(i + 1);
            self.components[i].shorten_to_point(p);
            self.after_geometry_change();
        }
    }

    pub(crate) fn shorten_from_point(&mut self, p: Vector2<T>) {
        if let Some(i) = self.component_containing(p) {
            self.components.drain(..i);
            self.components[0].shorten_from_point(p);
            self.after_geometry_change();
        }
    }

    pub(crate) fn sync_tolerance(&mut self, value: T) {
        self.tolerance = Tolerance::fixed(value).unwrap_or_default();
        for comp in &mut self.components {
            comp.sync_tolerance(value);
        }
    }

    /// Rederive the auto tolerance from the new extent and push the shared
    /// value back down into every component.
    fn after_geometry_change(&mut self) {
        let extent = self.extent();
        self.tolerance.rederive(extent.as_ref());
        let value = self.tolerance.value();
        for comp in &mut self.components {
            comp.sync_tolerance(value);
        }
    }

    /// Append `curve` after the current end. The copy is re-expressed into
    /// this composite's frame first; composite arguments contribute their
    /// components one by one.
    ///
    /// # Errors
    ///
    /// [CurveError::JunctionMismatch] when the incoming start is farther from
    /// the current end than the junction tolerance
    /// (`max(self.tolerance(), curve.tolerance())`).
    pub fn append_back(&mut self, curve: CurveRef<'_, T>) -> Result<()> {
        let owned = curve.linear().copy_in_frame(&self.frame);
        self.append_back_owned(owned)
    }

    /// Insert `curve` before the current start; the mirror of
    /// [CompositeCurve::append_back].
    ///
    /// # Errors
    ///
    /// [CurveError::JunctionMismatch] when the incoming end is farther from
    /// the current start than the junction tolerance.
    pub fn insert_front(&mut self, curve: CurveRef<'_, T>) -> Result<()> {
        let owned = curve.linear().copy_in_frame(&self.frame);
        self.insert_front_owned(owned)
    }

    /// Append an owned `curve`, taking ownership: a curve already in this
    /// composite's frame is spliced without copying, anything else is
    /// re-expressed first. Composite arguments contribute their components
    /// one by one.
    ///
    /// # Errors
    ///
    /// [CurveError::JunctionMismatch] as for [CompositeCurve::append_back].
    pub fn append_back_owned(&mut self, curve: Curve<T>) -> Result<()> {
        if !curve.frame().is_same(&self.frame) {
            let copy = curve.copy_in_frame(&self.frame);
            return self.append_back_owned(copy);
        }
        match curve {
            Curve::Composite(other) => {
                for comp in other.components {
                    self.append_back_owned(comp)?;
                }
                Ok(())
            }
            leaf => self.append_component_back(leaf),
        }
    }

    /// Insert an owned `curve` before the current start; the mirror of
    /// [CompositeCurve::append_back_owned].
    ///
    /// # Errors
    ///
    /// [CurveError::JunctionMismatch] as for [CompositeCurve::insert_front].
    pub fn insert_front_owned(&mut self, curve: Curve<T>) -> Result<()> {
        if !curve.frame().is_same(&self.frame) {
            let copy = curve.copy_in_frame(&self.frame);
            return self.insert_front_owned(copy);
        }
        match curve {
            Curve::Composite(other) => {
                for comp in other.components.into_iter().rev() {
                    self.insert_front_owned(comp)?;
                }
                Ok(())
            }
            leaf => self.insert_component_front(leaf),
        }
    }

    fn append_component_back(&mut self, mut curve: Curve<T>) -> Result<()> {
        let incoming_tol = curve.tolerance();
        if !self.components.is_empty() {
            let junction = self.raw_end();
            self.check_junction(curve.raw_start(), junction, incoming_tol)?;
            if curve.raw_start() != junction {
                curve.snap_start_to(junction);
            }
        }
        self.components.push(curve);
        self.adopt_component_tolerance(incoming_tol);
        Ok(())
    }

    fn insert_component_front(&mut self, mut curve: Curve<T>) -> Result<()> {
        let incoming_tol = curve.tolerance();
        if !self.components.is_empty() {
            let junction = self.raw_start();
            self.check_junction(curve.raw_end(), junction, incoming_tol)?;
            if curve.raw_end() != junction {
                curve.snap_end_to(junction);
            }
        }
        self.components.insert(0, curve);
        self.adopt_component_tolerance(incoming_tol);
        Ok(())
    }

    fn check_junction(&self, incoming: Vector2<T>, junction: Vector2<T>, incoming_tol: T) -> Result<()> {
        let junction_tol = num_traits::real::Real::max(self.tolerance.value(), incoming_tol);
        let distance = (incoming - junction).length();
        if distance > junction_tol {
            return Err(CurveError::JunctionMismatch {
                x: err_coord(incoming.x),
                y: err_coord(incoming.y),
                distance: err_coord(distance),
                tolerance: err_coord(junction_tol),
            });
        }
        Ok(())
    }

    /// Tolerance update after adopting a component: auto mode rederives from
    /// the grown extent and never ends up finer than the incoming value.
    fn adopt_component_tolerance(&mut self, incoming: T) {
        let extent = self.extent();
        self.tolerance.rederive(extent.as_ref());
        if self.tolerance.is_auto() {
            self.tolerance.widen_to(incoming);
        }
        let value = self.tolerance.value();
        for comp in &mut self.components {
            comp.sync_tolerance(value);
        }
    }

    /// Remove all components, keeping the frame. The tolerance returns to
    /// the auto default.
    pub fn clear(&mut self) {
        self.components.clear();
        self.tolerance = Tolerance::default();
        self.after_geometry_change();
    }

    /// Split components so every one of `points` becomes a junction. Points
    /// already at a junction or extremity leave the chain unchanged.
    ///
    /// # Errors
    ///
    /// [CurveError::PointNotOnCurve] when any of `points` does not lie on
    /// the composite; components split so far stay split.
    pub fn split_at_points(&mut self, points: &[Point2D<T>]) -> Result<()> {
        for point in points {
            self.split_at_point(point)?;
        }
        Ok(())
    }

    /// Split at every intersection point with `other`.
    ///
    /// # Errors
    ///
    /// [CurveError::PointNotOnCurve] should an intersection point fail to
    /// land back on this composite.
    pub fn split_at_intersections_with(&mut self, other: CurveRef<'_, T>) -> Result<()> {
        let points = self.intersect(other);
        self.split_at_points(&points)
    }

    fn split_at_point(&mut self, point: &Point2D<T>) -> Result<()> {
        let p = point.position_in(&self.frame);
        let tol = self.tolerance.value();
        let Some(i) = self.component_containing(p) else {
            return Err(CurveError::PointNotOnCurve {
                x: err_coord(p.x),
                y: err_coord(p.y),
            });
        };
        let comp = &self.components[i];
        if comp.raw_start().fuzzy_eq_eps(p, tol) || comp.raw_end().fuzzy_eq_eps(p, tol) {
            return Ok(());
        }
        let mut tail = comp.clone();
        self.components[i].shorten_to_point(p);
        tail.shorten_from_point(p);
        self.components.insert(i + 1, tail);
        self.after_geometry_change();
        Ok(())
    }

    fn component_containing(&self, p: Vector2<T>) -> Option<usize> {
        let point = Point2D::from_vector(p, &self.frame);
        self.components
            .iter()
            .position(|c| c.is_point_on(&point, ExtremityPolicy::Include, None))
    }

    fn component_with_point(&self, point: &Point2D<T>) -> Result<usize> {
        self.components
            .iter()
            .position(|c| c.is_point_on(point, ExtremityPolicy::Include, None))
            .ok_or_else(|| CurveError::PointNotOnCurve {
                x: err_coord(point.x()),
                y: err_coord(point.y()),
            })
    }

    /// True when a crossing threads exactly through the junction after
    /// component `i`: the junction is strictly interior on `other` and the
    /// incoming/outgoing neighbors leave on strictly opposite sides of
    /// `other`'s tangent there. `other` must already be in this frame.
    fn crosses_at_junction(&self, other: CurveRef<'_, T>, i: usize, tol: T) -> bool {
        let junction = self.components[i].raw_end();
        let jp = Point2D::from_vector(junction, &self.frame);
        if !other
            .linear()
            .is_point_on(&jp, ExtremityPolicy::Exclude, Some(tol))
        {
            return false;
        }
        let Ok(bearing) = other.linear().bearing_at(&jp, TravelDirection::Forward) else {
            return false;
        };
        let d = bearing.direction();
        let side_prev = d.perp_dot(self.components[i].raw_start() - junction);
        let side_next = d.perp_dot(self.components[i + 1].raw_end() - junction);
        (side_prev < -tol && side_next > tol) || (side_prev > tol && side_next < -tol)
    }

    /// Contiguous span boundary points against `other` (already aligned to
    /// this frame), merged where spans continue across a junction.
    fn merged_contiguous_spans(&self, other: CurveRef<'_, T>, tol: T) -> Vec<Point2D<T>> {
        let mut points: Vec<Point2D<T>> = Vec::new();
        for comp in &self.components {
            let span = comp.contiguousness_points(other);
            for pair in span.chunks(2) {
                let a = pair[0].expressed_in(&self.frame);
                let b = pair[1].expressed_in(&self.frame);
                match points.last() {
                    Some(last) if last.is_equal_to(&a, tol) => {
                        let n = points.len();
                        points[n - 1] = b;
                    }
                    _ => {
                        points.push(a);
                        points.push(b);
                    }
                }
            }
        }
        points
    }

    fn shared_tolerance_with(&self, other: &dyn LinearCurve<T>) -> T {
        num_traits::real::Real::min(self.tolerance.value(), other.tolerance())
    }

    /// Composite built from a cloned slice of this one's components.
    fn partial(&self, from: usize, to: usize) -> CompositeCurve<T> {
        CompositeCurve::from_components_unchecked(
            self.components[from..to].to_vec(),
            &self.frame,
            self.tolerance,
        )
    }

}

impl<T> GeometricCurve<T> for CompositeCurve<T>
where
    T: Real,
{
    fn frame(&self) -> &Frame<T> {
        &self.frame
    }

    fn tolerance(&self) -> T {
        self.tolerance.value()
    }

    fn is_auto_tolerance(&self) -> bool {
        self.tolerance.is_auto()
    }

    fn set_tolerance(&mut self, tolerance: T) -> Result<()> {
        self.tolerance.set_value(tolerance)?;
        for comp in &mut self.components {
            comp.sync_tolerance(tolerance);
        }
        Ok(())
    }

    fn set_auto_tolerance(&mut self, active: bool) {
        self.tolerance.set_auto(active);
        self.after_geometry_change();
    }

    fn extent(&self) -> Option<AABB<T>> {
        fold_extents(self.components.iter().map(|c| c.extent()))
    }

    fn is_null(&self) -> bool {
        self.components.is_empty() || self.length() < self.tolerance.value()
    }

    fn as_curve(&self) -> CurveRef<'_, T> {
        CurveRef::Composite(self)
    }

    fn is_point_on(&self, point: &Point2D<T>, policy: ExtremityPolicy, tol: Option<T>) -> bool {
        let tol = tol.unwrap_or_else(|| self.tolerance.value());
        // interior junctions always count as on-curve, so the component test
        // runs with extremities included and only the composite's own
        // extremities obey the policy
        let on_any = self
            .components
            .iter()
            .any(|c| c.is_point_on(point, ExtremityPolicy::Include, Some(tol)));
        if !on_any {
            return false;
        }
        match policy {
            ExtremityPolicy::Include => true,
            ExtremityPolicy::Exclude => {
                let p = point.position_in(&self.frame);
                !(p.fuzzy_eq_eps(self.raw_start(), tol) || p.fuzzy_eq_eps(self.raw_end(), tol))
            }
        }
    }

    fn crosses(&self, other: CurveRef<'_, T>) -> bool {
        if self.is_null() {
            return false;
        }
        let aligned = align_to_frame(&self.frame, other);
        let other = aligned.view();
        if other.linear().is_null() {
            return false;
        }
        let tol = self.shared_tolerance_with(other.linear());
        if let (Some(a), Some(b)) = (self.extent(), other.linear().extent()) {
            if !extents_overlap_eps(&a, &b, tol) {
                return false;
            }
        }
        if self.components.iter().any(|c| c.crosses(other)) {
            return true;
        }
        // a crossing can also thread exactly through an interior junction,
        // which every per-component test reports as an endpoint touch
        (0..self.components.len().saturating_sub(1))
            .any(|i| self.crosses_at_junction(other, i, tol))
    }

    fn intersect(&self, other: CurveRef<'_, T>) -> Vec<Point2D<T>> {
        let aligned = align_to_frame(&self.frame, other);
        let other = aligned.view();
        let tol = self.shared_tolerance_with(other.linear());
        let mut points: Vec<Point2D<T>> = Vec::new();
        let push_unique = |points: &mut Vec<Point2D<T>>, p: Point2D<T>| {
            if !points.iter().any(|q| q.is_equal_to(&p, tol)) {
                points.push(p);
            }
        };
        for comp in &self.components {
            for p in comp.intersect(other) {
                push_unique(&mut points, p.expressed_in(&self.frame));
            }
        }
        for i in 0..self.components.len().saturating_sub(1) {
            if self.crosses_at_junction(other, i, tol) {
                push_unique(
                    &mut points,
                    Point2D::from_vector(self.components[i].raw_end(), &self.frame),
                );
            }
        }
        points
    }

    fn are_adjacent(&self, other: CurveRef<'_, T>) -> bool {
        if self.is_null() {
            return false;
        }
        let aligned = align_to_frame(&self.frame, other);
        let other = aligned.view().linear();
        if other.is_null() {
            return false;
        }
        let tol = self.shared_tolerance_with(other);
        // only the composite's own extremities qualify, never interior
        // junctions
        let start = Point2D::from_vector(self.raw_start(), &self.frame);
        let end = Point2D::from_vector(self.raw_end(), &self.frame);
        if other.is_point_on(&start, ExtremityPolicy::Include, Some(tol))
            || other.is_point_on(&end, ExtremityPolicy::Include, Some(tol))
        {
            return true;
        }
        self.is_point_on(&other.start_point(), ExtremityPolicy::Include, Some(tol))
            || self.is_point_on(&other.end_point(), ExtremityPolicy::Include, Some(tol))
    }

    fn are_contiguous(&self, other: CurveRef<'_, T>) -> bool {
        let aligned = align_to_frame(&self.frame, other);
        let other = aligned.view();
        self.components.iter().any(|c| c.are_contiguous(other))
    }

    fn contiguousness_points(&self, other: CurveRef<'_, T>) -> Vec<Point2D<T>> {
        let aligned = align_to_frame(&self.frame, other);
        let other = aligned.view();
        let tol = self.shared_tolerance_with(other.linear());
        self.merged_contiguous_spans(other, tol)
    }

    fn are_contiguous_at(&self, other: CurveRef<'_, T>, point: &Point2D<T>) -> Result<bool> {
        Ok(self.are_contiguous_at_and_get(other, point)?.is_some())
    }

    fn contiguousness_points_at(
        &self,
        other: CurveRef<'_, T>,
        point: &Point2D<T>,
    ) -> Result<(Point2D<T>, Point2D<T>)> {
        match self.are_contiguous_at_and_get(other, point)? {
            Some(pair) => Ok(pair),
            None => Err(CurveError::NotContiguous {
                x: err_coord(point.x()),
                y: err_coord(point.y()),
            }),
        }
    }

    fn are_contiguous_at_and_get(
        &self,
        other: CurveRef<'_, T>,
        point: &Point2D<T>,
    ) -> Result<Option<(Point2D<T>, Point2D<T>)>> {
        if !self.is_point_on(point, ExtremityPolicy::Include, None) {
            return Err(CurveError::PointNotOnCurve {
                x: err_coord(point.x()),
                y: err_coord(point.y()),
            });
        }
        let aligned = align_to_frame(&self.frame, other);
        let other = aligned.view();
        let tol = self.shared_tolerance_with(other.linear());
        let spans = self.merged_contiguous_spans(other, tol);
        for pair in spans.chunks(2) {
            let span = LineSegment::from_vectors(pair[0].position(), pair[1].position(), &self.frame);
            if span.is_point_on(point, ExtremityPolicy::Include, Some(tol)) {
                return Ok(Some((pair[0].clone(), pair[1].clone())));
            }
        }
        Ok(None)
    }

    fn copy_in_frame(&self, frame: &Frame<T>) -> Curve<T> {
        let mut components: Vec<Curve<T>> = Vec::with_capacity(self.components.len());
        for comp in &self.components {
            let mut copy = comp.copy_in_frame(frame);
            // a component can collapse to nothing under reprojection; drop
            // it and carry its end across so the survivors still chain
            if copy.is_null() {
                if let Some(last) = components.last_mut() {
                    last.snap_end_to(copy.raw_end());
                }
                continue;
            }
            // reprojection error can open a hairline gap at a junction; weld
            // it shut so the copy chains exactly
            if let Some(last) = components.last() {
                let junction = last.raw_end();
                if copy.raw_start() != junction {
                    copy.snap_start_to(junction);
                }
            }
            components.push(copy);
        }
        Curve::Composite(CompositeCurve::from_components_unchecked(
            components,
            frame,
            self.tolerance,
        ))
    }
}

impl<T> LinearCurve<T> for CompositeCurve<T>
where
    T: Real,
{
    fn start_point(&self) -> Point2D<T> {
        Point2D::from_vector(self.raw_start(), &self.frame)
    }

    fn end_point(&self) -> Point2D<T> {
        Point2D::from_vector(self.raw_end(), &self.frame)
    }

    fn length(&self) -> T {
        self.components
            .iter()
            .fold(T::zero(), |acc, c| acc + c.length())
    }

    fn bearing_at(&self, point: &Point2D<T>, direction: TravelDirection) -> Result<Bearing<T>> {
        let i = self.component_with_point(point)?;
        let comp = &self.components[i];
        // at a junction the forward tangent belongs to the outgoing
        // component, the backward one to the incoming
        if direction == TravelDirection::Forward
            && point
                .position_in(&self.frame)
                .fuzzy_eq_eps(comp.raw_end(), self.tolerance.value())
        {
            if let Some(next) = self.components[i + 1..].iter().find(|c| !c.is_null()) {
                return next.bearing_at(point, direction);
            }
        }
        comp.bearing_at(point, direction)
    }

    fn angular_acceleration_at(
        &self,
        point: &Point2D<T>,
        direction: TravelDirection,
    ) -> Result<T> {
        let i = self.component_with_point(point)?;
        let comp = &self.components[i];
        if direction == TravelDirection::Forward
            && point
                .position_in(&self.frame)
                .fuzzy_eq_eps(comp.raw_end(), self.tolerance.value())
        {
            if let Some(next) = self.components[i + 1..].iter().find(|c| !c.is_null()) {
                return next.angular_acceleration_at(point, direction);
            }
        }
        comp.angular_acceleration_at(point, direction)
    }

    fn closest_point(&self, point: &Point2D<T>) -> Result<Point2D<T>> {
        let mut best: Option<(T, Point2D<T>)> = None;
        for comp in &self.components {
            let candidate = comp.closest_point(point)?;
            let d = candidate.distance_to(point);
            match &best {
                Some((best_d, _)) if d >= *best_d => {}
                _ => best = Some((d, candidate)),
            }
        }
        best.map(|(_, p)| p).ok_or(CurveError::EmptyCurve)
    }

    fn relative_point(&self, position: T) -> Result<Point2D<T>> {
        let t = check_position(position)?;
        if self.components.is_empty() {
            return Err(CurveError::EmptyCurve);
        }
        if t == T::zero() {
            return Ok(self.start_point());
        }
        if t == T::one() {
            return Ok(self.end_point());
        }
        let target = t * self.length();
        let mut acc = T::zero();
        for comp in &self.components {
            let l = comp.length();
            if l > T::zero() && acc + l >= target {
                return comp.relative_point((target - acc) / l);
            }
            acc = acc + l;
        }
        // accumulated rounding can leave the walk just short of the target
        Ok(self.end_point())
    }

    fn relative_position(&self, point: &Point2D<T>) -> Result<T> {
        let i = self.component_with_point(point)?;
        let total = self.length();
        if total <= T::zero() {
            return Ok(T::zero());
        }
        let mut acc = T::zero();
        for comp in &self.components[..i] {
            acc = acc + comp.length();
        }
        let comp = &self.components[i];
        let local = comp.relative_position(point)?;
        Ok((acc + local * comp.length()) / total)
    }

    fn move_by(&mut self, displacement: &Displacement<T>) {
        for comp in &mut self.components {
            comp.move_by(displacement);
        }
        self.after_geometry_change();
    }

    fn scale(&mut self, factor: T, origin: &Point2D<T>) -> Result<()> {
        if factor == T::zero() {
            return Err(CurveError::ZeroScaleFactor);
        }
        for comp in &mut self.components {
            comp.scale(factor, origin)?;
        }
        self.after_geometry_change();
        Ok(())
    }

    fn shorten_from(&mut self, position: T) -> Result<()> {
        let t = check_position(position)?;
        let target = t * self.length();
        let mut acc = T::zero();
        let mut drop = 0;
        for comp in &self.components {
            let l = comp.length();
            if acc + l > target {
                break;
            }
            acc = acc + l;
            drop += 1;
        }
        self.components.drain(..drop);
        if let Some(first) = self.components.first_mut() {
            let l = first.length();
            if l > T::zero() && target > acc {
                first.shorten_from((target - acc) / l)?;
            }
        }
        self.after_geometry_change();
        Ok(())
    }

    fn shorten_to(&mut self, position: T) -> Result<()> {
        let t = check_position(position)?;
        let target = t * self.length();
        let mut acc = T::zero();
        let mut boundary = None;
        for (i, comp) in self.components.iter().enumerate() {
            let l = comp.length();
            if acc + l >= target {
                boundary = Some((i, acc));
                break;
            }
            acc = acc + l;
        }
        if let Some((i, acc)) = boundary {
            self.components.truncate(i + 1);
            let comp = &mut self.components[i];
            let l = comp.length();
            if l > T::zero() {
                comp.shorten_to((target - acc) / l)?;
            }
        }
        self.after_geometry_change();
        Ok(())
    }

    fn shorten(&mut self, from_position: T, to_position: T) -> Result<()> {
        let t0 = check_position(from_position)?;
        let t1 = check_position(to_position)?;
        if t0 > t1 {
            return Err(CurveError::PositionOutOfRange {
                value: err_coord(from_position),
            });
        }
        self.shorten_to(t1)?;
        if t1 > T::zero() {
            self.shorten_from(t0 / t1)?;
        }
        Ok(())
    }

    fn reverse(&mut self) {
        for comp in &mut self.components {
            comp.reverse();
        }
        self.components.reverse();
    }

    fn adjust_start_point_to(&mut self, point: &Point2D<T>) -> Result<()> {
        if self.components.is_empty() {
            return Err(CurveError::EmptyCurve);
        }
        let p = point.position_in(&self.frame);
        let distance = (p - self.raw_start()).length();
        if distance > self.tolerance.value() {
            return Err(CurveError::AdjustTargetTooFar {
                x: err_coord(p.x),
                y: err_coord(p.y),
                distance: err_coord(distance),
                tolerance: err_coord(self.tolerance.value()),
            });
        }
        self.snap_start_to(p);
        Ok(())
    }

    fn adjust_end_point_to(&mut self, point: &Point2D<T>) -> Result<()> {
        if self.components.is_empty() {
            return Err(CurveError::EmptyCurve);
        }
        let p = point.position_in(&self.frame);
        let distance = (p - self.raw_end()).length();
        if distance > self.tolerance.value() {
            return Err(CurveError::AdjustTargetTooFar {
                x: err_coord(p.x),
                y: err_coord(p.y),
                distance: err_coord(distance),
                tolerance: err_coord(self.tolerance.value()),
            });
        }
        self.snap_end_to(p);
        Ok(())
    }

    fn auto_crosses(&self) -> bool {
        let n = self.components.len();
        if self.components.iter().any(|c| c.auto_crosses()) {
            return true;
        }
        // test each component against the chain before it; the composite
        // level test also catches a return threaded exactly through one of
        // the chain's interior junctions
        (1..n).any(|j| {
            self.partial(0, j)
                .crosses(self.components[j].as_curve())
        })
    }

    fn flatten(&self, tolerance: T, policy: EndPointPolicy, out: &mut Vec<Point2D<T>>) {
        for comp in &self.components {
            comp.flatten(tolerance, EndPointPolicy::Exclude, out);
        }
        if policy == EndPointPolicy::Include && !self.components.is_empty() {
            out.push(self.end_point());
        }
    }
}

impl<T> fmt::Display for CompositeCurve<T>
where
    T: Real,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeCurve[{}]", self.components.len())?;
        for (i, comp) in self.components.iter().enumerate() {
            write!(f, "\n  {}: {}", i, comp)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;
    use crate::core::traits::FuzzyEq;

    fn seg(frame: &Frame<f64>, a: (f64, f64), b: (f64, f64)) -> LineSegment<f64> {
        LineSegment::from_vectors(vec2(a.0, a.1), vec2(b.0, b.1), frame)
    }

    #[test]
    fn append_welds_small_gap() {
        let world = Frame::world();
        let mut curve = CompositeCurve::new(&world);
        curve
            .append_back(CurveRef::Segment(&seg(&world, (0.0, 0.0), (1.0, 0.0))))
            .unwrap();
        // start off by less than the tolerance, gets snapped onto the end
        curve
            .append_back(CurveRef::Segment(&seg(&world, (1.0 + 1e-9, 0.0), (2.0, 0.0))))
            .unwrap();
        assert_eq!(curve.component_count(), 2);
        assert_eq!(curve.components()[1].raw_start(), vec2(1.0, 0.0));
        assert!(curve.length().fuzzy_eq_eps(2.0, 1e-8));
    }

    #[test]
    fn append_rejects_large_gap() {
        let world = Frame::world();
        let mut curve = CompositeCurve::new(&world);
        curve
            .append_back(CurveRef::Segment(&seg(&world, (0.0, 0.0), (1.0, 0.0))))
            .unwrap();
        let err = curve
            .append_back(CurveRef::Segment(&seg(&world, (1.5, 0.0), (2.0, 0.0))))
            .unwrap_err();
        assert!(matches!(err, CurveError::JunctionMismatch { .. }));
        assert_eq!(curve.component_count(), 1);
    }

    #[test]
    fn insert_front_welds_incoming_end() {
        let world = Frame::world();
        let mut curve = CompositeCurve::new(&world);
        curve
            .append_back(CurveRef::Segment(&seg(&world, (1.0, 0.0), (2.0, 0.0))))
            .unwrap();
        curve
            .insert_front(CurveRef::Segment(&seg(&world, (0.0, 0.0), (1.0 - 1e-9, 0.0))))
            .unwrap();
        assert_eq!(curve.raw_start(), vec2(0.0, 0.0));
        assert_eq!(curve.components()[0].raw_end(), vec2(1.0, 0.0));
    }

    #[test]
    fn split_at_interior_point_makes_junction() {
        let world = Frame::world();
        let mut curve = CompositeCurve::new(&world);
        curve
            .append_back(CurveRef::Segment(&seg(&world, (0.0, 0.0), (4.0, 0.0))))
            .unwrap();
        curve
            .split_at_points(&[Point2D::new(1.0, 0.0, &world)])
            .unwrap();
        assert_eq!(curve.component_count(), 2);
        assert_eq!(curve.components()[0].raw_end(), vec2(1.0, 0.0));
        assert_eq!(curve.components()[1].raw_start(), vec2(1.0, 0.0));
        // splitting at an existing junction is a no-op
        curve
            .split_at_points(&[Point2D::new(1.0, 0.0, &world)])
            .unwrap();
        assert_eq!(curve.component_count(), 2);
    }

    #[test]
    fn shorten_walk_drops_whole_components() {
        let world = Frame::world();
        let mut curve = CompositeCurve::new(&world);
        for (a, b) in [((0.0, 0.0), (1.0, 0.0)), ((1.0, 0.0), (2.0, 0.0)), ((2.0, 0.0), (3.0, 0.0))] {
            curve
                .append_back(CurveRef::Segment(&seg(&world, a, b)))
                .unwrap();
        }
        curve.shorten_from(0.5).unwrap();
        assert_eq!(curve.component_count(), 2);
        assert_eq!(curve.raw_start(), vec2(1.5, 0.0));
        assert!(curve.length().fuzzy_eq_eps(1.5, 1e-8));
    }
}
