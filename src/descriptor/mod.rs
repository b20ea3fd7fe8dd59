//! Descriptor evaluation: turning a point set plus a raster location into a
//! fixed-length vector of samples.

use crate::geometry::PointSet;
use crate::raster::OwnedRaster;

impl PointSet {
    /// Chebyshev radius of the point set: `max(|x|, |y|)` over every point.
    /// Used by the fit predicate as a conservative stand-in for "radius"
    /// when the point set is not a literal circle (e.g. a BRIEF group).
    pub fn bounding_radius(&self) -> i32 {
        self.points()
            .iter()
            .map(|p| p.x.abs().max(p.y.abs()))
            .max()
            .unwrap_or(0)
    }
}

/// A center is only evaluated against a point set of a given `radius` when
/// the whole point set stays inside the raster: `radius < x`,
/// `x + radius < width`, `radius < y`, `y + radius < height`.
pub fn fits(center_x: usize, center_y: usize, radius: i32, width: usize, height: usize) -> bool {
    if radius < 0 {
        return true;
    }
    let r = radius as i64;
    let x = center_x as i64;
    let y = center_y as i64;
    r < x && x + r < width as i64 && r < y && y + r < height as i64
}

/// Returns the largest bounding radius across every point set in a group,
/// i.e. the radius the fit predicate must be checked against.
pub fn group_bounding_radius(group: &[PointSet]) -> i32 {
    group.iter().map(PointSet::bounding_radius).max().unwrap_or(0)
}

/// Looks up every point of `points` at raster coordinates `center + offset`.
///
/// Panics if the fit predicate was not checked by the caller first — callers
/// are expected to call `fits`/`group_bounding_radius` once per group before
/// evaluating any of its point sets.
fn sample(raster: &OwnedRaster, points: &PointSet, center_x: usize, center_y: usize) -> Vec<f32> {
    points
        .points()
        .iter()
        .map(|p| {
            let x = (center_x as i32 + p.x) as usize;
            let y = (center_y as i32 + p.y) as usize;
            raster.at(x, y)
        })
        .collect()
}

/// Evaluates a single circle: the descriptor scalar is the sum of the raw
/// lookups along the circle.
pub fn evaluate_circle(raster: &OwnedRaster, points: &PointSet, center_x: usize, center_y: usize) -> f32 {
    sample(raster, points, center_x, center_y).iter().sum()
}

/// Evaluates a `CircleGroup` at `center`, returning one sum per circle.
///
/// Returns `None` without touching the raster if the fit predicate fails for
/// the group's largest radius.
pub fn evaluate_circle_group(
    raster: &OwnedRaster,
    group: &[PointSet],
    center_x: usize,
    center_y: usize,
) -> Option<Vec<f32>> {
    let radius = group_bounding_radius(group);
    if !fits(center_x, center_y, radius, raster.width(), raster.height()) {
        return None;
    }
    Some(
        group
            .iter()
            .map(|circle| evaluate_circle(raster, circle, center_x, center_y))
            .collect(),
    )
}

/// Evaluates a `CircleGroup` at `center`, returning the raw per-circle
/// samples (not reduced to sums) — used by the orientation estimator, which
/// needs the individual samples along each circle rather than their sum.
pub fn evaluate_circle_group_raw(
    raster: &OwnedRaster,
    group: &[PointSet],
    center_x: usize,
    center_y: usize,
) -> Option<Vec<Vec<f32>>> {
    let radius = group_bounding_radius(group);
    if !fits(center_x, center_y, radius, raster.width(), raster.height()) {
        return None;
    }
    Some(
        group
            .iter()
            .map(|circle| sample(raster, circle, center_x, center_y))
            .collect(),
    )
}

/// Evaluates a single BRIEF point set at `center`: the raw lookups form the
/// descriptor vector, with no reduction.
pub fn evaluate_brief(
    raster: &OwnedRaster,
    points: &PointSet,
    center_x: usize,
    center_y: usize,
) -> Option<Vec<f32>> {
    let radius = points.bounding_radius();
    if !fits(center_x, center_y, radius, raster.width(), raster.height()) {
        return None;
    }
    Some(sample(raster, points, center_x, center_y))
}
