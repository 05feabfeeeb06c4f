//! Collision detection based on polygon overlap.
//!
//! All shapes in the world are convex, except for the boundary wall which is a convex outline
//! with a single convex hole. Overlap is decided with the separating axis theorem on the
//! outlines, after which shapes resting entirely inside a hole are excluded.

use super::{Polygon, Position};

const EPSILON: f64 = 1e-12;

pub trait HasCollision {
    fn has_collision(&self, other: &dyn HasCollision) -> bool {
        overlaps(self.polygon(), other.polygon())
    }

    fn polygon(&self) -> &Polygon;
}

impl HasCollision for Polygon {
    fn polygon(&self) -> &Polygon {
        self
    }
}

/// Whether the filled areas of both polygons overlap. Outlines that merely touch do not count.
///
/// Panics if either polygon has no outline.
pub fn overlaps(polygon: &Polygon, other: &Polygon) -> bool {
    assert!(
        !polygon.is_empty() && !other.is_empty(),
        "polygon without outline"
    );

    convex_overlap(polygon.exterior(), other.exterior())
        && !inside_any_hole(polygon.exterior(), other)
        && !inside_any_hole(other.exterior(), polygon)
}

fn convex_overlap(ring: &[Position], other: &[Position]) -> bool {
    separating_axes(ring)
        .chain(separating_axes(other))
        .all(|axis| {
            let (min, max) = project(ring, axis);
            let (other_min, other_max) = project(other, axis);
            min.max(other_min) < max.min(other_max) - EPSILON
        })
}

fn separating_axes(ring: &[Position]) -> impl Iterator<Item = Position> + '_ {
    ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| *b - *a)
        .filter(|edge| edge.norm() > EPSILON)
        .map(|edge| Position::new(-edge.y(), edge.x()))
}

fn project(ring: &[Position], axis: Position) -> (f64, f64) {
    ring.iter()
        .map(|p| p.dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), d| {
            (min.min(d), max.max(d))
        })
}

fn inside_any_hole(ring: &[Position], polygon: &Polygon) -> bool {
    polygon
        .interiors()
        .iter()
        .any(|hole| ring.iter().all(|p| closed_convex_contains(hole, *p)))
}

/// Whether `point` lies inside or on the outline of a convex ring of either orientation.
fn closed_convex_contains(ring: &[Position], point: Position) -> bool {
    let crosses = ring
        .iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| (*b - *a).cross(point - *a))
        .collect::<Vec<_>>();
    let tolerance = EPSILON * ring.iter().map(Position::norm).fold(1.0, f64::max);
    crosses.iter().all(|c| *c >= -tolerance) || crosses.iter().all(|c| *c <= tolerance)
}
