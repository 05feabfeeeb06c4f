//! Polygon construction and rigid transforms.
//!
//! Polygons are plain vertex rings with optional holes. Only the shapes the world needs are
//! supported: oriented rectangles, polygonal circles, convex offsets and the rectangular
//! boundary ring.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::{Isometry2, Point2, Vector2};

use super::{Angle, Position};

/// Number of vertices used to approximate a circle.
pub const CIRCLE_SEGMENTS: usize = 64;

/// Number of arc segments per quarter turn when rounding offset corners.
const QUADRANT_SEGMENTS: usize = 16;

const EPSILON: f64 = 1e-12;

#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    exterior: Vec<Position>,
    interiors: Vec<Vec<Position>>,
}

impl Polygon {
    /// Creates a polygon from an open vertex ring. The closing edge from the last to the first
    /// vertex is implied.
    pub fn new(exterior: Vec<Position>) -> Self {
        Self {
            exterior,
            interiors: vec![],
        }
    }

    pub fn with_interior(mut self, interior: Vec<Position>) -> Self {
        self.interiors.push(interior);
        self
    }

    pub fn exterior(&self) -> &[Position] {
        &self.exterior
    }

    pub fn interiors(&self) -> &[Vec<Position>] {
        &self.interiors
    }

    pub fn rings(&self) -> impl Iterator<Item = &[Position]> {
        std::iter::once(self.exterior.as_slice()).chain(self.interiors.iter().map(Vec::as_slice))
    }

    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    /// All edges of the outline, holes included.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        self.rings().flat_map(ring_edges)
    }

    pub fn area(&self) -> f64 {
        signed_area(&self.exterior).abs()
            - self
                .interiors
                .iter()
                .map(|r| signed_area(r).abs())
                .sum::<f64>()
    }

    /// Area centroid. Holes are subtracted. Degenerate outlines fall back to the vertex mean.
    ///
    /// Panics if the polygon has no outline.
    pub fn centroid(&self) -> Position {
        assert!(!self.is_empty(), "polygon without outline");
        let (exterior_area, exterior_centroid) = ring_moment(&self.exterior);
        let (mut area, mut moment) = (exterior_area, exterior_centroid * exterior_area);
        for interior in &self.interiors {
            let (hole_area, hole_centroid) = ring_moment(interior);
            area -= hole_area;
            moment = moment - hole_centroid * hole_area;
        }
        if area.abs() < EPSILON {
            return vertex_mean(&self.exterior);
        }
        moment * area.recip()
    }

    /// Rotates about the centroid by `angular_displacement`, then translates by
    /// `displacement`.
    pub fn affine_transform(&self, displacement: Position, angular_displacement: f64) -> Polygon {
        let centroid = self.centroid();
        let isometry = Isometry2::new(
            Vector2::from(centroid + displacement),
            angular_displacement,
        );
        let transform = |ring: &[Position]| -> Vec<Position> {
            ring.iter()
                .map(|p| Position::from(isometry.transform_point(&Point2::from(*p - centroid))))
                .collect()
        };
        Polygon {
            exterior: transform(&self.exterior),
            interiors: self.interiors.iter().map(|r| transform(r.as_slice())).collect(),
        }
    }

    /// Offsets a convex polygon outward by `distance`, rounding the corners. Holes are ignored.
    pub fn buffer(&self, distance: f64) -> Polygon {
        assert!(
            distance >= 0.0,
            "buffer distance must be non-negative, got {distance}"
        );
        assert!(!self.is_empty(), "cannot buffer an empty polygon");

        let mut ring = self.exterior.clone();
        if signed_area(&ring) < 0.0 {
            ring.reverse();
        }

        let n = ring.len();
        let step = FRAC_PI_2 / QUADRANT_SEGMENTS as f64;
        let mut exterior = Vec::with_capacity(n * (QUADRANT_SEGMENTS + 1));
        for i in 0..n {
            let previous = ring[(i + n - 1) % n];
            let vertex = ring[i];
            let next = ring[(i + 1) % n];
            let start = outward_normal(vertex - previous);
            let sweep = (outward_normal(next - vertex) - start).rem_euclid(TAU);
            if sweep < EPSILON || sweep > TAU - EPSILON {
                exterior.push(vertex + Position::from_angle(Angle::new(start)) * distance);
                continue;
            }
            let segments = ((sweep / step).ceil() as usize).max(1);
            exterior.extend((0..=segments).map(|k| {
                let angle = start + sweep * k as f64 / segments as f64;
                vertex + Position::from_angle(Angle::new(angle)) * distance
            }));
        }
        Polygon::new(exterior)
    }
}

/// A straight line segment between two points.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Segment {
    p1: Position,
    p2: Position,
}

impl Segment {
    pub fn new(p1: Position, p2: Position) -> Self {
        Self { p1, p2 }
    }

    pub fn start(&self) -> Position {
        self.p1
    }

    pub fn end(&self) -> Position {
        self.p2
    }

    pub fn direction(&self) -> Position {
        self.p2 - self.p1
    }

    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// All points shared by both segments. Collinear overlaps yield the endpoints of the
    /// overlapping part.
    pub fn intersections(&self, other: &Segment) -> Vec<Position> {
        let r = self.direction();
        let s = other.direction();
        let offset = other.p1 - self.p1;
        let denominator = r.cross(s);

        if denominator.abs() > EPSILON * r.norm() * s.norm() {
            let t = offset.cross(s) / denominator;
            let u = offset.cross(r) / denominator;
            if (-EPSILON..=1.0 + EPSILON).contains(&t) && (-EPSILON..=1.0 + EPSILON).contains(&u)
            {
                return vec![self.p1 + r * t.clamp(0.0, 1.0)];
            }
            return vec![];
        }

        let rr = r.dot(r);
        if rr < EPSILON || offset.cross(r).abs() > EPSILON * r.norm().max(1.0) {
            // Parallel and apart, or a degenerate segment.
            return vec![];
        }

        let t0 = offset.dot(r) / rr;
        let t1 = t0 + s.dot(r) / rr;
        let (low, high) = (t0.min(t1).max(0.0), t0.max(t1).min(1.0));
        if low > high + EPSILON {
            vec![]
        } else if (high - low).abs() <= EPSILON {
            vec![self.p1 + r * low]
        } else {
            vec![self.p1 + r * low, self.p1 + r * high]
        }
    }

    pub fn distance_to(&self, point: Position) -> f64 {
        let r = self.direction();
        let rr = r.dot(r);
        if rr < EPSILON {
            return self.p1.distance(point);
        }
        let t = ((point - self.p1).dot(r) / rr).clamp(0.0, 1.0);
        (self.p1 + r * t).distance(point)
    }
}

/// Rectangle of `width` across and `height` along its heading, rotated by `heading` about its
/// own center and placed at `center`.
///
/// Corners are emitted front-left, front-right, rear-right, rear-left relative to a heading of
/// zero (facing the positive x-axis).
pub fn make_rectangle(center: Position, width: f64, height: f64, heading: Angle) -> Polygon {
    let (half_along, half_across) = (height / 2.0, width / 2.0);
    Polygon::new(
        [
            Position::new(half_along, half_across),
            Position::new(half_along, -half_across),
            Position::new(-half_along, -half_across),
            Position::new(-half_along, half_across),
        ]
        .into_iter()
        .map(|corner| center + corner.rotate_vector(heading))
        .collect(),
    )
}

pub fn make_circle(center: Position, radius: f64) -> Polygon {
    Polygon::new(
        (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = Angle::new(TAU * i as f64 / CIRCLE_SEGMENTS as f64);
                center + Position::from_angle(angle) * radius
            })
            .collect(),
    )
}

/// Wall of thickness `2 * width` around the rectangle `[0, size.0] x [0, size.1]`. The inner
/// edge coincides with the rectangle.
pub fn make_offset_ring(size: (f64, f64), width: f64) -> Polygon {
    let (x_max, y_max) = size;
    let outer = 2.0 * width;
    Polygon::new(vec![
        Position::new(-outer, -outer),
        Position::new(x_max + outer, -outer),
        Position::new(x_max + outer, y_max + outer),
        Position::new(-outer, y_max + outer),
    ])
    .with_interior(vec![
        Position::new(0.0, 0.0),
        Position::new(0.0, y_max),
        Position::new(x_max, y_max),
        Position::new(x_max, 0.0),
    ])
}

/// Monotonic remapping of `[0, 2π]` onto itself that packs evenly spaced inputs towards 0 and
/// 2π (straight ahead) when `density_bias > 0`. Identity otherwise.
pub fn density_warp(angle: f64, density_bias: f64) -> f64 {
    if density_bias <= 0.0 {
        return angle;
    }
    let centered = (angle - PI) / PI;
    PI + PI * (density_bias * centered).atan() / density_bias.atan()
}

/// `num_rays` segments of `length` fanning out from `origin` over a full turn, starting at
/// `heading`.
pub fn make_ray_lines(
    origin: Position,
    heading: Angle,
    length: f64,
    num_rays: usize,
    density_bias: f64,
) -> Vec<Segment> {
    (0..num_rays)
        .map(|i| {
            let uniform = TAU * i as f64 / num_rays as f64;
            let angle = heading + Angle::new(density_warp(uniform, density_bias));
            Segment::new(origin, origin + Position::from_angle(angle) * length)
        })
        .collect()
}

pub fn affine_transform(
    polygon: &Polygon,
    displacement: Position,
    angular_displacement: f64,
) -> Polygon {
    polygon.affine_transform(displacement, angular_displacement)
}

fn ring_edges(ring: &[Position]) -> impl Iterator<Item = Segment> + '_ {
    ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| Segment::new(*a, *b))
}

fn signed_area(ring: &[Position]) -> f64 {
    ring_edges(ring)
        .map(|e| e.start().cross(e.end()))
        .sum::<f64>()
        / 2.0
}

/// Unsigned area and centroid of a single ring.
fn ring_moment(ring: &[Position]) -> (f64, Position) {
    let area = signed_area(ring);
    if area.abs() < EPSILON {
        return (0.0, vertex_mean(ring));
    }
    let sum = ring_edges(ring).fold(Position::default(), |acc, e| {
        let (a, b) = (e.start(), e.end());
        acc + (a + b) * a.cross(b)
    });
    (area.abs(), sum * (6.0 * area).recip())
}

fn vertex_mean(ring: &[Position]) -> Position {
    if ring.is_empty() {
        return Position::default();
    }
    ring.iter().fold(Position::default(), |acc, p| acc + *p) * (ring.len() as f64).recip()
}

/// Angle of the outward normal of a counter-clockwise edge.
fn outward_normal(edge: Position) -> f64 {
    (-edge.x()).atan2(edge.y())
}
