//! Ray-cast distance sensing.

use super::{make_ray_lines, Angle, Polygon, Position, Segment};

/// Bundle of rays fanning out around the car. Each ray reports the distance to the nearest
/// obstacle outline, or the ray length if nothing is in range.
#[derive(Clone, Debug, PartialEq)]
pub struct RaySensor {
    num_rays: usize,
    ray_length: f64,
    density_bias: f64,
}

impl RaySensor {
    pub fn new(num_rays: usize, ray_length: f64, density_bias: f64) -> Self {
        Self {
            num_rays,
            ray_length,
            density_bias,
        }
    }

    pub fn num_rays(&self) -> usize {
        self.num_rays
    }

    pub fn ray_length(&self) -> f64 {
        self.ray_length
    }

    pub fn ray_lines(&self, origin: Position, heading: Angle) -> Vec<Segment> {
        make_ray_lines(
            origin,
            heading,
            self.ray_length,
            self.num_rays,
            self.density_bias,
        )
    }

    /// One distance per ray, in ray order.
    pub fn sense(&self, origin: Position, heading: Angle, obstacles: &[&Polygon]) -> Vec<f64> {
        self.ray_lines(origin, heading)
            .iter()
            .map(|ray| self.distance_along(ray, origin, obstacles))
            .collect()
    }

    fn distance_along(&self, ray: &Segment, origin: Position, obstacles: &[&Polygon]) -> f64 {
        assert!(ray.length() > 0.0, "degenerate ray from {origin:?}");

        obstacles
            .iter()
            .flat_map(|obstacle| {
                assert!(!obstacle.is_empty(), "obstacle without outline");
                obstacle
                    .edges()
                    .flat_map(|edge| ray.intersections(&edge))
                    .map(|intersection| origin.distance(intersection))
                    .collect::<Vec<_>>()
            })
            .min_by(|a, b| a.total_cmp(b))
            .map_or(self.ray_length, |distance| distance.min(self.ray_length))
    }
}
