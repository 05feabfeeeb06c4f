//! The domain module encapsulates the core simulation logic. It defines the `Car` and
//! `Environment` entities, the geometry they are built from, and the rules governing their
//! interactions.
//!
//! By minimizing hard dependencies, this module ensures the simulation remains adaptable and
//! independent of how it is configured, driven or rendered.

mod basis;
mod car;
mod collision;
mod environment;
mod geometry;
mod sensor;

pub use basis::{Angle, Position};
pub use car::{Action, Car, CarConfig};
pub use collision::{overlaps, HasCollision};
pub use environment::{Environment, Goal, Obstacle, ObstacleConfig, ObstacleKind};
pub use geometry::{
    affine_transform, density_warp, make_circle, make_offset_ring, make_ray_lines,
    make_rectangle, Polygon, Segment, CIRCLE_SEGMENTS,
};
pub use sensor::RaySensor;
