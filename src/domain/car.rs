//! Car with a rectangular body driven by forward and angular acceleration.
//!
//! Accelerations act instantly and velocities are added to the pose once per step. There is no
//! friction or mass.

use super::{make_rectangle, Angle, HasCollision, Polygon, Position};

#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    heading: Angle,
    linear_velocity: Position,
    angular_velocity: f64,
    body: Polygon,
    protection: Polygon,
    config: CarConfig,
}

impl Car {
    /// Places a resting car at `center`. The protection zone is computed once here and does not
    /// follow the car afterwards.
    pub fn new(center: Position, heading: Angle, config: CarConfig) -> Self {
        let heading = heading.wrapped();
        let body = make_rectangle(center, config.width, config.height, heading);
        let protection = body.buffer(config.protection_buffer);
        Self {
            heading,
            linear_velocity: Position::default(),
            angular_velocity: 0.0,
            body,
            protection,
            config,
        }
    }

    pub fn heading(&self) -> Angle {
        self.heading
    }

    pub fn linear_velocity(&self) -> Position {
        self.linear_velocity
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    pub fn speed(&self) -> f64 {
        self.linear_velocity.norm()
    }

    /// Reference point of the car: the centroid of its body.
    pub fn position(&self) -> Position {
        self.body.centroid()
    }

    pub fn body(&self) -> &Polygon {
        &self.body
    }

    pub fn protection(&self) -> &Polygon {
        &self.protection
    }

    /// Advances the car by one unit time step.
    pub fn integrate(&self, action: Action) -> Car {
        let forward_acc = lerp(
            action.forward,
            (-1.0, 1.0),
            (self.config.min_acc, self.config.max_acc),
        );
        let angle_acc = lerp(
            action.angle,
            (-1.0, 1.0),
            (-self.config.max_angle_acc, self.config.max_angle_acc),
        );

        let angular_velocity = (self.angular_velocity + angle_acc).clamp(
            -self.config.max_angle_velocity,
            self.config.max_angle_velocity,
        );
        let heading = (self.heading + Angle::new(angular_velocity)).wrapped();

        let linear_velocity = (self.linear_velocity
            + Position::from_angle(heading) * forward_acc)
            .clamp_per_axis(self.config.max_velocity);

        Car {
            heading,
            linear_velocity,
            angular_velocity,
            body: self.body.affine_transform(linear_velocity, angular_velocity),
            protection: self.protection.clone(),
            config: self.config.clone(),
        }
    }
}

impl HasCollision for Car {
    fn polygon(&self) -> &Polygon {
        &self.body
    }
}

/// Body dimensions and motion limits. `width` is measured across the car, `height` along its
/// heading.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub struct CarConfig {
    pub width: f64,
    pub height: f64,
    pub protection_buffer: f64,
    pub max_velocity: f64,
    pub max_angle_velocity: f64,
    pub min_acc: f64,
    pub max_acc: f64,
    pub max_angle_acc: f64,
}

/// Normalized control input. Both components are nominally in `[-1, 1]`; values outside that
/// range extrapolate the acceleration mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Action {
    pub forward: f64,
    pub angle: f64,
}

impl Action {
    pub const fn new(forward: f64, angle: f64) -> Self {
        Self { forward, angle }
    }
}

impl From<[f32; 2]> for Action {
    fn from(value: [f32; 2]) -> Self {
        Self::new(value[0].into(), value[1].into())
    }
}

/// Maps `x` linearly from the `from` interval onto the `to` interval.
fn lerp(x: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    (x - from.0) / (from.1 - from.0) * (to.1 - to.0) + to.0
}
