//! Episode simulation of the car in an environment with obstacles.
//!
//! Each step the car is integrated once, the outcome is classified (leaving the region,
//! hitting an obstacle, reaching the goal) and a fresh observation is assembled from the
//! updated car pose.

use std::f64::consts::{SQRT_2, TAU};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::{
    config::{ConfigError, EnvironmentConfig},
    domain::{
        Action, Angle, Car, Environment, HasCollision, Obstacle, Polygon, Position, RaySensor,
        Segment,
    },
};

/// Number of components of an action.
pub const ACTION_SIZE: usize = 2;

/// Scalar observation components besides the rays: speed, heading, angular velocity, goal
/// bearing cosine and sine, goal distance.
const SCALAR_OBSERVATIONS: usize = 6;

/// Interface between an episodic environment and whatever drives it.
pub trait Episodic {
    type Observation;

    /// Starts a new episode.
    fn reset(&mut self) -> Self::Observation;

    /// Advances the active episode by one tick.
    fn step(&mut self, action: &[f32]) -> Result<Step<Self::Observation>, SimulatorError>;

    fn observation_size(&self) -> usize;

    fn action_size(&self) -> usize;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum TerminationReason {
    OutOfBounds,
    Collision,
    Goal,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum EpisodeState {
    Active,
    Terminated(TerminationReason),
    Truncated,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Observation {
    pub car_speed: f64,
    pub heading: f64,
    pub angular_velocity: f64,
    pub rays: Vec<f64>,
    /// Cosine and sine of the goal direction relative to the heading.
    pub goal_bearing: (f64, f64),
    pub goal_distance: f64,
}

impl Observation {
    /// Flat vector in the order speed, heading, angular velocity, rays, goal bearing cosine,
    /// goal bearing sine, goal distance.
    pub fn to_vec(&self) -> Vec<f32> {
        [self.car_speed, self.heading, self.angular_velocity]
            .into_iter()
            .chain(self.rays.iter().copied())
            .chain([self.goal_bearing.0, self.goal_bearing.1, self.goal_distance])
            .map(|v| v as f32)
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Step<O> {
    pub observation: O,
    pub reward: f32,
    /// Whether the episode terminated. Truncation is reported separately in `info`.
    pub done: bool,
    pub info: StepInfo,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StepInfo {
    pub termination: Option<TerminationReason>,
    pub truncated: bool,
    pub steps: usize,
    pub obstacle_count: usize,
}

#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
    #[error("action must have {expected} components, got {actual}")]
    InvalidAction { expected: usize, actual: usize },
    #[error("episode is {0:?}, call reset before stepping")]
    InvalidCallOrder(EpisodeState),
}

/// Read-only snapshot of the world for renderers.
#[derive(Clone, Debug)]
pub struct WorldView<'a> {
    pub region: (f64, f64),
    pub boundary_width: f64,
    pub car: &'a Polygon,
    pub protection: &'a Polygon,
    pub obstacles: &'a [Obstacle],
    pub goal: &'a Polygon,
    pub rays: Vec<Segment>,
}

pub struct Simulator {
    config: EnvironmentConfig,
    seed: u64,
    rng: ChaCha8Rng,
    sensor: RaySensor,
    car: Car,
    environment: Environment,
    state: EpisodeState,
    steps: usize,
}

impl Simulator {
    /// Validates `config` and starts the first episode.
    pub fn new(config: EnvironmentConfig) -> Result<Self, SimulatorError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (car, environment) = spawn(&config, &mut rng);
        let simulator = Self {
            sensor: config.ray_sensor(),
            config,
            seed,
            rng,
            car,
            environment,
            state: EpisodeState::Active,
            steps: 0,
        };
        simulator.log_reset();
        Ok(simulator)
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Seed the episode generator was last created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn car(&self) -> &Car {
        &self.car
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Starts a new episode, drawing from the generator's current state.
    pub fn reset(&mut self) -> Observation {
        let (car, environment) = spawn(&self.config, &mut self.rng);
        self.car = car;
        self.environment = environment;
        self.state = EpisodeState::Active;
        self.steps = 0;
        self.log_reset();
        self.observation()
    }

    /// Replaces the generator with one seeded from `seed` and starts a new episode.
    pub fn reset_with_seed(&mut self, seed: u64) -> Observation {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.reset()
    }

    pub fn step(&mut self, action: &[f32]) -> Result<Step<Observation>, SimulatorError> {
        if self.state != EpisodeState::Active {
            return Err(SimulatorError::InvalidCallOrder(self.state));
        }
        let action = match *action {
            [forward, angle] => Action::from([forward, angle]),
            _ => {
                return Err(SimulatorError::InvalidAction {
                    expected: ACTION_SIZE,
                    actual: action.len(),
                })
            }
        };

        self.car = self.car.integrate(action);
        self.steps += 1;
        trace!(
            step = self.steps,
            forward = action.forward,
            angle = action.angle,
            heading = self.car.heading().radians(),
            speed = self.car.speed(),
            "integrated car"
        );

        let termination = self.classify();
        let reward = match termination {
            Some(TerminationReason::OutOfBounds | TerminationReason::Collision) => {
                self.config.collision_reward
            }
            Some(TerminationReason::Goal) => self.config.goal_reward,
            None => self.config.step_reward,
        };
        let truncated =
            termination.is_none() && self.config.max_steps > 0 && self.steps >= self.config.max_steps;

        if let Some(reason) = termination {
            self.state = EpisodeState::Terminated(reason);
            info!(?reason, steps = self.steps, reward, "episode terminated");
        } else if truncated {
            self.state = EpisodeState::Truncated;
            info!(steps = self.steps, "episode truncated");
        }

        Ok(Step {
            observation: self.observation(),
            reward,
            done: termination.is_some(),
            info: StepInfo {
                termination,
                truncated,
                steps: self.steps,
                obstacle_count: self.environment.obstacles().len(),
            },
        })
    }

    /// Observation of the current car pose.
    pub fn observation(&self) -> Observation {
        let origin = self.car.position();
        let heading = self.car.heading();
        let rays = self
            .sensor
            .sense(origin, heading, &self.environment.obstacle_polygons());

        let goal_displacement = self.environment.goal().center() - origin;
        let bearing = (goal_displacement.angle() - heading).radians();

        Observation {
            car_speed: self.car.speed(),
            heading: heading.radians(),
            angular_velocity: self.car.angular_velocity(),
            rays,
            goal_bearing: (bearing.cos(), bearing.sin()),
            goal_distance: goal_displacement.norm(),
        }
    }

    pub fn observation_size(&self) -> usize {
        self.config.num_rays + SCALAR_OBSERVATIONS
    }

    pub fn action_size(&self) -> usize {
        ACTION_SIZE
    }

    /// Lower and upper bound of every component of [`Observation::to_vec`].
    pub fn observation_bounds(&self) -> (Vec<f32>, Vec<f32>) {
        let c = &self.config;
        let max_distance = c.region_width.hypot(c.region_height);
        let rays = c.num_rays;
        let low = [0.0, 0.0, -c.car_max_angle_velocity]
            .into_iter()
            .chain(std::iter::repeat(0.0).take(rays))
            .chain([-1.0, -1.0, 0.0]);
        let high = [c.car_max_velocity * SQRT_2, TAU, c.car_max_angle_velocity]
            .into_iter()
            .chain(std::iter::repeat(c.ray_length).take(rays))
            .chain([1.0, 1.0, max_distance]);
        (
            low.map(|v| v as f32).collect(),
            high.map(|v| v as f32).collect(),
        )
    }

    pub fn view(&self) -> WorldView<'_> {
        WorldView {
            region: (self.environment.width(), self.environment.height()),
            boundary_width: self.environment.boundary_width(),
            car: self.car.body(),
            protection: self.car.protection(),
            obstacles: self.environment.obstacles(),
            goal: self.environment.goal().polygon(),
            rays: self
                .sensor
                .ray_lines(self.car.position(), self.car.heading()),
        }
    }

    fn classify(&self) -> Option<TerminationReason> {
        if !self.environment.contains(self.car.position()) {
            Some(TerminationReason::OutOfBounds)
        } else if self.environment.has_collision(&self.car) {
            Some(TerminationReason::Collision)
        } else if self.environment.reached_goal(&self.car) {
            Some(TerminationReason::Goal)
        } else {
            None
        }
    }

    fn log_reset(&self) {
        let realized = self.environment.obstacles().len() - 1;
        debug!(
            seed = self.seed,
            obstacles = realized,
            heading = self.car.heading().radians(),
            goal = ?self.environment.goal().center(),
            "episode reset"
        );
    }
}

impl Episodic for Simulator {
    type Observation = Observation;

    fn reset(&mut self) -> Observation {
        Simulator::reset(self)
    }

    fn step(&mut self, action: &[f32]) -> Result<Step<Observation>, SimulatorError> {
        Simulator::step(self, action)
    }

    fn observation_size(&self) -> usize {
        Simulator::observation_size(self)
    }

    fn action_size(&self) -> usize {
        Simulator::action_size(self)
    }
}

/// Places a resting car at the region center with a random heading and generates the world
/// around it.
fn spawn<R: Rng>(config: &EnvironmentConfig, rng: &mut R) -> (Car, Environment) {
    let heading = Angle::new(rng.random_range(0.0..TAU));
    let center = Position::new(config.region_width / 2.0, config.region_height / 2.0);
    let car = Car::new(center, heading, config.car_config());
    let environment = Environment::generate(
        config.region_width,
        config.region_height,
        config.boundary_width,
        &config.obstacle_config(),
        car.protection(),
        rng,
    );
    (car, environment)
}
