//! Environment configuration.
//!
//! Every field has a default, so configuration files only need to name the values they
//! change.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{CarConfig, ObstacleConfig, RaySensor};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    // World
    pub region_width: f64,
    pub region_height: f64,
    pub boundary_width: f64,

    // Car
    pub car_width: f64,
    pub car_height: f64,
    pub car_protection_buffer: f64,
    pub car_max_velocity: f64,
    pub car_max_angle_velocity: f64,
    pub car_min_acc: f64,
    pub car_max_acc: f64,
    pub car_max_angle_acc: f64,

    // Obstacles
    pub object_min_num: usize,
    pub object_max_num: usize,
    pub object_min_size: f64,
    pub object_max_size: f64,

    // Sensor
    pub num_rays: usize,
    pub ray_length: f64,
    /// Concentrates rays towards the heading when positive.
    pub ray_sigmoid_density: f64,

    // Goal and rewards
    pub goal_radius: f64,
    pub step_reward: f32,
    pub collision_reward: f32,
    pub goal_reward: f32,

    /// Steps after which an episode is truncated. Zero disables the limit.
    pub max_steps: usize,
    /// Seed of the episode generator. Drawn from OS entropy when absent.
    pub seed: Option<u64>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            region_width: 200.0,
            region_height: 200.0,
            boundary_width: 1.0,

            car_width: 1.0,
            car_height: 3.0,
            car_protection_buffer: 2.0,
            car_max_velocity: 20.0,
            car_max_angle_velocity: 6.0,
            car_min_acc: -3.0,
            car_max_acc: 3.0,
            car_max_angle_acc: 3.0,

            object_min_num: 1,
            object_max_num: 8,
            object_min_size: 0.5,
            object_max_size: 3.0,

            num_rays: 12,
            ray_length: 10.0,
            ray_sigmoid_density: 0.0,

            goal_radius: 1.0,
            step_reward: 0.0,
            collision_reward: -1.0,
            goal_reward: 1.0,

            max_steps: 0,
            seed: None,
        }
    }
}

impl EnvironmentConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("region_width", self.region_width),
            ("region_height", self.region_height),
            ("boundary_width", self.boundary_width),
            ("car_width", self.car_width),
            ("car_height", self.car_height),
            ("car_protection_buffer", self.car_protection_buffer),
            ("car_max_velocity", self.car_max_velocity),
            ("car_max_angle_velocity", self.car_max_angle_velocity),
            ("car_min_acc", self.car_min_acc),
            ("car_max_acc", self.car_max_acc),
            ("car_max_angle_acc", self.car_max_angle_acc),
            ("object_min_size", self.object_min_size),
            ("object_max_size", self.object_max_size),
            ("ray_length", self.ray_length),
            ("ray_sigmoid_density", self.ray_sigmoid_density),
            ("goal_radius", self.goal_radius),
            ("step_reward", self.step_reward.into()),
            ("collision_reward", self.collision_reward.into()),
            ("goal_reward", self.goal_reward.into()),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }

        for (field, value) in [
            ("region_width", self.region_width),
            ("region_height", self.region_height),
            ("boundary_width", self.boundary_width),
            ("car_width", self.car_width),
            ("car_height", self.car_height),
            ("car_max_velocity", self.car_max_velocity),
            ("car_max_angle_velocity", self.car_max_angle_velocity),
            ("object_min_size", self.object_min_size),
            ("object_max_size", self.object_max_size),
            ("ray_length", self.ray_length),
            ("goal_radius", self.goal_radius),
            ("num_rays", self.num_rays as f64),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        for (field, value) in [
            ("car_protection_buffer", self.car_protection_buffer),
            ("car_max_angle_acc", self.car_max_angle_acc),
            ("ray_sigmoid_density", self.ray_sigmoid_density),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.car_min_acc > self.car_max_acc {
            return Err(ConfigError::InvalidAccelerationRange {
                min: self.car_min_acc,
                max: self.car_max_acc,
            });
        }
        if self.object_min_num > self.object_max_num {
            return Err(ConfigError::InvalidObjectCount {
                min: self.object_min_num,
                max: self.object_max_num,
            });
        }
        if self.object_min_size > self.object_max_size {
            return Err(ConfigError::InvalidObjectSize {
                min: self.object_min_size,
                max: self.object_max_size,
            });
        }

        Ok(())
    }

    pub fn car_config(&self) -> CarConfig {
        CarConfig {
            width: self.car_width,
            height: self.car_height,
            protection_buffer: self.car_protection_buffer,
            max_velocity: self.car_max_velocity,
            max_angle_velocity: self.car_max_angle_velocity,
            min_acc: self.car_min_acc,
            max_acc: self.car_max_acc,
            max_angle_acc: self.car_max_angle_acc,
        }
    }

    pub fn obstacle_config(&self) -> ObstacleConfig {
        ObstacleConfig {
            min_num: self.object_min_num,
            max_num: self.object_max_num,
            min_size: self.object_min_size,
            max_size: self.object_max_size,
            goal_radius: self.goal_radius,
        }
    }

    pub fn ray_sensor(&self) -> RaySensor {
        RaySensor::new(self.num_rays, self.ray_length, self.ray_sigmoid_density)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be finite")]
    NotFinite { field: &'static str },
    #[error("car_min_acc ({min}) must not exceed car_max_acc ({max})")]
    InvalidAccelerationRange { min: f64, max: f64 },
    #[error("object_min_num ({min}) must not exceed object_max_num ({max})")]
    InvalidObjectCount { min: usize, max: usize },
    #[error("object_min_size ({min}) must not exceed object_max_size ({max})")]
    InvalidObjectSize { min: f64, max: f64 },
    #[error("failed to read configuration")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration")]
    Parse(#[from] serde_json::Error),
}
