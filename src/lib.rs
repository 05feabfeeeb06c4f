//! Top-down 2D driving world for reinforcement learning.
//!
//! A car starts at the center of a rectangular region with randomly placed obstacles and has
//! to reach a goal. Every step yields ray-cast distances and goal-relative measurements as
//! observation, a reward and the termination status.


pub mod config;
pub mod controller;
pub mod domain;
pub mod simulator;
pub mod visualizer;

pub use config::{ConfigError, EnvironmentConfig};
pub use simulator::{
    EpisodeState, Episodic, Observation, Simulator, SimulatorError, Step, StepInfo,
    TerminationReason, WorldView,
};
