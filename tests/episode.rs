use std::f64::consts::TAU;

use driving_world::{
    domain::ObstacleKind, EnvironmentConfig, EpisodeState, Episodic, Simulator, SimulatorError,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

fn config(seed: u64) -> EnvironmentConfig {
    EnvironmentConfig {
        seed: Some(seed),
        ..Default::default()
    }
}

fn drive(simulator: &mut Simulator, actions: &[[f32; 2]]) -> Vec<(Vec<f32>, f32, bool)> {
    actions
        .iter()
        .map_while(|action| simulator.step(action).ok())
        .map(|step| (step.observation.to_vec(), step.reward, step.done))
        .collect()
}

#[test]
fn test_different_seeds_differ() {
    let first = Simulator::new(config(1)).unwrap();
    let second = Simulator::new(config(2)).unwrap();
    assert_ne!(first.environment(), second.environment());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
fn test_no_obstacles_leaves_only_boundary(#[case] seed: u64) {
    let simulator = Simulator::new(EnvironmentConfig {
        object_min_num: 0,
        object_max_num: 0,
        ..config(seed)
    })
    .unwrap();
    let obstacles = simulator.environment().obstacles();
    assert_eq!(obstacles.len(), 1);
    assert_eq!(obstacles[0].kind(), ObstacleKind::Boundary);
}

#[rstest]
#[case(4)]
#[case(5)]
#[case(6)]
fn test_spawn(#[case] seed: u64) {
    let simulator = Simulator::new(EnvironmentConfig {
        object_min_num: 20,
        object_max_num: 40,
        ..config(seed)
    })
    .unwrap();
    let car = simulator.car();
    assert!((0.0..TAU).contains(&car.heading().radians()));
    assert_eq!(car.speed(), 0.0);
    assert_eq!(simulator.state(), EpisodeState::Active);
    assert_eq!(simulator.steps(), 0);
    assert!(!simulator.environment().has_collision(car));
    assert!(simulator.environment().obstacles().len() <= 40);
}

#[test]
fn test_episodic_interface() {
    let mut simulator = Simulator::new(config(9)).unwrap();
    assert_eq!(Episodic::observation_size(&simulator), 18);
    assert_eq!(Episodic::action_size(&simulator), 2);

    let observation = Episodic::reset(&mut simulator);
    assert_eq!(observation.to_vec().len(), 18);
    let step = Episodic::step(&mut simulator, &[0.0, 0.0]).unwrap();
    assert_eq!(step.observation.rays.len(), 12);
    assert_eq!(step.info.steps, 1);
}

#[test]
fn test_wrong_arity_is_rejected() {
    let mut simulator = Simulator::new(config(9)).unwrap();
    assert!(matches!(
        simulator.step(&[1.0]),
        Err(SimulatorError::InvalidAction {
            expected: 2,
            actual: 1
        })
    ));
}

#[test]
fn test_episode_ends_and_requires_reset() {
    let mut simulator = Simulator::new(EnvironmentConfig {
        object_min_num: 0,
        object_max_num: 0,
        ..config(10)
    })
    .unwrap();

    // Without obstacles the car eventually leaves the region or reaches the goal.
    let step = (0..1000)
        .map(|_| simulator.step(&[1.0, 0.0]).unwrap())
        .find(|step| step.done)
        .unwrap();
    assert!(step.info.termination.is_some());
    assert!(matches!(
        simulator.state(),
        EpisodeState::Terminated(reason) if Some(reason) == step.info.termination
    ));
    assert!(matches!(
        simulator.step(&[0.0, 0.0]),
        Err(SimulatorError::InvalidCallOrder(EpisodeState::Terminated(_)))
    ));

    simulator.reset();
    assert_eq!(simulator.state(), EpisodeState::Active);
}

#[test]
fn test_truncation_after_max_steps() {
    let mut simulator = Simulator::new(EnvironmentConfig {
        object_min_num: 0,
        object_max_num: 0,
        max_steps: 3,
        ..config(11)
    })
    .unwrap();

    let steps = (0..3)
        .map(|_| simulator.step(&[0.0, 0.0]).unwrap())
        .collect::<Vec<_>>();
    let truncated = steps.iter().map(|s| s.info.truncated).collect::<Vec<_>>();
    assert_eq!(truncated, vec![false, false, true]);
    assert!(steps.iter().all(|s| !s.done));
    assert_eq!(simulator.state(), EpisodeState::Truncated);
    assert!(simulator.step(&[0.0, 0.0]).is_err());
}

#[test]
fn test_invalid_configuration() {
    let result = Simulator::new(EnvironmentConfig {
        ray_length: 0.0,
        ..Default::default()
    });
    assert!(matches!(result, Err(SimulatorError::Config(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_same_seed_same_episode(
        seed in any::<u64>(),
        actions in prop::collection::vec(prop::array::uniform2(-1.0..1.0f32), 1..40),
    ) {
        let mut first = Simulator::new(config(seed)).unwrap();
        let mut second = Simulator::new(config(seed)).unwrap();

        prop_assert_eq!(first.observation(), second.observation());
        prop_assert_eq!(first.environment(), second.environment());
        prop_assert_eq!(drive(&mut first, &actions), drive(&mut second, &actions));
        prop_assert_eq!(first.reset(), second.reset());
    }

    #[test]
    fn prop_done_iff_terminated(
        seed in any::<u64>(),
        actions in prop::collection::vec((-1.0..1.0f32, -1.0..1.0f32), 1..40),
    ) {
        let mut simulator = Simulator::new(config(seed)).unwrap();
        let (low, high) = simulator.observation_bounds();
        for (forward, angle) in actions {
            let step = simulator.step(&[forward, angle]).unwrap();
            prop_assert_eq!(step.done, step.info.termination.is_some());
            prop_assert!(!(step.done && step.info.truncated));
            let flat = step.observation.to_vec();
            prop_assert_eq!(flat.len(), simulator.observation_size());
            if step.done {
                break;
            }
            for ((value, low), high) in flat.iter().zip(&low).zip(&high) {
                prop_assert!(low <= value && value <= high);
            }
        }
    }
}
