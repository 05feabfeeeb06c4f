//! Rectangular world with obstacles, a boundary wall and a goal.

use std::f64::consts::TAU;

use rand::Rng;
use tracing::debug;

use super::{
    make_circle, make_offset_ring, make_rectangle, Angle, HasCollision, Polygon, Position,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    width: f64,
    height: f64,
    boundary_width: f64,
    obstacles: Vec<Obstacle>,
    goal: Goal,
}

impl Environment {
    /// Creates an environment from the given obstacles. The boundary wall is appended as the
    /// last obstacle.
    pub fn new(
        width: f64,
        height: f64,
        boundary_width: f64,
        mut obstacles: Vec<Obstacle>,
        goal: Goal,
    ) -> Self {
        obstacles.push(Obstacle::boundary((width, height), boundary_width));
        Self {
            width,
            height,
            boundary_width,
            obstacles,
            goal,
        }
    }

    /// Samples obstacles and a goal. Obstacles overlapping `protection` are dropped, so fewer
    /// than `config.min_num` may remain.
    pub fn generate<R: Rng>(
        width: f64,
        height: f64,
        boundary_width: f64,
        config: &ObstacleConfig,
        protection: &dyn HasCollision,
        rng: &mut R,
    ) -> Self {
        let attempts = config.sample_count(rng);
        let obstacles = (0..attempts)
            .map(|_| Obstacle::random(width, height, config, rng))
            .filter(|o| !o.has_collision(protection))
            .collect::<Vec<_>>();
        debug!(
            attempts,
            rejected = attempts - obstacles.len(),
            "generated obstacles"
        );
        let goal = Goal::new(random_position(width, height, rng), config.goal_radius);
        Self::new(width, height, boundary_width, obstacles, goal)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn boundary_width(&self) -> f64 {
        self.boundary_width
    }

    /// All obstacles; the boundary wall is always last.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacle_polygons(&self) -> Vec<&Polygon> {
        self.obstacles.iter().map(Obstacle::polygon).collect()
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Whether `position` lies within `[0, width] x [0, height]`.
    pub fn contains(&self, position: Position) -> bool {
        (0.0..=self.width).contains(&position.x()) && (0.0..=self.height).contains(&position.y())
    }

    pub fn has_collision(&self, object: &dyn HasCollision) -> bool {
        self.obstacles.iter().any(|o| o.has_collision(object))
    }

    pub fn reached_goal(&self, object: &dyn HasCollision) -> bool {
        self.goal.has_collision(object)
    }
}

/// Bounds for procedurally generated obstacles and the goal.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub struct ObstacleConfig {
    pub min_num: usize,
    pub max_num: usize,
    pub min_size: f64,
    pub max_size: f64,
    pub goal_radius: f64,
}

impl ObstacleConfig {
    /// Number of obstacles to attempt, drawn from `[min_num, max_num)`.
    fn sample_count<R: Rng>(&self, rng: &mut R) -> usize {
        if self.max_num == 0 {
            0
        } else if self.min_num >= self.max_num {
            self.min_num
        } else {
            rng.random_range(self.min_num..self.max_num)
        }
    }

    fn sample_size<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.min_size..=self.max_size)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum ObstacleKind {
    Rectangle,
    Circle,
    Boundary,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Obstacle {
    Rectangle {
        center: Position,
        width: f64,
        height: f64,
        heading: Angle,
        polygon: Polygon,
    },
    Circle {
        center: Position,
        radius: f64,
        polygon: Polygon,
    },
    Boundary {
        width: f64,
        polygon: Polygon,
    },
}

impl Obstacle {
    pub fn rectangle(center: Position, width: f64, height: f64, heading: Angle) -> Self {
        Obstacle::Rectangle {
            center,
            width,
            height,
            heading,
            polygon: make_rectangle(center, width, height, heading),
        }
    }

    pub fn circle(center: Position, radius: f64) -> Self {
        Obstacle::Circle {
            center,
            radius,
            polygon: make_circle(center, radius),
        }
    }

    pub fn boundary(size: (f64, f64), width: f64) -> Self {
        Obstacle::Boundary {
            width,
            polygon: make_offset_ring(size, width),
        }
    }

    fn random<R: Rng>(width: f64, height: f64, config: &ObstacleConfig, rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            let center = random_position(width, height, rng);
            let (x_length, y_length) = (config.sample_size(rng), config.sample_size(rng));
            Obstacle::rectangle(
                center,
                x_length,
                y_length,
                Angle::new(rng.random_range(0.0..TAU)),
            )
        } else {
            let center = random_position(width, height, rng);
            Obstacle::circle(center, config.sample_size(rng))
        }
    }

    pub fn kind(&self) -> ObstacleKind {
        match self {
            Obstacle::Rectangle { .. } => ObstacleKind::Rectangle,
            Obstacle::Circle { .. } => ObstacleKind::Circle,
            Obstacle::Boundary { .. } => ObstacleKind::Boundary,
        }
    }

    pub fn polygon(&self) -> &Polygon {
        match self {
            Obstacle::Rectangle { polygon, .. }
            | Obstacle::Circle { polygon, .. }
            | Obstacle::Boundary { polygon, .. } => polygon,
        }
    }
}

impl HasCollision for Obstacle {
    fn polygon(&self) -> &Polygon {
        Obstacle::polygon(self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Goal {
    center: Position,
    radius: f64,
    polygon: Polygon,
}

impl Goal {
    pub fn new(center: Position, radius: f64) -> Self {
        Self {
            center,
            radius,
            polygon: make_circle(center, radius),
        }
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl HasCollision for Goal {
    fn polygon(&self) -> &Polygon {
        &self.polygon
    }
}

fn random_position<R: Rng>(width: f64, height: f64, rng: &mut R) -> Position {
    Position::new(rng.random_range(0.0..width), rng.random_range(0.0..height))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_environment_boundary_is_last() {
        let environment = Environment::new(
            20.0,
            10.0,
            1.0,
            vec![
                Obstacle::circle(Position::new(3.0, 3.0), 1.0),
                Obstacle::rectangle(Position::new(7.0, 3.0), 1.0, 2.0, Angle::new(0.0)),
            ],
            Goal::new(Position::new(15.0, 5.0), 1.0),
        );
        let kinds = environment
            .obstacles()
            .iter()
            .map(Obstacle::kind)
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                ObstacleKind::Circle,
                ObstacleKind::Rectangle,
                ObstacleKind::Boundary
            ]
        );
        assert_eq!(environment.obstacle_polygons().len(), 3);
    }

    #[rstest]
    #[case::center(Position::new(10.0, 5.0), true)]
    #[case::corner(Position::new(0.0, 10.0), true)]
    #[case::left(Position::new(-0.1, 5.0), false)]
    #[case::above(Position::new(10.0, 10.1), false)]
    fn test_environment_contains(#[case] position: Position, #[case] expected: bool) {
        let environment = empty_environment();
        assert_eq!(environment.contains(position), expected);
    }

    #[rstest]
    #[case::free(Position::new(10.0, 5.0), false)]
    #[case::on_obstacle(Position::new(3.5, 3.0), true)]
    #[case::against_wall(Position::new(19.5, 5.0), true)]
    fn test_environment_has_collision(#[case] position: Position, #[case] expected: bool) {
        let environment = Environment::new(
            20.0,
            10.0,
            1.0,
            vec![Obstacle::circle(Position::new(3.0, 3.0), 1.0)],
            Goal::new(Position::new(15.0, 8.0), 0.5),
        );
        let car = make_rectangle(position, 1.0, 3.0, Angle::new(0.0));
        assert_eq!(environment.has_collision(&car), expected);
    }

    #[test]
    fn test_environment_reached_goal() {
        let environment = empty_environment();
        let near = make_rectangle(Position::new(15.0, 5.0), 1.0, 3.0, Angle::new(0.5 * PI));
        let far = make_rectangle(Position::new(5.0, 5.0), 1.0, 3.0, Angle::new(0.0));
        assert!(environment.reached_goal(&near));
        assert!(!environment.reached_goal(&far));
    }

    #[test]
    fn test_generate_without_obstacles() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let config = ObstacleConfig {
            min_num: 0,
            max_num: 0,
            ..obstacle_config()
        };
        let protection = make_circle(Position::new(25.0, 25.0), 3.0);
        let environment = Environment::generate(50.0, 50.0, 1.0, &config, &protection, &mut rng);
        assert_eq!(environment.obstacles().len(), 1);
        assert_eq!(environment.obstacles()[0].kind(), ObstacleKind::Boundary);
        assert!(environment.contains(environment.goal().center()));
        assert_abs_diff_eq!(environment.goal().radius(), 1.0);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    fn test_generate_keeps_protection_clear(#[case] seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let config = ObstacleConfig {
            min_num: 30,
            max_num: 40,
            ..obstacle_config()
        };
        let protection = make_circle(Position::new(10.0, 10.0), 4.0);
        let environment = Environment::generate(20.0, 20.0, 1.0, &config, &protection, &mut rng);

        let obstacles = environment.obstacles();
        assert!(obstacles.len() <= 40);
        assert_eq!(obstacles.last().map(Obstacle::kind), Some(ObstacleKind::Boundary));
        for obstacle in &obstacles[..obstacles.len() - 1] {
            assert!(!obstacle.has_collision(&protection));
            assert!(environment.contains(match obstacle {
                Obstacle::Rectangle { center, .. } | Obstacle::Circle { center, .. } => *center,
                Obstacle::Boundary { .. } => unreachable!(),
            }));
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let protection = make_circle(Position::new(10.0, 10.0), 2.0);
        let generate = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            Environment::generate(20.0, 20.0, 1.0, &obstacle_config(), &protection, &mut rng)
        };
        assert_eq!(generate(11), generate(11));
        assert_ne!(generate(11), generate(12));
    }

    #[test]
    fn test_sample_count_degenerate_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = ObstacleConfig {
            min_num: 3,
            max_num: 3,
            ..obstacle_config()
        };
        assert_eq!(config.sample_count(&mut rng), 3);
    }

    fn empty_environment() -> Environment {
        Environment::new(
            20.0,
            10.0,
            1.0,
            vec![],
            Goal::new(Position::new(15.0, 5.0), 1.0),
        )
    }

    fn obstacle_config() -> ObstacleConfig {
        ObstacleConfig {
            min_num: 1,
            max_num: 8,
            min_size: 0.5,
            max_size: 3.0,
            goal_radius: 1.0,
        }
    }
}
