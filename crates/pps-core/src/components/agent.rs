//! Agent Components
//!
//! Per-particle state and the turn-and-move rule applied once per tick.

use pps_events::AgentSnapshot;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use super::world::Domain;
use crate::geometry::{fix_angle, Point};

/// Default base turn per tick (alpha)
pub const DEFAULT_ALPHA: f64 = PI;

/// Default turn per sensed neighbor (beta), roughly 17 degrees
pub const DEFAULT_BETA: f64 = PI * 0.094444444444;

/// Default distance travelled per tick
pub const DEFAULT_SPEED: f64 = 0.67 * 3.0;

/// Default sensing radius
pub const DEFAULT_RADIUS: f64 = 15.0;

/// Run-local agent identifier, used to exclude an agent from its own neighbor set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

/// Motion constants shared by every agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleParams {
    /// Base turn applied every tick
    pub alpha: f64,
    /// Additional turn per sensed neighbor
    pub beta: f64,
    /// Distance moved per tick
    pub speed: f64,
    /// Sensing radius
    pub radius: f64,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            speed: DEFAULT_SPEED,
            radius: DEFAULT_RADIUS,
        }
    }
}

impl ParticleParams {
    /// Edge length of a spatial index cell (twice the sensing radius).
    pub fn cell_size(&self) -> f64 {
        self.radius * 2.0
    }

    pub fn radius_squared(&self) -> f64 {
        self.radius * self.radius
    }
}

/// Direction of the neighbor-dependent turn: right-biased on ties.
pub fn turn_sign(left: u32, right: u32) -> f64 {
    if right >= left {
        1.0
    } else {
        -1.0
    }
}

/// A single particle
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    id: AgentId,
    position: Point,
    /// Heading as left by the last advance; normalized lazily
    heading: f64,
    left: u32,
    right: u32,
}

impl Agent {
    pub fn new(id: AgentId, position: Point, heading: f64) -> Self {
        Self {
            id,
            position,
            heading,
            left: 0,
            right: 0,
        }
    }

    /// Create an agent at a uniform random position with a uniform heading in [0, 2pi).
    pub fn create_random<R: Rng + ?Sized>(id: AgentId, domain: &Domain, rng: &mut R) -> Self {
        let position = domain.random_point(rng);
        let heading = rng.gen_range(0.0..TAU);
        Self::new(id, position, heading)
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Heading normalized to (-pi, pi].
    pub fn heading(&self) -> f64 {
        fix_angle(self.heading)
    }

    /// Heading exactly as stored, before normalization.
    pub fn raw_heading(&self) -> f64 {
        self.heading
    }

    /// Left neighbor count from the last advance
    pub fn left(&self) -> u32 {
        self.left
    }

    /// Right neighbor count from the last advance
    pub fn right(&self) -> u32 {
        self.right
    }

    /// L+R from the last advance
    pub fn density(&self) -> u32 {
        self.left + self.right
    }

    /// Turn by the neighbor counts, then move one step along the new heading.
    pub fn advance(&mut self, left: u32, right: u32, params: &ParticleParams, domain: &Domain) {
        let neighbors = f64::from(left + right);
        self.heading = fix_angle(self.heading)
            + params.alpha
            + params.beta * neighbors * turn_sign(left, right);

        let moved = Point::new(
            self.position.x + self.heading.cos() * params.speed,
            self.position.y + self.heading.sin() * params.speed,
        );
        self.position = domain.confine(moved);
        self.left = left;
        self.right = right;
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            x: self.position.x,
            y: self.position.y,
            heading: self.heading(),
            left: self.left,
            right: self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::world::BoundaryMode;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn still_params() -> ParticleParams {
        ParticleParams {
            speed: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_params() {
        let params = ParticleParams::default();
        assert_eq!(params.alpha, PI);
        assert!((params.beta.to_degrees() - 17.0).abs() < 1e-6);
        assert!((params.speed - 2.01).abs() < 1e-12);
        assert_eq!(params.cell_size(), 30.0);
        assert_eq!(params.radius_squared(), 225.0);
    }

    #[test]
    fn test_turn_sign_tie_breaks_right() {
        assert_eq!(turn_sign(0, 0), 1.0);
        assert_eq!(turn_sign(3, 3), 1.0);
        assert_eq!(turn_sign(2, 5), 1.0);
        assert_eq!(turn_sign(5, 2), -1.0);
    }

    #[test]
    fn test_advance_without_neighbors_is_base_turn() {
        let domain = Domain::default();
        let mut agent = Agent::new(AgentId(1), Point::new(100.0, 100.0), 0.25);
        agent.advance(0, 0, &still_params(), &domain);

        assert_eq!(agent.raw_heading(), 0.25 + PI);
        assert_eq!(agent.heading(), fix_angle(0.25 + PI));
        assert_eq!(agent.density(), 0);
    }

    #[test]
    fn test_advance_with_tied_neighbors() {
        let domain = Domain::default();
        let params = still_params();
        let mut agent = Agent::new(AgentId(1), Point::new(100.0, 100.0), 0.0);
        agent.advance(2, 2, &params, &domain);

        assert_eq!(agent.raw_heading(), params.alpha + params.beta * 4.0);
        assert_eq!(agent.left(), 2);
        assert_eq!(agent.right(), 2);
    }

    #[test]
    fn test_advance_turns_left_when_left_dominates() {
        let domain = Domain::default();
        let params = still_params();
        let mut agent = Agent::new(AgentId(1), Point::new(100.0, 100.0), 0.0);
        agent.advance(3, 1, &params, &domain);

        assert_eq!(agent.raw_heading(), params.alpha - params.beta * 4.0);
    }

    #[test]
    fn test_advance_normalizes_before_turning() {
        let domain = Domain::default();
        let params = still_params();
        let mut agent = Agent::new(AgentId(1), Point::new(100.0, 100.0), 5.0);
        agent.advance(0, 0, &params, &domain);

        assert_eq!(agent.raw_heading(), fix_angle(5.0) + params.alpha);
    }

    #[test]
    fn test_advance_moves_along_new_heading() {
        let domain = Domain::default();
        let params = ParticleParams {
            alpha: PI / 2.0,
            beta: 0.0,
            speed: 2.0,
            radius: 15.0,
        };
        let mut agent = Agent::new(AgentId(1), Point::new(100.0, 100.0), 0.0);
        agent.advance(0, 0, &params, &domain);

        // Heading 0 turned by pi/2 moves along +y, not +x
        assert!((agent.position().x - 100.0).abs() < 1e-9);
        assert!((agent.position().y - 102.0).abs() < 1e-9);
    }

    #[test]
    fn test_advance_keeps_agent_in_domain() {
        let domain = Domain::default();
        let params = ParticleParams::default();
        let mut rng = SmallRng::seed_from_u64(11);

        for i in 0..200 {
            let mut agent = Agent::create_random(AgentId(i), &domain, &mut rng);
            for step in 0..500u32 {
                agent.advance(step % 3, step % 5, &params, &domain);
                assert!(domain.contains(agent.position()), "{:?}", agent.position());
            }
        }
    }

    #[test]
    fn test_wrap_handles_large_steps() {
        let domain = Domain::new(50.0).with_boundary(BoundaryMode::Wrap);
        let params = ParticleParams {
            speed: 40.0,
            ..Default::default()
        };
        let mut agent = Agent::new(AgentId(1), Point::new(1.0, 1.0), 0.3);
        for _ in 0..100 {
            agent.advance(1, 0, &params, &domain);
            assert!(domain.contains(agent.position()));
        }
    }

    #[test]
    fn test_create_random_in_range() {
        let domain = Domain::default();
        let mut rng = SmallRng::seed_from_u64(3);
        for i in 0..500 {
            let agent = Agent::create_random(AgentId(i), &domain, &mut rng);
            assert!(domain.contains(agent.position()));
            assert!((0.0..TAU).contains(&agent.raw_heading()));
            assert!(agent.heading() > -PI && agent.heading() <= PI);
        }
    }

    #[test]
    fn test_snapshot_reports_last_counts() {
        let domain = Domain::default();
        let mut agent = Agent::new(AgentId(9), Point::new(10.0, 20.0), 0.0);
        agent.advance(1, 4, &still_params(), &domain);

        let snapshot = agent.snapshot();
        assert_eq!(snapshot.left, 1);
        assert_eq!(snapshot.right, 4);
        assert_eq!(snapshot.density(), 5);
        assert_eq!(snapshot.x, 10.0);
        assert_eq!(snapshot.heading, agent.heading());
    }
}
