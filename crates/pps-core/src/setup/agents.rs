//! Agent Spawning
//!
//! Creates agents at uniformly random positions and headings.

use rand::Rng;

use crate::components::agent::{Agent, AgentId};
use crate::components::world::Domain;

/// Hands out run-local agent ids in increasing order
#[derive(Debug, Clone, Default)]
pub struct AgentIdAllocator {
    next: u64,
}

impl AgentIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after the highest id in `agents`.
    pub fn after<'a>(agents: impl IntoIterator<Item = &'a Agent>) -> Self {
        let next = agents
            .into_iter()
            .map(|a| a.id().0 + 1)
            .max()
            .unwrap_or(0);
        Self { next }
    }

    pub fn next_id(&mut self) -> AgentId {
        let id = AgentId(self.next);
        self.next += 1;
        id
    }
}

/// Spawn `count` random agents into `agents`.
pub fn spawn_random_agents<R: Rng + ?Sized>(
    agents: &mut Vec<Agent>,
    count: usize,
    domain: &Domain,
    ids: &mut AgentIdAllocator,
    rng: &mut R,
) {
    agents.reserve(count);
    for _ in 0..count {
        agents.push(Agent::create_random(ids.next_id(), domain, rng));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_ids_are_sequential() {
        let mut ids = AgentIdAllocator::new();
        assert_eq!(ids.next_id(), AgentId(0));
        assert_eq!(ids.next_id(), AgentId(1));
        assert_eq!(ids.next_id(), AgentId(2));
    }

    #[test]
    fn test_allocator_after_existing() {
        let agents = vec![
            Agent::new(AgentId(4), Point::new(1.0, 1.0), 0.0),
            Agent::new(AgentId(9), Point::new(2.0, 2.0), 0.0),
        ];
        let mut ids = AgentIdAllocator::after(&agents);
        assert_eq!(ids.next_id(), AgentId(10));

        let mut empty = AgentIdAllocator::after(&Vec::<Agent>::new());
        assert_eq!(empty.next_id(), AgentId(0));
    }

    #[test]
    fn test_spawn_random_agents() {
        let domain = Domain::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut ids = AgentIdAllocator::new();
        let mut agents = Vec::new();

        spawn_random_agents(&mut agents, 50, &domain, &mut ids, &mut rng);
        spawn_random_agents(&mut agents, 25, &domain, &mut ids, &mut rng);

        assert_eq!(agents.len(), 75);
        assert!(agents.iter().all(|a| domain.contains(a.position())));
        assert_eq!(agents[74].id(), AgentId(74));
    }

    #[test]
    fn test_spawn_is_deterministic() {
        let domain = Domain::default();
        let spawn = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut agents = Vec::new();
            spawn_random_agents(&mut agents, 20, &domain, &mut AgentIdAllocator::new(), &mut rng);
            agents
        };

        assert_eq!(spawn(77), spawn(77));
        assert_ne!(spawn(77), spawn(78));
    }
}
