//! Population Control
//!
//! Moves the agent count toward a target by a bounded amount each tick:
//! small spawn batches when below, a capped number of random culls when above.

use rand::Rng;

use crate::components::agent::Agent;
use crate::components::world::Domain;
use crate::config::PopulationConfig;
use crate::setup::agents::{spawn_random_agents, AgentIdAllocator};

/// What population control did during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopulationAdjustment {
    pub spawned: usize,
    pub culled: usize,
}

impl PopulationAdjustment {
    pub fn is_empty(&self) -> bool {
        self.spawned == 0 && self.culled == 0
    }
}

/// Apply one tick of population control.
///
/// Below target, up to `spawn_batch` agents are added, never more than the
/// deficit. This departs from the legacy fixed batch of 5, which could
/// overshoot the target; convergence takes exactly `ticks_to_converge` ticks.
/// Above target, agents are removed one at a time at a uniformly random
/// index until the target is reached or `cull_budget` runs out.
pub fn adjust_population<R: Rng + ?Sized>(
    agents: &mut Vec<Agent>,
    target: usize,
    limits: &PopulationConfig,
    domain: &Domain,
    ids: &mut AgentIdAllocator,
    rng: &mut R,
) -> PopulationAdjustment {
    let mut adjustment = PopulationAdjustment::default();
    let count = agents.len();

    if count < target {
        let spawn = limits.spawn_batch.min(target - count);
        spawn_random_agents(agents, spawn, domain, ids, rng);
        adjustment.spawned = spawn;
    } else if count > target {
        let mut budget = limits.cull_budget;
        while agents.len() > target && budget > 0 {
            let victim = rng.gen_range(0..agents.len());
            agents.swap_remove(victim);
            budget -= 1;
            adjustment.culled += 1;
        }
    }
    adjustment
}

/// Ticks needed to reach `target` from `count` with no target changes.
pub fn ticks_to_converge(count: usize, target: usize, limits: &PopulationConfig) -> usize {
    if count < target {
        (target - count).div_ceil(limits.spawn_batch.max(1))
    } else {
        (count - target).div_ceil(limits.cull_budget.max(1))
    }
}
