//! Perception System
//!
//! Counts the neighbors each agent senses on its left and right, reading
//! only the frozen spatial index of the previous tick.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::components::agent::{Agent, ParticleParams};
use crate::geometry::Side;
use crate::systems::spatial::SpatialIndex;

/// Left/right neighbor tally for one agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeighborCounts {
    pub left: u32,
    pub right: u32,
}

impl NeighborCounts {
    pub fn total(&self) -> u32 {
        self.left + self.right
    }

    fn add(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }
}

/// Sense the neighbors of a single agent.
///
/// Neighbors come from `index` as it was recorded, never from live agent
/// state, so the result does not depend on which agents already moved.
pub fn sense(index: &SpatialIndex, agent: &Agent, params: &ParticleParams) -> NeighborCounts {
    let position = agent.position();
    let heading = agent.raw_heading();
    let mut counts = NeighborCounts::default();

    for neighbor in index.neighbors_of(agent.id(), position, index.cell_of(position), params.radius) {
        counts.add(Side::classify(position, heading, neighbor.position));
    }
    counts
}

/// Sense every agent, in agent order.
#[cfg(not(feature = "parallel"))]
pub fn sense_all(index: &SpatialIndex, agents: &[Agent], params: &ParticleParams) -> Vec<NeighborCounts> {
    agents.iter().map(|agent| sense(index, agent, params)).collect()
}

/// Sense every agent, in agent order, on the rayon pool.
#[cfg(feature = "parallel")]
pub fn sense_all(index: &SpatialIndex, agents: &[Agent], params: &ParticleParams) -> Vec<NeighborCounts> {
    agents.par_iter().map(|agent| sense(index, agent, params)).collect()
}
