//! Simulation Engine
//!
//! Owns the population, both spatial index buffers and the random source,
//! and advances them one tick at a time. Scheduling is left to the caller.

use bevy_ecs::prelude::*;
use pps_events::{AgentSnapshot, EngineEvent, EngineState, PopulationSnapshot, TickSummary};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::components::agent::{Agent, ParticleParams};
use crate::components::world::Domain;
use crate::config::{Config, ConfigError, PopulationConfig};
use crate::events::logger::{EventSink, NullSink};
use crate::setup::agents::{spawn_random_agents, AgentIdAllocator};
use crate::systems::perception::sense_all;
use crate::systems::population::adjust_population;
use crate::systems::spatial::SpatialIndex;

/// The primordial particle simulation.
///
/// Lifecycle is `Created -> Running -> Stopped`; a stopped engine never runs
/// again and a fresh one must be constructed instead.
#[derive(Resource)]
pub struct SimulationEngine {
    domain: Domain,
    params: ParticleParams,
    limits: PopulationConfig,
    agents: Vec<Agent>,
    /// Index built during the previous tick; read-only while ticking
    index: SpatialIndex,
    ids: AgentIdAllocator,
    rng: SmallRng,
    state: EngineState,
    tick: u64,
    target: usize,
    ticks_per_frame: u32,
    sink: Box<dyn EventSink>,
}

impl SimulationEngine {
    /// Engine with default particle constants, seeded from entropy.
    pub fn new(
        domain_size: f64,
        initial_population: usize,
        target_population: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self::sized_config(domain_size, initial_population, target_population);
        Self::from_config(&config, SmallRng::from_entropy())
    }

    /// Like [`SimulationEngine::new`] with a fixed seed.
    pub fn seeded(
        domain_size: f64,
        initial_population: usize,
        target_population: usize,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let config = Self::sized_config(domain_size, initial_population, target_population);
        Self::from_config(&config, SmallRng::seed_from_u64(seed))
    }

    fn sized_config(domain_size: f64, initial: usize, target: usize) -> Config {
        let mut config = Config::default();
        config.world.size = domain_size;
        config.population.initial = initial;
        config.population.target = target;
        config
    }

    /// Build an engine with `config.population.initial` random agents.
    pub fn from_config(config: &Config, mut rng: SmallRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut ids = AgentIdAllocator::new();
        let mut agents = Vec::with_capacity(config.population.initial);
        spawn_random_agents(
            &mut agents,
            config.population.initial,
            &config.world,
            &mut ids,
            &mut rng,
        );
        Ok(Self::assemble(config, agents, ids, rng))
    }

    /// Build an engine around a caller-supplied population.
    ///
    /// `config.population.initial` is ignored. Every agent must lie inside
    /// the domain.
    pub fn with_agents(config: &Config, agents: Vec<Agent>, rng: SmallRng) -> Result<Self, ConfigError> {
        config.validate()?;
        if let Some(outside) = agents.iter().find(|a| !config.world.contains(a.position())) {
            return Err(ConfigError::Invalid {
                field: "agents",
                reason: format!("agent {:?} at {:?} is outside the domain", outside.id(), outside.position()),
            });
        }
        let ids = AgentIdAllocator::after(&agents);
        Ok(Self::assemble(config, agents, ids, rng))
    }

    fn assemble(config: &Config, agents: Vec<Agent>, ids: AgentIdAllocator, rng: SmallRng) -> Self {
        let index = SpatialIndex::build(&agents, config.world.size, config.particle.cell_size());
        Self {
            domain: config.world,
            params: config.particle,
            limits: config.population.clone(),
            agents,
            index,
            ids,
            rng,
            state: EngineState::Created,
            tick: 0,
            target: config.population.target,
            ticks_per_frame: config.simulation.ticks_per_frame.max(1),
            sink: Box::new(NullSink),
        }
    }

    /// Replace the event sink.
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.set_sink(sink);
        self
    }

    pub fn set_sink(&mut self, sink: impl EventSink + 'static) {
        self.sink.flush();
        self.sink = Box::new(sink);
    }

    /// Begin running. Returns whether the state changed; a stopped engine
    /// stays stopped.
    pub fn start(&mut self) -> bool {
        match self.state {
            EngineState::Created => {
                self.transition(EngineState::Running);
                true
            }
            EngineState::Running | EngineState::Stopped => false,
        }
    }

    /// Stop for good. Returns whether the state changed.
    pub fn stop(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.transition(EngineState::Stopped);
        self.sink.flush();
        true
    }

    fn transition(&mut self, to: EngineState) {
        let from = std::mem::replace(&mut self.state, to);
        self.sink.record(&EngineEvent::StateChanged {
            tick: self.tick,
            from,
            to,
        });
    }

    /// Run one simulation step. Does nothing unless the engine is running.
    pub fn tick(&mut self) -> Option<TickSummary> {
        if !self.state.is_running() {
            return None;
        }
        self.tick += 1;

        let adjustment = adjust_population(
            &mut self.agents,
            self.target,
            &self.limits,
            &self.domain,
            &mut self.ids,
            &mut self.rng,
        );
        if !adjustment.is_empty() {
            self.sink.record(&EngineEvent::PopulationAdjusted {
                tick: self.tick,
                spawned: adjustment.spawned,
                culled: adjustment.culled,
                population: self.agents.len(),
                target: self.target,
            });
        }

        // Sensing reads only the previous index, so it sees one frozen
        // snapshot no matter how many agents already moved.
        let sensed = sense_all(&self.index, &self.agents, &self.params);
        let mut next = self.index.builder_like();
        let mut summary = TickSummary {
            tick: self.tick,
            population: self.agents.len(),
            ..Default::default()
        };

        for (agent, counts) in self.agents.iter_mut().zip(sensed) {
            next.insert(agent.id(), agent.position());
            agent.advance(counts.left, counts.right, &self.params, &self.domain);
            summary.total_neighbors += u64::from(counts.total());
            summary.max_neighbors = summary.max_neighbors.max(counts.total());
        }

        self.index = next.finish();
        self.sink.record(&EngineEvent::TickCompleted(summary));
        Some(summary)
    }

    /// Run up to `ticks_per_frame` ticks, stopping early if the engine is
    /// not running. Returns the summaries of the ticks that ran.
    pub fn run_frame(&mut self) -> Vec<TickSummary> {
        let mut summaries = Vec::new();
        for _ in 0..self.ticks_per_frame {
            match self.tick() {
                Some(summary) => summaries.push(summary),
                None => break,
            }
        }
        summaries
    }

    /// Change the population target, effective from the next tick.
    pub fn set_target_population(&mut self, target: usize) {
        let previous = std::mem::replace(&mut self.target, target);
        if previous != target {
            self.sink.record(&EngineEvent::TargetChanged {
                tick: self.tick,
                previous,
                target,
            });
        }
    }

    /// Set how many ticks one frame runs; values below 1 are raised to 1.
    pub fn set_ticks_per_frame(&mut self, ticks: u32) {
        self.ticks_per_frame = ticks.max(1);
    }

    pub fn population_count(&self) -> usize {
        self.agents.len()
    }

    pub fn target_population(&self) -> usize {
        self.target
    }

    pub fn ticks_per_frame(&self) -> u32 {
        self.ticks_per_frame
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Ticks executed so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn params(&self) -> &ParticleParams {
        &self.params
    }

    /// Read-only view of the population
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// The index the next tick will sense against
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Per-agent snapshots in population order
    pub fn agent_snapshots(&self) -> impl Iterator<Item = AgentSnapshot> + '_ {
        self.agents.iter().map(Agent::snapshot)
    }

    /// Full point-in-time snapshot for renderers
    pub fn snapshot(&self, snapshot_id: impl Into<String>) -> PopulationSnapshot {
        let mut snapshot = PopulationSnapshot::new(
            snapshot_id,
            self.tick,
            self.state,
            self.domain.size,
            self.target,
        );
        snapshot.agents = self.agent_snapshots().collect();
        snapshot.population = snapshot.agents.len();
        snapshot
    }
}
