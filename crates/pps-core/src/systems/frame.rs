//! Frame Driver
//!
//! Hosts the engine inside a `bevy_ecs` world. Each run of the frame schedule
//! is one external frame: scheduled target changes are applied, the engine
//! runs its ticks, and read-only observers (stats, population poll, snapshot)
//! get their turn.

use bevy_ecs::prelude::*;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::engine::SimulationEngine;
use crate::output::{LatestSnapshot, SnapshotGenerator, StatsCollector};

/// Resource counting frames; the first frame is 1.
#[derive(Resource, Debug, Default)]
pub struct FrameClock {
    pub frame: u64,
}

/// A target population change due at the start of `frame`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetChange {
    pub frame: u64,
    pub target: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RetargetParseError {
    #[error("expected FRAME:TARGET, got {0:?}")]
    MissingSeparator(String),
    #[error("invalid frame number {0:?}")]
    InvalidFrame(String),
    #[error("invalid target population {0:?}")]
    InvalidTarget(String),
}

impl FromStr for TargetChange {
    type Err = RetargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (frame, target) = s
            .split_once(':')
            .ok_or_else(|| RetargetParseError::MissingSeparator(s.to_string()))?;
        let frame = frame
            .trim()
            .parse()
            .map_err(|_| RetargetParseError::InvalidFrame(frame.to_string()))?;
        let target = target
            .trim()
            .parse()
            .map_err(|_| RetargetParseError::InvalidTarget(target.to_string()))?;
        Ok(Self { frame, target })
    }
}

/// Pending target changes, ordered by frame
#[derive(Resource, Debug, Default)]
pub struct TargetSchedule {
    pending: Vec<TargetChange>,
}

impl TargetSchedule {
    pub fn new(mut changes: Vec<TargetChange>) -> Self {
        // Stable, so same-frame changes keep command-line order
        changes.sort_by_key(|change| change.frame);
        Self { pending: changes }
    }

    /// Remove and return every change due at or before `frame`.
    pub fn take_due(&mut self, frame: u64) -> Vec<TargetChange> {
        let due = self.pending.partition_point(|change| change.frame <= frame);
        self.pending.drain(..due).collect()
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

/// Samples the population count every `every` frames, independent of how
/// many ticks a frame runs.
#[derive(Resource, Debug)]
pub struct PopulationPoll {
    every: u64,
    last_count: Option<usize>,
    polls: u64,
}

impl PopulationPoll {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            last_count: None,
            polls: 0,
        }
    }

    pub fn is_due(&self, frame: u64) -> bool {
        frame % self.every == 0
    }

    pub fn record(&mut self, count: usize) {
        self.last_count = Some(count);
        self.polls += 1;
    }

    pub fn last_count(&self) -> Option<usize> {
        self.last_count
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }
}

pub fn advance_clock(mut clock: ResMut<FrameClock>) {
    clock.frame += 1;
}

pub fn apply_target_changes(
    clock: Res<FrameClock>,
    mut schedule: ResMut<TargetSchedule>,
    mut engine: ResMut<SimulationEngine>,
) {
    for change in schedule.take_due(clock.frame) {
        engine.set_target_population(change.target);
    }
}

pub fn drive_engine(mut engine: ResMut<SimulationEngine>, mut stats: ResMut<StatsCollector>) {
    for summary in engine.run_frame() {
        stats.record_tick(&summary);
    }
}

pub fn poll_population(
    clock: Res<FrameClock>,
    engine: Res<SimulationEngine>,
    mut poll: ResMut<PopulationPoll>,
) {
    if !poll.is_due(clock.frame) {
        return;
    }
    let population = engine.population_count();
    poll.record(population);
    info!(
        frame = clock.frame,
        tick = engine.tick_count(),
        population,
        target = engine.target_population(),
        "population"
    );
}

pub fn publish_snapshot(
    clock: Res<FrameClock>,
    engine: Res<SimulationEngine>,
    mut generator: ResMut<SnapshotGenerator>,
    mut latest: ResMut<LatestSnapshot>,
) {
    if generator.should_snapshot(clock.frame) {
        latest.0 = Some(generator.capture(clock.frame, &engine));
    }
}

/// Systems for one frame, in order.
pub fn build_frame_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            advance_clock,
            apply_target_changes,
            drive_engine,
            poll_population,
            publish_snapshot,
        )
            .chain(),
    );
    schedule
}

/// Create a world holding `engine` and every resource the frame schedule reads.
pub fn build_frame_world(
    engine: SimulationEngine,
    config: &Config,
    retargets: Vec<TargetChange>,
) -> World {
    let mut world = World::new();
    world.insert_resource(engine);
    world.insert_resource(FrameClock::default());
    world.insert_resource(TargetSchedule::new(retargets));
    world.insert_resource(PopulationPoll::new(config.simulation.report_every));
    world.insert_resource(StatsCollector::new());
    world.insert_resource(SnapshotGenerator::new(config.simulation.snapshot_every));
    world.insert_resource(LatestSnapshot::default());
    world
}
