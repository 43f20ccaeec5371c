//! Snapshot Publication
//!
//! Decides when to take population snapshots for renderers and numbers them.

use bevy_ecs::prelude::*;
use pps_events::{generate_snapshot_id, PopulationSnapshot};

use crate::engine::SimulationEngine;

/// Resource that numbers snapshots and spaces them by frame interval
#[derive(Resource, Debug)]
pub struct SnapshotGenerator {
    interval: u64,
    last_frame: Option<u64>,
    count: u64,
}

impl SnapshotGenerator {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            last_frame: None,
            count: 0,
        }
    }

    /// Whether a snapshot is due at `frame`.
    pub fn should_snapshot(&self, frame: u64) -> bool {
        match self.last_frame {
            None => true,
            Some(last) => frame.saturating_sub(last) >= self.interval,
        }
    }

    /// Take a snapshot of `engine` and record it as taken at `frame`.
    pub fn capture(&mut self, frame: u64, engine: &SimulationEngine) -> PopulationSnapshot {
        self.count += 1;
        self.last_frame = Some(frame);
        engine.snapshot(generate_snapshot_id(self.count))
    }

    pub fn snapshot_count(&self) -> u64 {
        self.count
    }
}

/// Most recent snapshot handed to renderers
#[derive(Resource, Debug, Default)]
pub struct LatestSnapshot(pub Option<PopulationSnapshot>);
