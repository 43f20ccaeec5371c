//! Snapshot Types
//!
//! Serialization structs for point-in-time views of the simulation.
//!
//! Snapshots are taken between ticks and handed to renderers and other
//! read-only collaborators. They are never fed back into the engine.

use serde::{Deserialize, Serialize};

use crate::EngineState;

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// Read-only view of a single agent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub x: f64,
    pub y: f64,
    /// Heading normalized to (-pi, pi]
    pub heading: f64,
    /// Neighbors sensed on the left during the last advance
    pub left: u32,
    /// Neighbors sensed on the right during the last advance
    pub right: u32,
}

impl AgentSnapshot {
    /// Total neighbors sensed during the last advance (L+R).
    ///
    /// Renderers key color intensity on this value.
    pub fn density(&self) -> u32 {
        self.left + self.right
    }
}

/// Complete population snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    pub snapshot_id: String,
    pub tick: u64,
    pub state: EngineState,
    pub domain_size: f64,
    pub population: usize,
    pub target_population: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<AgentSnapshot>,
}

impl PopulationSnapshot {
    /// Creates an empty snapshot header.
    pub fn new(
        snapshot_id: impl Into<String>,
        tick: u64,
        state: EngineState,
        domain_size: f64,
        target_population: usize,
    ) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            tick,
            state,
            domain_size,
            population: 0,
            target_population,
            agents: Vec::new(),
        }
    }

    /// Mean L+R over all agents in the snapshot.
    pub fn mean_density(&self) -> f64 {
        if self.agents.is_empty() {
            return 0.0;
        }
        let total: u64 = self.agents.iter().map(|a| a.density() as u64).sum();
        total as f64 / self.agents.len() as f64
    }

    /// Largest L+R of any agent in the snapshot.
    pub fn max_density(&self) -> u32 {
        self.agents.iter().map(AgentSnapshot::density).max().unwrap_or(0)
    }

    /// Serializes the snapshot to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the snapshot to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
