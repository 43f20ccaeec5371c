//! Event Types
//!
//! Lifecycle and per-tick events emitted by the simulation engine.

use serde::{Deserialize, Serialize};

/// Engine lifecycle state.
///
/// `Stopped` is terminal: a stopped engine never runs again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    #[default]
    Created,
    Running,
    Stopped,
}

impl EngineState {
    /// Whether ticks are executed in this state.
    pub fn is_running(&self) -> bool {
        matches!(self, EngineState::Running)
    }

    /// Whether this state can never be left.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EngineState::Stopped)
    }
}

/// Primary event categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Lifecycle,
    Population,
    Tick,
}

/// Aggregate figures for one completed tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickSummary {
    /// Tick number, starting at 1 for the first executed tick
    pub tick: u64,
    /// Agent count after the tick
    pub population: usize,
    /// Sum of L+R over all agents
    pub total_neighbors: u64,
    /// Largest L+R seen by a single agent
    pub max_neighbors: u32,
}

impl TickSummary {
    /// Mean number of sensed neighbors per agent.
    pub fn mean_neighbors(&self) -> f64 {
        if self.population == 0 {
            0.0
        } else {
            self.total_neighbors as f64 / self.population as f64
        }
    }
}

/// An event reported by the engine to its sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    /// The engine moved between lifecycle states
    StateChanged {
        tick: u64,
        from: EngineState,
        to: EngineState,
    },
    /// The population target was changed by a caller
    TargetChanged {
        tick: u64,
        previous: usize,
        target: usize,
    },
    /// Population control spawned or culled agents this tick
    PopulationAdjusted {
        tick: u64,
        spawned: usize,
        culled: usize,
        population: usize,
        target: usize,
    },
    /// A tick ran to completion
    TickCompleted(TickSummary),
}

impl EngineEvent {
    /// Returns the category of this event.
    pub fn event_type(&self) -> EventType {
        match self {
            EngineEvent::StateChanged { .. } => EventType::Lifecycle,
            EngineEvent::TargetChanged { .. } | EngineEvent::PopulationAdjusted { .. } => {
                EventType::Population
            }
            EngineEvent::TickCompleted(_) => EventType::Tick,
        }
    }

    /// Returns the tick the event belongs to.
    pub fn tick(&self) -> u64 {
        match self {
            EngineEvent::StateChanged { tick, .. }
            | EngineEvent::TargetChanged { tick, .. }
            | EngineEvent::PopulationAdjusted { tick, .. } => *tick,
            EngineEvent::TickCompleted(summary) => summary.tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_state_flags() {
        assert!(!EngineState::Created.is_running());
        assert!(EngineState::Running.is_running());
        assert!(EngineState::Stopped.is_terminal());
        assert!(!EngineState::Running.is_terminal());
        assert_eq!(EngineState::default(), EngineState::Created);
    }

    #[test]
    fn test_event_type_mapping() {
        let started = EngineEvent::StateChanged {
            tick: 0,
            from: EngineState::Created,
            to: EngineState::Running,
        };
        assert_eq!(started.event_type(), EventType::Lifecycle);

        let adjusted = EngineEvent::PopulationAdjusted {
            tick: 3,
            spawned: 5,
            culled: 0,
            population: 15,
            target: 20,
        };
        assert_eq!(adjusted.event_type(), EventType::Population);
        assert_eq!(adjusted.tick(), 3);

        let completed = EngineEvent::TickCompleted(TickSummary {
            tick: 7,
            ..Default::default()
        });
        assert_eq!(completed.event_type(), EventType::Tick);
        assert_eq!(completed.tick(), 7);
    }

    #[test]
    fn test_mean_neighbors() {
        let empty = TickSummary::default();
        assert_eq!(empty.mean_neighbors(), 0.0);

        let summary = TickSummary {
            tick: 1,
            population: 4,
            total_neighbors: 10,
            max_neighbors: 4,
        };
        assert_eq!(summary.mean_neighbors(), 2.5);
    }

    #[test]
    fn test_event_serialization() {
        let event = EngineEvent::StateChanged {
            tick: 12,
            from: EngineState::Running,
            to: EngineState::Stopped,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""kind":"state_changed""#));
        assert!(json.contains(r#""to":"stopped""#));

        let parsed: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
