//! Shared event and snapshot types for the primordial particle simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Renderers, UIs and the core engine all depend on it.

pub mod event;
pub mod snapshot;

// Re-export event types
pub use event::{EngineEvent, EngineState, EventType, TickSummary};

// Re-export snapshot types
pub use snapshot::{generate_snapshot_id, AgentSnapshot, PopulationSnapshot};
