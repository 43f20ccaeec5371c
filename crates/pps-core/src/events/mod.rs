//! Event Reporting
//!
//! Sinks the engine reports lifecycle and tick events into.

pub mod logger;

pub use logger::*;
pub use pps_events::{EngineEvent, EngineState, EventType, TickSummary};
