//! Primordial Particle Simulation Engine
//!
//! A population of self-propelled particles on a square domain, each turning
//! by a fixed angle plus an amount proportional to how many neighbors it
//! sees. Cells, spores and colonies emerge from that one rule.

pub mod components;
pub mod config;
pub mod engine;
pub mod events;
pub mod geometry;
pub mod output;
pub mod setup;
pub mod systems;

pub use components::*;
pub use config::{Config, ConfigError};
pub use engine::SimulationEngine;
pub use events::{EngineEvent, EngineState, EventSink, TickSummary};
pub use geometry::{fix_angle, Point};
pub use pps_events::{AgentSnapshot, PopulationSnapshot};
