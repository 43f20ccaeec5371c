//! Simulation Components
//!
//! Agent state and the domain it lives in.

pub mod agent;
pub mod world;

pub use agent::*;
pub use world::*;
