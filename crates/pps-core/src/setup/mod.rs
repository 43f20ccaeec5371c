//! Population Setup
//!
//! Agent id allocation and random spawning.

pub mod agents;

pub use agents::*;
