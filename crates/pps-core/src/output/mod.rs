//! Output
//!
//! Run statistics and snapshot publication for read-only collaborators.

pub mod snapshot;
pub mod stats;

pub use snapshot::*;
pub use stats::*;
