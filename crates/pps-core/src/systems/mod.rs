//! Simulation Systems
//!
//! Spatial indexing, sensing, population control and the per-frame ECS driver.

pub mod frame;
pub mod perception;
pub mod population;
pub mod spatial;

pub use frame::{
    advance_clock, apply_target_changes, build_frame_schedule, build_frame_world, drive_engine,
    poll_population, publish_snapshot, FrameClock, PopulationPoll, RetargetParseError,
    TargetChange, TargetSchedule,
};
pub use perception::{sense, sense_all, NeighborCounts};
pub use population::{adjust_population, ticks_to_converge, PopulationAdjustment};
pub use spatial::{CellCoord, IndexEntry, SpatialIndex, SpatialIndexBuilder};
