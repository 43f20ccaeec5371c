//! Configuration System
//!
//! Loads tuning parameters from `tuning.toml` for easy adjustment without
//! recompiling. Every section is optional and falls back to the classic
//! primordial particle constants.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::components::{BoundaryMode, Domain, ParticleParams};

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Upper bound on grid cells per side
pub const MAX_GRID_DIMENSION: usize = 4096;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub world: Domain,
    pub particle: ParticleParams,
    pub population: PopulationConfig,
}

/// Run parameters for the host loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the engine's generator; entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Frames to run before exiting
    pub frames: u64,
    /// Logical ticks per frame
    pub ticks_per_frame: u32,
    /// Frames between population polls
    pub report_every: u64,
    /// Frames between published snapshots
    pub snapshot_every: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            frames: 1000,
            ticks_per_frame: 1,
            report_every: 60,
            snapshot_every: 1,
        }
    }
}

/// Population size control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Agents created with the engine
    pub initial: usize,
    /// Starting population target
    pub target: usize,
    /// Most agents spawned in one tick
    pub spawn_batch: usize,
    /// Most agents culled in one tick
    pub cull_budget: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial: 5000,
            target: 6000,
            spawn_batch: 5,
            cull_budget: 10,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the default path, or use defaults if not found
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_TUNING_PATH).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", DEFAULT_TUNING_PATH, e);
            Self::default()
        })
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that the configuration describes a runnable simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.world.size;
        if !size.is_finite() || size <= 0.0 {
            return Err(ConfigError::invalid("world.size", "must be a positive finite number"));
        }

        let particle = &self.particle;
        if !particle.radius.is_finite() || particle.radius <= 0.0 {
            return Err(ConfigError::invalid("particle.radius", "must be a positive finite number"));
        }
        if !particle.speed.is_finite() || particle.speed < 0.0 {
            return Err(ConfigError::invalid("particle.speed", "must be a non-negative finite number"));
        }
        if !particle.alpha.is_finite() || !particle.beta.is_finite() {
            return Err(ConfigError::invalid("particle.alpha", "turn angles must be finite"));
        }
        let dimension = (size / particle.cell_size()).ceil();
        if dimension > MAX_GRID_DIMENSION as f64 {
            return Err(ConfigError::invalid(
                "particle.radius",
                format!("grid would need {} cells per side (max {})", dimension, MAX_GRID_DIMENSION),
            ));
        }

        if let BoundaryMode::Nudge { quantum } = self.world.boundary {
            if !quantum.is_finite() || quantum <= 0.0 || quantum >= size {
                return Err(ConfigError::invalid(
                    "world.boundary.quantum",
                    "must be positive and smaller than world.size",
                ));
            }
            if particle.speed > quantum {
                return Err(ConfigError::invalid(
                    "world.boundary.quantum",
                    format!(
                        "speed {} exceeds the nudge quantum {}; agents could leave the domain",
                        particle.speed, quantum
                    ),
                ));
            }
        }

        if self.population.spawn_batch == 0 {
            return Err(ConfigError::invalid("population.spawn_batch", "must be at least 1"));
        }
        if self.population.cull_budget == 0 {
            return Err(ConfigError::invalid("population.cull_budget", "must be at least 1"));
        }
        if self.simulation.ticks_per_frame == 0 {
            return Err(ConfigError::invalid("simulation.ticks_per_frame", "must be at least 1"));
        }
        Ok(())
    }
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Primordial particle simulation tuning

[simulation]
frames = 1000
ticks_per_frame = 1
report_every = 60
snapshot_every = 1

[world]
size = 750.0

[world.boundary]
mode = "nudge"
quantum = 5.0

[particle]
alpha = 3.141592653589793
beta = 0.2967059728376398
speed = 2.01
radius = 15.0

[population]
initial = 5000
target = 6000
spawn_batch = 5
cull_budget = 10
"#
    .to_string()
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
