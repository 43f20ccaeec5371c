//! Statistics Output
//!
//! Accumulates per-tick summaries into run-level statistics.

use bevy_ecs::prelude::*;
use pps_events::TickSummary;
use serde::Serialize;

/// Overall simulation statistics
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimulationStats {
    pub total_ticks: u64,
    pub final_population: usize,
    pub peak_population: usize,
    pub min_population: usize,
    pub average_population: f64,
    pub average_neighbors: f64,
    pub peak_neighbors: u32,
}

/// Resource to accumulate statistics during a run
#[derive(Resource, Debug, Default)]
pub struct StatsCollector {
    ticks: u64,
    population_sum: u128,
    neighbor_sum: u128,
    last_population: usize,
    peak_population: usize,
    min_population: Option<usize>,
    peak_neighbors: u32,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the summary of one tick
    pub fn record_tick(&mut self, summary: &TickSummary) {
        self.ticks += 1;
        self.population_sum += summary.population as u128;
        self.neighbor_sum += summary.total_neighbors as u128;
        self.last_population = summary.population;
        self.peak_population = self.peak_population.max(summary.population);
        self.min_population = Some(
            self.min_population
                .map_or(summary.population, |m| m.min(summary.population)),
        );
        self.peak_neighbors = self.peak_neighbors.max(summary.max_neighbors);
    }

    pub fn ticks_recorded(&self) -> u64 {
        self.ticks
    }

    /// Generate the final statistics
    pub fn summary(&self) -> SimulationStats {
        let average_population = if self.ticks == 0 {
            0.0
        } else {
            self.population_sum as f64 / self.ticks as f64
        };
        let average_neighbors = if self.population_sum == 0 {
            0.0
        } else {
            self.neighbor_sum as f64 / self.population_sum as f64
        };

        SimulationStats {
            total_ticks: self.ticks,
            final_population: self.last_population,
            peak_population: self.peak_population,
            min_population: self.min_population.unwrap_or(0),
            average_population,
            average_neighbors,
            peak_neighbors: self.peak_neighbors,
        }
    }
}
