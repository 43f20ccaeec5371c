//! Engine integration tests
//!
//! Whole-engine behavior over many ticks: population convergence, boundary
//! handling and snapshot output.

use pps_core::components::BoundaryMode;
use pps_core::config::{Config, ConfigError};
use pps_core::systems::ticks_to_converge;
use pps_core::{EngineState, SimulationEngine};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn test_shrink_from_6000_to_100() {
    let mut engine = SimulationEngine::seeded(750.0, 6000, 100, 11).unwrap();
    engine.start();

    for tick in 1..=589u64 {
        engine.tick();
        assert_eq!(engine.population_count(), 6000 - 10 * tick as usize);
    }
    engine.tick();
    assert_eq!(engine.population_count(), 100);
    assert_eq!(engine.tick_count(), 590);

    for _ in 0..5 {
        engine.tick();
        assert_eq!(engine.population_count(), 100);
    }
}

#[test]
fn test_growth_never_overshoots() {
    let mut engine = SimulationEngine::seeded(750.0, 0, 23, 3).unwrap();
    let config = Config::default();
    let expected = ticks_to_converge(0, 23, &config.population);
    assert_eq!(expected, 5);

    engine.start();
    let mut counts = Vec::new();
    for _ in 0..8 {
        engine.tick();
        counts.push(engine.population_count());
    }
    assert_eq!(counts, vec![5, 10, 15, 20, 23, 23, 23, 23]);
}

#[test]
fn test_default_engine_stays_in_domain() {
    let mut engine = SimulationEngine::seeded(750.0, 2000, 2000, 5).unwrap();
    engine.start();
    for _ in 0..100 {
        engine.tick();
    }
    let domain = *engine.domain();
    for agent in engine.agents() {
        let p = agent.position();
        assert!((0.0..domain.size).contains(&p.x), "x out of range: {}", p.x);
        assert!((0.0..domain.size).contains(&p.y), "y out of range: {}", p.y);
        assert!(agent.heading() > -std::f64::consts::PI);
        assert!(agent.heading() <= std::f64::consts::PI);
    }
}

#[test]
fn test_wrap_mode_with_fast_agents() {
    let mut config = Config::default();
    config.world.size = 200.0;
    config.world.boundary = BoundaryMode::Wrap;
    config.particle.speed = 37.5;
    config.population.initial = 300;
    config.population.target = 300;

    let mut engine = SimulationEngine::from_config(&config, SmallRng::seed_from_u64(9)).unwrap();
    engine.start();
    for _ in 0..150 {
        engine.tick();
        assert!(engine
            .agents()
            .iter()
            .all(|a| engine.domain().contains(a.position())));
    }
}

#[test]
fn test_nudge_rejects_speed_above_quantum() {
    let mut config = Config::default();
    config.particle.speed = 6.0;
    let result = SimulationEngine::from_config(&config, SmallRng::seed_from_u64(1));
    assert!(matches!(
        result,
        Err(ConfigError::Invalid { field: "world.boundary.quantum", .. })
    ));

    config.world.boundary = BoundaryMode::Wrap;
    assert!(SimulationEngine::from_config(&config, SmallRng::seed_from_u64(1)).is_ok());
}

#[test]
fn test_snapshot_json_shape() {
    let mut engine = SimulationEngine::seeded(750.0, 25, 25, 17).unwrap();
    engine.start();
    engine.tick();

    let json = engine.snapshot("snap_000042").to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["snapshot_id"], "snap_000042");
    assert_eq!(value["tick"], 1);
    assert_eq!(value["domain_size"], 750.0);
    assert_eq!(value["population"], 25);
    assert_eq!(value["target_population"], 25);
    let agents = value["agents"].as_array().unwrap();
    assert_eq!(agents.len(), 25);
    for key in ["x", "y", "heading", "left", "right"] {
        assert!(agents[0].get(key).is_some(), "missing agent field {}", key);
    }

    let restored = pps_core::PopulationSnapshot::from_json(&json).unwrap();
    assert_eq!(restored.state, EngineState::Running);
}

#[test]
fn test_dense_population_senses_neighbors() {
    let mut engine = SimulationEngine::seeded(100.0, 400, 400, 2).unwrap();
    engine.start();
    let summary = engine.tick().unwrap();

    // About 28 agents fall inside any radius-15 disc at this density
    assert!(summary.mean_neighbors() > 10.0);
    assert!(engine.agents().iter().all(|a| a.density() == a.left() + a.right()));
    assert!(engine.agents().iter().any(|a| a.left() > 0 && a.right() > 0));
}
