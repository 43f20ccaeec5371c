//! Primordial Particle Simulation Runner
//!
//! Runs the engine headless for a fixed number of frames, standing in for a
//! renderer: it retargets the population on request, polls the count, and
//! reports run statistics at the end.

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs::File;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pps_core::components::BoundaryMode;
use pps_core::config::Config;
use pps_core::events::{JsonLinesSink, SinkSet, TracingSink};
use pps_core::output::{LatestSnapshot, StatsCollector};
use pps_core::systems::{build_frame_schedule, build_frame_world, TargetChange};
use pps_core::SimulationEngine;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "pps_sim")]
#[command(about = "Primordial particle system simulation")]
struct Args {
    /// Tuning file; tuning.toml in the working directory is tried otherwise
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frames to run
    #[arg(long)]
    frames: Option<u64>,

    /// Ticks executed per frame
    #[arg(long)]
    ticks_per_frame: Option<u32>,

    /// Initial population
    #[arg(long)]
    initial: Option<usize>,

    /// Target population
    #[arg(long)]
    target: Option<usize>,

    /// Change the target population at a frame (repeatable)
    #[arg(long = "retarget", value_name = "FRAME:TARGET")]
    retargets: Vec<TargetChange>,

    /// Frames between population reports
    #[arg(long)]
    report_every: Option<u64>,

    /// Wrap positions exactly instead of nudging them back by a fixed step
    #[arg(long)]
    wrap: bool,

    /// Append engine events to this file as JSON lines
    #[arg(long, value_name = "PATH")]
    events: Option<PathBuf>,

    /// Print run statistics as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some(frames) = self.frames {
            config.simulation.frames = frames;
        }
        if let Some(ticks) = self.ticks_per_frame {
            config.simulation.ticks_per_frame = ticks;
        }
        if let Some(every) = self.report_every {
            config.simulation.report_every = every;
        }
        if let Some(initial) = self.initial {
            config.population.initial = initial;
        }
        if let Some(target) = self.target {
            config.population.target = target;
        }
        if self.wrap {
            config.world.boundary = BoundaryMode::Wrap;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };
    args.apply_overrides(&mut config);
    config.validate()?;

    let seed = config.simulation.seed.unwrap_or_else(rand::random);
    info!(
        seed,
        domain_size = config.world.size,
        initial = config.population.initial,
        target = config.population.target,
        frames = config.simulation.frames,
        ticks_per_frame = config.simulation.ticks_per_frame,
        boundary = ?config.world.boundary,
        "configuration loaded"
    );

    let mut sinks = SinkSet::new().with(TracingSink::default());
    if let Some(path) = &args.events {
        sinks = sinks.with(JsonLinesSink::new(File::create(path)?, false));
        info!(path = %path.display(), "writing events");
    }

    let mut engine =
        SimulationEngine::from_config(&config, SmallRng::seed_from_u64(seed))?.with_sink(sinks);
    engine.start();

    let mut world = build_frame_world(engine, &config, args.retargets.clone());
    let mut schedule = build_frame_schedule();

    for _ in 0..config.simulation.frames {
        schedule.run(&mut world);
    }

    world.resource_mut::<SimulationEngine>().stop();

    let stats = world.resource::<StatsCollector>().summary();
    info!(
        ticks = stats.total_ticks,
        final_population = stats.final_population,
        peak_population = stats.peak_population,
        average_neighbors = stats.average_neighbors,
        "simulation complete"
    );
    if let Some(snapshot) = &world.resource::<LatestSnapshot>().0 {
        info!(
            snapshot = %snapshot.snapshot_id,
            tick = snapshot.tick,
            mean_density = snapshot.mean_density(),
            max_density = snapshot.max_density(),
            "last snapshot"
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    Ok(())
}
