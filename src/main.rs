//! fill-station CLI - run a pump/car pairing simulation and print usage counts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use fill_station::builders::build_engine;
use fill_station::config::{DeadlinePolicy, SimulationConfig};
use fill_station::runtime::build_runtime;
use fill_station::util::init_tracing_with_default;

#[derive(Parser, Debug)]
#[command(name = "fill-station")]
#[command(about = "Simulate pumps serving cars for a fixed time", long_about = None)]
struct Cli {
    /// Number of pumps [default: 4]
    #[arg(long, env = "FILL_STATION_PUMPS")]
    pumps: Option<usize>,
    /// Number of cars [default: 10]
    #[arg(long, env = "FILL_STATION_CARS")]
    cars: Option<usize>,
    /// Duration of the simulation in seconds [default: 30]
    #[arg(long, env = "FILL_STATION_DURATION")]
    duration: Option<u64>,
    /// Fill time in milliseconds, 0 for random [default: 50]
    #[arg(long, env = "FILL_STATION_FILLRATE")]
    fillrate: Option<u64>,
    /// Upper bound for random fill times in milliseconds [default: 5000]
    #[arg(long, env = "FILL_STATION_RANDOM_MAX")]
    random_max: Option<u64>,
    /// Let the deadline interrupt a pairing that is still waiting
    #[arg(long, env = "FILL_STATION_PREEMPTIVE_DEADLINE")]
    preemptive_deadline: bool,
    /// JSON configuration file; flags override its values
    #[arg(long, env = "FILL_STATION_CONFIG")]
    config: Option<PathBuf>,
    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
    /// Tokio worker threads [default: number of CPUs]
    #[arg(long, env = "FILL_STATION_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

impl Cli {
    /// Layer defaults, the optional config file and flags, then validate.
    fn resolve(&self) -> Result<SimulationConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                SimulationConfig::from_json_str(&raw)
                    .map_err(anyhow::Error::msg)
                    .with_context(|| format!("loading {}", path.display()))?
            }
            None => SimulationConfig::default(),
        };

        if let Some(pumps) = self.pumps {
            cfg.station_count = pumps;
        }
        if let Some(cars) = self.cars {
            cfg.consumer_count = cars;
        }
        if let Some(duration) = self.duration {
            cfg.run_duration_secs = duration;
        }
        if let Some(fillrate) = self.fillrate {
            cfg.fill_rate_ms = fillrate;
        }
        if let Some(max) = self.random_max {
            cfg.random_fill_max_ms = max;
        }
        if self.preemptive_deadline {
            cfg.deadline = DeadlinePolicy::Preemptive;
        }

        cfg.validate()
            .map_err(anyhow::Error::msg)
            .context("invalid configuration")?;
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing_with_default("info");

    let cli = Cli::parse();
    let cfg = cli.resolve()?;
    let runtime = build_runtime(cli.worker_threads).context("starting tokio runtime")?;
    runtime.block_on(simulate(cfg, cli.json))
}

async fn simulate(cfg: SimulationConfig, json: bool) -> Result<()> {
    let engine = build_engine(&cfg).context("building pools")?;

    let handle = engine.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping");
            handle.stop();
        }
    });

    let summary = engine.run().await.context("simulation halted")?;
    info!(
        "Simulated for {:?} ({} fills dispatched)",
        summary.elapsed_running, summary.dispatched
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.report);
    }
    Ok(())
}
