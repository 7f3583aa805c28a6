use spmd_nbody::{run, Scenario, SimulationConfig};
use spmd_nbody::{bench_workers, even_worker_counts};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Partitioned brute-force N-body simulation")]
struct Args {
    /// Run file, looked up under `scenarios/` when not found as given
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Override the worker count
    #[arg(short, long)]
    workers: Option<usize>,

    /// Override the population size
    #[arg(short = 'n', long)]
    bodies: Option<usize>,

    /// Override the number of steps
    #[arg(short, long)]
    steps: Option<usize>,

    /// Time the run at every worker count that divides the population
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut cfg = match &args.file {
        Some(file_name) => {
            let config_path = if file_name.exists() {
                file_name.clone()
            } else {
                PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
            };
            let file = File::open(&config_path)
                .with_context(|| format!("failed to open {}", config_path.display()))?;
            SimulationConfig::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse {}", config_path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(workers) = args.workers {
        cfg.engine.workers = workers;
    }
    if let Some(bodies) = args.bodies {
        cfg.engine.bodies = bodies;
    }
    if let Some(steps) = args.steps {
        cfg.parameters.steps = steps;
    }

    Ok(cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = load_config(&args)?;
    debug!(?cfg, "loaded configuration");

    let scenario = Scenario::build(&cfg).context("invalid run configuration")?;

    if args.bench {
        let counts = even_worker_counts(cfg.engine.bodies, cfg.engine.workers);
        bench_workers(cfg.engine.bodies, &counts, *scenario.parameters())?;
        return Ok(());
    }

    let report = run(&scenario)?;
    if let (Some(first), Some(last)) = (report.bodies.first(), report.bodies.last()) {
        debug!("body 0    {}", first);
        debug!("body N-1  {}", last);
    }

    Ok(())
}
