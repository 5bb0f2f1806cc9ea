use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use procsim_engine::report::render_all;
use procsim_engine::{
    load_run_config, run_fuzz_mode, run_simulation_mode, save_scenario, FuzzOptions,
    SimulateOptions,
};
use procsim_simulator::GeneratorParams;
use procsim_telemetry::{EventLogger, MetricsRecorder};

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Log filter; overrides `telemetry.log_level` (RUST_LOG wins over both)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a workload to completion and print the reports
    Simulate(SimulateArgs),
    /// Run generated workloads and check every run's invariants
    Fuzz(FuzzArgs),
    /// Generate a workload and write it as YAML
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Configuration file (defaults to config/procsim.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Workload file replacing the configured workload
    #[arg(short, long)]
    pub workload: Option<PathBuf>,
    #[arg(short, long)]
    pub quantum: Option<u64>,
    /// Fail unless the run's state hash matches
    #[arg(long)]
    pub validate_hash: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct FuzzArgs {
    /// Initial seed (auto-increments per case)
    #[arg(long, default_value_t = 1)]
    pub seed: u64,
    /// Number of cases (0 for unlimited)
    #[arg(long, default_value_t = 100)]
    pub iterations: usize,
    #[arg(long, default_value_t = 8)]
    pub processes: usize,
    #[arg(long, default_value_t = 3)]
    pub resources: usize,
    #[arg(short, long)]
    pub quantum: Option<u64>,
    /// Chance that a generated resource starts with no available units
    #[arg(long, default_value_t = 0.1)]
    pub exhausted_probability: f64,
    /// Concurrent cases (defaults to the number of CPUs)
    #[arg(long)]
    pub workers: Option<usize>,
    #[arg(long, default_value = "bug_reports")]
    pub output_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    #[arg(long, default_value_t = 8)]
    pub processes: usize,
    #[arg(long, default_value_t = 3)]
    pub resources: usize,
    #[arg(long, default_value_t = 0.0)]
    pub exhausted_probability: f64,
    /// Output file
    #[arg(short, long, default_value = "workload.yaml")]
    pub out: PathBuf,
}

pub async fn run_command(cli: Cli) -> CliResult {
    match cli.command {
        Commands::Simulate(args) => simulate(args, cli.log_level).await,
        Commands::Fuzz(args) => fuzz(args, cli.log_level).await,
        Commands::Generate(args) => {
            EventLogger::init_with_level(cli.log_level.as_deref().unwrap_or("info"));
            let params = GeneratorParams {
                processes: args.processes,
                resources: args.resources,
                exhausted_probability: args.exhausted_probability,
                ..GeneratorParams::default()
            };
            save_scenario(&args.out, args.seed, &params)?;
            println!("Workload written to {}", args.out.display());
            Ok(())
        }
    }
}

async fn simulate(args: SimulateArgs, log_level: Option<String>) -> CliResult {
    let options = SimulateOptions {
        config_path: args.config,
        workload_path: args.workload,
        quantum: args.quantum,
        validate_hash: args.validate_hash,
    };
    let config = load_run_config(&options)?;
    EventLogger::init_with_level(log_level.as_deref().unwrap_or(&config.telemetry.log_level));

    let metrics = MetricsRecorder::new()?;
    let report = run_simulation_mode(&config, options.validate_hash.as_deref(), metrics.clone())?;

    print!("{}", render_all(&report));
    println!("State hash: {}", report.state_hash());
    if config.telemetry.metrics_enabled {
        print!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

async fn fuzz(args: FuzzArgs, log_level: Option<String>) -> CliResult {
    let config = load_run_config(&SimulateOptions {
        quantum: args.quantum,
        ..SimulateOptions::default()
    })?;
    EventLogger::init_with_level(log_level.as_deref().unwrap_or(&config.telemetry.log_level));

    let options = FuzzOptions {
        seed: args.seed,
        iterations: args.iterations,
        simulation: config.simulation.clone(),
        params: GeneratorParams {
            processes: args.processes,
            resources: args.resources,
            exhausted_probability: args.exhausted_probability,
            ..GeneratorParams::default()
        },
        workers: args.workers.unwrap_or_else(num_cpus::get),
        output_dir: args.output_dir,
    };
    info!(workers = options.workers, "Starting fuzzing");

    let metrics = MetricsRecorder::new()?;
    let summary = run_fuzz_mode(options, metrics.clone()).await?;

    println!(
        "Runs: {}  Deadlocks: {}  Failures: {}",
        summary.runs,
        summary.deadlocks,
        summary.failures.len()
    );
    for (seed, path) in &summary.failures {
        println!("  seed {seed}: {}", path.display());
    }
    if config.telemetry.metrics_enabled {
        print!("{}", metrics.gather_metrics()?);
    }
    if summary.failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} fuzz case(s) violated invariants", summary.failures.len()).into())
    }
}
