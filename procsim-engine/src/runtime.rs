//! Run modes shared by every frontend: a single simulation (optionally checked
//! against a recorded state hash), seeded fuzzing, and scenario generation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use procsim_config::{ProcsimConfig, SimulationConfig, WorkloadConfig};
use procsim_core::model::Outcome;
use procsim_simulator::{generate_workload, GeneratorParams, Simulation, SimulationReport};
use procsim_telemetry::{EventLogger, MetricsRecorder};

use crate::engine::{BugReport, DiagnosticsCollector, EngineError};

#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    /// Main configuration file; `config/procsim.yaml` and defaults otherwise.
    pub config_path: Option<PathBuf>,
    /// Workload file replacing the configured workload.
    pub workload_path: Option<PathBuf>,
    /// Overrides `simulation.quantum`.
    pub quantum: Option<u64>,
    /// Expected state hash of a previous run.
    pub validate_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FuzzOptions {
    /// First seed; each case uses the next one.
    pub seed: u64,
    /// Number of cases (0 for unlimited).
    pub iterations: usize,
    pub simulation: SimulationConfig,
    pub params: GeneratorParams,
    /// Cases running at once.
    pub workers: usize,
    /// Where bug reports go.
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct FuzzSummary {
    pub runs: usize,
    pub deadlocks: u64,
    /// Failing seeds with their bug report, ascending seed.
    pub failures: Vec<(u64, PathBuf)>,
}

/// Resolves the configuration for a run: file (or defaults), environment,
/// optional workload file, optional quantum override. Re-validated after the
/// overrides are applied.
pub fn load_run_config(options: &SimulateOptions) -> Result<ProcsimConfig, EngineError> {
    let mut config = match &options.config_path {
        Some(path) => ProcsimConfig::load_from_path(path)?,
        None => ProcsimConfig::load()?,
    };
    if let Some(path) = &options.workload_path {
        config.workload = WorkloadConfig::load_from_path(path)?;
    }
    if let Some(quantum) = options.quantum {
        config.simulation.quantum = quantum;
    }
    validator::Validate::validate(&config).map_err(procsim_config::ConfigError::from)?;
    Ok(config)
}

/// Runs one simulation to completion.
#[instrument(skip_all, fields(processes = config.workload.processes.len()))]
pub fn run_simulation_mode(
    config: &ProcsimConfig,
    validate_hash: Option<&str>,
    metrics: MetricsRecorder,
) -> Result<SimulationReport, EngineError> {
    let report = Simulation::from_config(&config.simulation, &config.workload)?
        .with_metrics(metrics)
        .run();

    let hash = report.state_hash();
    EventLogger::log_run_summary(
        "simulate",
        report.counters.context_switches,
        report.counters.deadlocks_detected,
        report.final_time,
    );
    info!(%hash, "State hash");

    if let Some(expected) = validate_hash {
        if expected != hash {
            return Err(EngineError::HashMismatch {
                expected: expected.to_string(),
                actual: hash,
            });
        }
        info!("State hash validated");
    }
    Ok(report)
}

/// Checks a finished run against the invariants every run must satisfy.
/// `replay` is a second run of the same workload.
pub fn check_invariants(report: &SimulationReport, replay: &SimulationReport) -> Vec<String> {
    let mut violations = Vec::new();

    let mut executed = vec![0u64; report.processes.len()];
    for event in report.event_log.iter() {
        if event.duration == 0 || event.duration > report.quantum {
            violations.push(format!(
                "P{} received a slice of {} with quantum {}",
                event.pid, event.duration, report.quantum
            ));
        }
        executed[event.pid] += event.duration;
    }

    for p in &report.processes {
        match p.outcome() {
            None => violations.push(format!("P{} never finished", p.pid)),
            Some(Outcome::Completed) => {
                if p.turnaround() != p.waiting() + p.burst {
                    violations.push(format!(
                        "P{} turnaround {} != waiting {} + burst {}",
                        p.pid,
                        p.turnaround(),
                        p.waiting(),
                        p.burst
                    ));
                }
                if !report.finished_order.contains(&p.pid) {
                    violations.push(format!("P{} completed but is not in finished order", p.pid));
                }
            }
            Some(Outcome::Terminated) => {
                if report.finished_order.contains(&p.pid) {
                    violations.push(format!("P{} terminated but is in finished order", p.pid));
                }
            }
        }
        if executed[p.pid] + p.remaining() != p.burst {
            violations.push(format!(
                "P{} executed {} with {} remaining of burst {}",
                p.pid,
                executed[p.pid],
                p.remaining(),
                p.burst
            ));
        }
    }

    if report.counters.context_switches != report.event_log.len() as u64 {
        violations.push("context switches differ from dispatch count".into());
    }
    if report.state_hash() != replay.state_hash() {
        violations.push("replay produced a different state hash".into());
    }
    violations
}

/// Generates workloads from consecutive seeds, runs each twice and records a
/// bug report for every case that breaks an invariant.
///
/// A case that fails outright stops new launches; the cases already running
/// are awaited before the first error is returned.
#[instrument(skip_all, fields(seed = options.seed, iterations = options.iterations))]
pub async fn run_fuzz_mode(
    options: FuzzOptions,
    metrics: MetricsRecorder,
) -> Result<FuzzSummary, EngineError> {
    run_cases(options, metrics, fuzz_case).await
}

type CaseFn = fn(
    u64,
    &SimulationConfig,
    &GeneratorParams,
    MetricsRecorder,
    &DiagnosticsCollector,
) -> Result<FuzzCase, EngineError>;

async fn run_cases(
    options: FuzzOptions,
    metrics: MetricsRecorder,
    case: CaseFn,
) -> Result<FuzzSummary, EngineError> {
    // Fail fast on a bad quantum or tier split before spawning anything.
    Simulation::from_config(&options.simulation, &WorkloadConfig::default())?;

    let diagnostics = Arc::new(DiagnosticsCollector::new(&options.output_dir));
    let workers = options.workers.max(1);
    let mut tasks = JoinSet::new();
    let mut summary = FuzzSummary::default();
    let mut failure: Option<EngineError> = None;
    let mut launched = 0usize;

    loop {
        while failure.is_none()
            && tasks.len() < workers
            && (options.iterations == 0 || launched < options.iterations)
        {
            let seed = options.seed.wrapping_add(launched as u64);
            let simulation = options.simulation.clone();
            let params = options.params;
            let metrics = metrics.clone();
            let diagnostics = diagnostics.clone();
            tasks.spawn_blocking(move || case(seed, &simulation, &params, metrics, &diagnostics));
            launched += 1;
        }

        let Some(joined) = tasks.join_next().await else {
            break;
        };
        match joined.map_err(EngineError::from).and_then(|result| result) {
            Ok(done) => {
                summary.runs += 1;
                summary.deadlocks += done.deadlocks;
                if let Some(path) = done.bug_report {
                    summary.failures.push((done.seed, path));
                }
            }
            Err(err) => {
                warn!(error = %err, in_flight = tasks.len(), "Fuzz case failed");
                failure.get_or_insert(err);
            }
        }
    }

    summary.failures.sort_unstable_by_key(|(seed, _)| *seed);
    info!(
        runs = summary.runs,
        failures = summary.failures.len(),
        deadlocks = summary.deadlocks,
        "Fuzzing finished"
    );
    match failure {
        Some(err) => Err(err),
        None => Ok(summary),
    }
}

struct FuzzCase {
    seed: u64,
    deadlocks: u64,
    bug_report: Option<PathBuf>,
}

fn fuzz_case(
    seed: u64,
    simulation: &SimulationConfig,
    params: &GeneratorParams,
    metrics: MetricsRecorder,
    diagnostics: &DiagnosticsCollector,
) -> Result<FuzzCase, EngineError> {
    let workload = generate_workload(seed, params);
    let report = Simulation::from_config(simulation, &workload)?
        .with_metrics(metrics)
        .run();
    let replay = Simulation::from_config(simulation, &workload)?.run();

    let violations = check_invariants(&report, &replay);
    debug!(seed, hash = %report.state_hash(), violations = violations.len(), "Fuzz case finished");

    let bug_report = if violations.is_empty() {
        None
    } else {
        warn!(seed, ?violations, "Invariant violated");
        Some(diagnostics.record_bug_report(&BugReport {
            seed,
            quantum: simulation.quantum,
            generated_at: Utc::now(),
            violations,
            workload,
        })?)
    };

    Ok(FuzzCase {
        seed,
        deadlocks: report.counters.deadlocks_detected,
        bug_report,
    })
}

/// Generates a workload from `seed` and writes it as YAML.
pub fn save_scenario<P: AsRef<Path>>(
    path: P,
    seed: u64,
    params: &GeneratorParams,
) -> Result<WorkloadConfig, EngineError> {
    let workload = generate_workload(seed, params);
    workload.save_to_path(path.as_ref())?;
    info!(seed, path = %path.as_ref().display(), "Scenario saved");
    Ok(workload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use procsim_config::ProcessSpec;
    use tracing_test::traced_test;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("procsim-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config() -> ProcsimConfig {
        let mut config = ProcsimConfig::default();
        config.workload = generate_workload(3, &GeneratorParams::default());
        config
    }

    #[traced_test]
    #[test]
    fn test_simulation_hash_validation() {
        let metrics = MetricsRecorder::new().unwrap();
        let report = run_simulation_mode(&config(), None, metrics.clone()).unwrap();
        let hash = report.state_hash();

        assert!(run_simulation_mode(&config(), Some(&hash), metrics.clone()).is_ok());
        let err = run_simulation_mode(&config(), Some("00"), metrics).unwrap_err();
        assert!(matches!(err, EngineError::HashMismatch { .. }));
        assert!(logs_contain("State hash validated"));
    }

    #[test]
    fn test_invariants_hold_for_generated_workloads() {
        let params = GeneratorParams {
            exhausted_probability: 0.3,
            ..GeneratorParams::default()
        };
        for seed in 0..20 {
            let workload = generate_workload(seed, &params);
            let sim = SimulationConfig::default();
            let a = Simulation::from_config(&sim, &workload).unwrap().run();
            let b = Simulation::from_config(&sim, &workload).unwrap().run();
            assert!(check_invariants(&a, &b).is_empty(), "seed {seed}");
        }
    }

    #[test]
    fn test_invariant_check_catches_divergent_replay() {
        let sim = SimulationConfig::default();
        let a = Simulation::from_config(&sim, &config().workload).unwrap().run();
        let mut other = config().workload;
        other.processes.push(ProcessSpec {
            arrival: 0,
            burst: 1,
            priority: 0,
            resources: vec![],
        });
        let b = Simulation::from_config(&sim, &other).unwrap().run();
        assert_eq!(
            check_invariants(&a, &b),
            vec!["replay produced a different state hash".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fuzz_mode_runs_every_seed() {
        let dir = temp_dir("fuzz");
        let metrics = MetricsRecorder::new().unwrap();
        let options = FuzzOptions {
            seed: 100,
            iterations: 12,
            simulation: SimulationConfig::default(),
            params: GeneratorParams {
                exhausted_probability: 0.2,
                ..GeneratorParams::default()
            },
            workers: 4,
            output_dir: dir.clone(),
        };

        let summary = run_fuzz_mode(options, metrics.clone()).await.unwrap();
        assert_eq!(summary.runs, 12);
        assert!(summary.failures.is_empty());
        assert_eq!(metrics.deadlocks.get(), summary.deadlocks);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_fuzz_mode_rejects_zero_quantum() {
        let options = FuzzOptions {
            seed: 0,
            iterations: 1,
            simulation: SimulationConfig {
                quantum: 0,
                ..SimulationConfig::default()
            },
            params: GeneratorParams::default(),
            workers: 1,
            output_dir: temp_dir("fuzz-zero"),
        };
        let err = run_fuzz_mode(options, MetricsRecorder::new().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Simulation(_)));
    }

    fn fuzz_options(name: &str, iterations: usize, workers: usize) -> FuzzOptions {
        FuzzOptions {
            seed: 0,
            iterations,
            simulation: SimulationConfig::default(),
            params: GeneratorParams::default(),
            workers,
            output_dir: temp_dir(name),
        }
    }

    fn odd_seeds_violate(
        seed: u64,
        simulation: &SimulationConfig,
        _: &GeneratorParams,
        _: MetricsRecorder,
        diagnostics: &DiagnosticsCollector,
    ) -> Result<FuzzCase, EngineError> {
        let bug_report = (seed % 2 == 1)
            .then(|| {
                diagnostics.record_bug_report(&BugReport {
                    seed,
                    quantum: simulation.quantum,
                    generated_at: Utc::now(),
                    violations: vec![format!("seed {seed} is odd")],
                    workload: WorkloadConfig::default(),
                })
            })
            .transpose()?;
        Ok(FuzzCase {
            seed,
            deadlocks: 0,
            bug_report,
        })
    }

    #[tokio::test]
    async fn test_fuzz_failures_pair_seed_with_report() {
        let options = fuzz_options("fuzz-odd", 10, 3);
        let dir = options.output_dir.clone();
        let summary = run_cases(options, MetricsRecorder::new().unwrap(), odd_seeds_violate)
            .await
            .unwrap();

        assert_eq!(summary.runs, 10);
        let seeds: Vec<u64> = summary.failures.iter().map(|(seed, _)| *seed).collect();
        assert_eq!(seeds, vec![1, 3, 5, 7, 9]);
        for (seed, path) in &summary.failures {
            let written = std::fs::read_to_string(path).unwrap();
            let report: BugReport = serde_yaml::from_str(&written).unwrap();
            assert_eq!(report.seed, *seed);
        }
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 5);
        std::fs::remove_dir_all(dir).unwrap();
    }

    static STARTED: AtomicUsize = AtomicUsize::new(0);
    static FINISHED: AtomicUsize = AtomicUsize::new(0);

    fn first_seed_errors(
        seed: u64,
        _: &SimulationConfig,
        _: &GeneratorParams,
        _: MetricsRecorder,
        _: &DiagnosticsCollector,
    ) -> Result<FuzzCase, EngineError> {
        STARTED.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(if seed == 0 { 1 } else { 100 }));
        FINISHED.fetch_add(1, Ordering::SeqCst);
        if seed == 0 {
            return Err(std::io::Error::other("disk full").into());
        }
        Ok(FuzzCase {
            seed,
            deadlocks: 0,
            bug_report: None,
        })
    }

    #[tokio::test]
    async fn test_fuzz_error_waits_for_running_cases() {
        let options = fuzz_options("fuzz-error", 16, 4);
        let err = run_cases(options, MetricsRecorder::new().unwrap(), first_seed_errors)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Io(_)));
        // No launches after the failure, and nothing left running.
        assert_eq!(STARTED.load(Ordering::SeqCst), 4);
        assert_eq!(FINISHED.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_saved_scenario_loads_back() {
        let dir = temp_dir("scenario");
        let path = dir.join("workload.yaml");
        let saved = save_scenario(&path, 11, &GeneratorParams::default()).unwrap();

        let options = SimulateOptions {
            workload_path: Some(path),
            quantum: Some(2),
            ..SimulateOptions::default()
        };
        let loaded = load_run_config(&options).unwrap();
        assert_eq!(loaded.workload, saved);
        assert_eq!(loaded.simulation.quantum, 2);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_quantum_override_is_validated() {
        let options = SimulateOptions {
            quantum: Some(0),
            ..SimulateOptions::default()
        };
        assert!(matches!(
            load_run_config(&options),
            Err(EngineError::Config(_))
        ));
    }
}
