//! The dispatch loop.
//!
//! One iteration: admit arrivals, then either idle for a tick or select,
//! dispatch, detect and resolve. The loop ends once the ready queue is empty
//! and every process is finished. Termination is guaranteed for finite
//! arrivals: each dispatch consumes at least one tick of work from a positive
//! quantum, and each detection event finishes one process.

use tracing::{debug, info, instrument};

use procsim_config::{SimulationConfig, WorkloadConfig};
use procsim_core::events::DispatchEvent;
use procsim_core::model::{Outcome, Process, Resource, ResourceTable, Rid};
use procsim_core::{SimContext, SimulationError};
use procsim_detection::{DeadlockDetector, ExhaustedRequestDetector};
use procsim_resolution::{DeadlockResolver, LowestPidResolver};
use procsim_telemetry::MetricsRecorder;

use crate::admission::admit_arrivals;
use crate::dispatch::dispatch;
use crate::report::{DeadlockRecord, SimulationReport};
use crate::scheduler;

/// Result of a single loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing was ready; the clock moved one tick.
    Idle,
    /// One slice ran.
    Dispatched(DispatchEvent),
    /// Every process is finished.
    Done,
}

pub struct Simulation {
    ctx: SimContext,
    config: SimulationConfig,
    detector: Box<dyn DeadlockDetector>,
    resolver: Box<dyn DeadlockResolver>,
    metrics: Option<MetricsRecorder>,
    deadlocks: Vec<DeadlockRecord>,
}

impl Simulation {
    /// Creates a simulation with the exhausted-request detector and the
    /// lowest-pid resolver.
    pub fn new(
        processes: Vec<Process>,
        resources: ResourceTable,
        config: SimulationConfig,
    ) -> Result<Self, SimulationError> {
        if config.quantum == 0 {
            return Err(SimulationError::ZeroQuantum);
        }
        if config.tiers.shortest_remaining_max >= config.tiers.priority_max {
            return Err(SimulationError::InvalidTiers {
                shortest_remaining_max: config.tiers.shortest_remaining_max,
                priority_max: config.tiers.priority_max,
            });
        }

        Ok(Self {
            ctx: SimContext::new(processes, resources)?,
            config,
            detector: Box::new(ExhaustedRequestDetector),
            resolver: Box::new(LowestPidResolver),
            metrics: None,
            deadlocks: Vec::new(),
        })
    }

    /// Builds processes and resources from a workload description.
    pub fn from_config(
        config: &SimulationConfig,
        workload: &WorkloadConfig,
    ) -> Result<Self, SimulationError> {
        let processes = workload
            .processes
            .iter()
            .enumerate()
            .map(|(pid, spec)| {
                Process::new(
                    pid,
                    spec.arrival,
                    spec.burst,
                    spec.priority,
                    spec.resources.clone(),
                )
            })
            .collect();

        let resources = workload
            .resources
            .iter()
            .enumerate()
            .map(|(rid, spec)| match spec.available {
                Some(available) => Resource::with_available(rid, spec.total, available),
                None => Ok(Resource::new(rid, spec.total)),
            })
            .collect::<Result<ResourceTable, _>>()?;

        Self::new(processes, resources, config.clone())
    }

    pub fn with_detector(mut self, detector: impl DeadlockDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    pub fn with_resolver(mut self, resolver: impl DeadlockResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn deadlocks(&self) -> &[DeadlockRecord] {
        &self.deadlocks
    }

    /// Overrides the free units of a resource. Nothing in the loop changes
    /// `available`, so this is the only way to drive a pool to zero mid-run.
    pub fn set_available(&mut self, rid: Rid, available: u32) -> Result<(), SimulationError> {
        self.ctx.resources.set_available(rid, available)
    }

    /// Runs one loop iteration.
    pub fn step(&mut self) -> Step {
        admit_arrivals(&mut self.ctx);

        let Some(selection) = scheduler::select(&self.ctx, &self.config.tiers) else {
            if self.ctx.all_finished() {
                return Step::Done;
            }
            self.ctx.clock.tick();
            self.ctx.counters.idle_ticks += 1;
            if let Some(metrics) = &self.metrics {
                metrics.idle_ticks.inc();
            }
            return Step::Idle;
        };

        let event = dispatch(&mut self.ctx, selection, self.config.quantum);
        if let Some(metrics) = &self.metrics {
            metrics.record_dispatch(event.duration);
            if self.ctx.process(event.pid).outcome() == Some(Outcome::Completed) {
                metrics.completions.inc();
            }
        }

        self.detect_and_resolve();
        Step::Dispatched(event)
    }

    fn detect_and_resolve(&mut self) {
        let Some(report) = self.detector.detect(&self.ctx) else {
            return;
        };
        self.ctx.counters.deadlocks_detected += 1;
        let terminated = self.resolver.resolve(&mut self.ctx, &report);

        if let Some(metrics) = &self.metrics {
            metrics.deadlocks.inc();
            if terminated.is_some() {
                metrics.terminations.inc();
            }
        }
        debug!(
            detected = self.ctx.counters.deadlocks_detected,
            ?terminated,
            "Deadlock pass complete"
        );
        self.deadlocks.push(DeadlockRecord { report, terminated });
    }

    /// Steps until every process is finished.
    pub fn run_to_completion(&mut self) {
        while self.step() != Step::Done {}
    }

    /// Runs to completion and returns the final report.
    #[instrument(
        name = "simulation",
        skip(self),
        fields(processes = self.ctx.processes.len(), quantum = self.config.quantum)
    )]
    pub fn run(mut self) -> SimulationReport {
        info!("Starting simulation");
        self.run_to_completion();
        let report = self.into_report();
        info!(
            final_time = report.final_time,
            dispatches = report.counters.context_switches,
            deadlocks = report.counters.deadlocks_detected,
            "Simulation complete"
        );
        report
    }

    pub fn into_report(self) -> SimulationReport {
        let ctx = self.ctx;
        SimulationReport {
            quantum: self.config.quantum,
            final_time: ctx.clock.now(),
            processes: ctx.processes,
            resources: ctx.resources,
            event_log: ctx.event_log,
            finished_order: ctx.finished_order,
            counters: ctx.counters,
            requests: ctx.requests,
            allocations: ctx.allocations,
            deadlocks: self.deadlocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procsim_config::{ProcessSpec, ResourceSpec, TierConfig};
    use tracing_test::traced_test;

    fn spec(arrival: u64, burst: u64, priority: i32, resources: Vec<usize>) -> ProcessSpec {
        ProcessSpec {
            arrival,
            burst,
            priority,
            resources,
        }
    }

    fn contended_workload() -> WorkloadConfig {
        WorkloadConfig {
            resources: vec![ResourceSpec {
                total: 1,
                available: None,
            }],
            processes: vec![spec(0, 4, 1, vec![0]), spec(0, 4, 2, vec![0])],
        }
    }

    #[test]
    fn test_two_process_contention_never_deadlocks() {
        let report = Simulation::from_config(&SimulationConfig::default(), &contended_workload())
            .unwrap()
            .run();

        assert_eq!(
            report.event_log.timeline().collect::<Vec<_>>(),
            vec![(0, 3), (0, 1), (1, 3), (1, 1)]
        );
        assert_eq!(report.counters.deadlocks_detected, 0);
        assert_eq!(report.counters.context_switches, 4);
        assert_eq!(report.final_time, 8);
        assert_eq!(report.finished_order, vec![0, 1]);

        let p0 = &report.processes[0];
        assert_eq!((p0.finish_time(), p0.waiting(), p0.turnaround()), (4, 0, 4));
        let p1 = &report.processes[1];
        assert_eq!((p1.finish_time(), p1.waiting(), p1.turnaround()), (8, 4, 8));
        assert!(report.allocations.is_empty());
    }

    #[test]
    fn test_idle_ticks_until_first_arrival() {
        let workload = WorkloadConfig {
            resources: vec![],
            processes: vec![spec(3, 2, 0, vec![])],
        };
        let mut sim = Simulation::from_config(&SimulationConfig::default(), &workload).unwrap();
        assert_eq!(sim.step(), Step::Idle);
        assert_eq!(sim.step(), Step::Idle);
        assert_eq!(sim.step(), Step::Idle);
        assert!(matches!(sim.step(), Step::Dispatched(e) if e.start == 3 && e.duration == 2));
        assert_eq!(sim.step(), Step::Done);
        assert_eq!(sim.context().counters.idle_ticks, 3);
        assert_eq!(sim.context().process(0).waiting(), 0);
    }

    #[test]
    fn test_empty_workload_finishes_immediately() {
        let mut sim =
            Simulation::from_config(&SimulationConfig::default(), &WorkloadConfig::default())
                .unwrap();
        assert_eq!(sim.step(), Step::Done);
    }

    #[traced_test]
    #[test]
    fn test_exhausted_pool_terminates_one_process_per_detection() {
        let workload = WorkloadConfig {
            resources: vec![ResourceSpec {
                total: 2,
                available: None,
            }],
            processes: vec![
                spec(0, 6, 0, vec![]),
                spec(0, 6, 0, vec![0]),
                spec(0, 6, 0, vec![0]),
            ],
        };
        let mut sim = Simulation::from_config(&SimulationConfig::default(), &workload).unwrap();

        assert!(matches!(sim.step(), Step::Dispatched(_)));
        assert_eq!(sim.context().counters.deadlocks_detected, 0);

        sim.set_available(0, 0).unwrap();
        assert!(matches!(sim.step(), Step::Dispatched(_)));

        let ctx = sim.context();
        assert_eq!(ctx.counters.deadlocks_detected, 1);
        assert_eq!(ctx.process(0).outcome(), Some(Outcome::Terminated));
        assert!(!ctx.process(1).is_finished());
        assert!(!ctx.process(2).is_finished());
        assert!(!ctx.ready.contains(0));
        assert_eq!(sim.deadlocks()[0].report.waiting, vec![1, 2]);
        assert_eq!(sim.deadlocks()[0].terminated, Some(0));
        assert!(logs_contain("Deadlock pass complete"));
    }

    #[test]
    fn test_starting_exhausted_drains_every_requester() {
        let workload = WorkloadConfig {
            resources: vec![ResourceSpec {
                total: 1,
                available: Some(0),
            }],
            processes: vec![
                spec(0, 9, 0, vec![0]),
                spec(0, 9, 0, vec![0]),
                spec(0, 2, 0, vec![]),
            ],
        };
        let report = Simulation::from_config(&SimulationConfig::default(), &workload)
            .unwrap()
            .run();

        assert!(report.processes.iter().all(Process::is_finished));
        assert_eq!(report.counters.deadlocks_detected, 2);
        assert_eq!(report.counters.terminations, 2);
        let victims: Vec<_> = report.deadlocks.iter().map(|d| d.terminated).collect();
        assert_eq!(victims, vec![Some(0), Some(1)]);
        assert_eq!(report.finished_order, vec![2]);
        assert_eq!(report.processes[0].outcome(), Some(Outcome::Terminated));
        assert_eq!(report.processes[0].turnaround(), 0);
    }

    #[test]
    fn test_rejects_zero_quantum() {
        let config = SimulationConfig {
            quantum: 0,
            tiers: TierConfig::default(),
        };
        let err = Simulation::from_config(&config, &contended_workload()).err();
        assert_eq!(err, Some(SimulationError::ZeroQuantum));
    }

    #[test]
    fn test_rejects_overlapping_tiers() {
        let config = SimulationConfig {
            quantum: 3,
            tiers: TierConfig {
                shortest_remaining_max: 4,
                priority_max: 4,
            },
        };
        assert!(matches!(
            Simulation::from_config(&config, &contended_workload()),
            Err(SimulationError::InvalidTiers { .. })
        ));
    }

    #[test]
    fn test_metrics_follow_counters() {
        let metrics = MetricsRecorder::new().unwrap();
        let report = Simulation::from_config(&SimulationConfig::default(), &contended_workload())
            .unwrap()
            .with_metrics(metrics.clone())
            .run();
        assert_eq!(metrics.dispatches.get(), report.counters.context_switches);
        assert_eq!(metrics.completions.get(), 2);
        assert_eq!(metrics.deadlocks.get(), 0);
    }
}
