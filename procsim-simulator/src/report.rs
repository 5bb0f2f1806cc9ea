//! Final output of a run.
//!
//! Everything the outer renderers consume lives here: the dispatch log for the
//! timeline, the process registry for the summary table, the request and
//! allocation tables for the graph, and the detection history.

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use procsim_core::events::EventLog;
use procsim_core::model::{AllocationTable, Outcome, Pid, Process, RequestTable, ResourceTable};
use procsim_core::time::Ticks;
use procsim_core::Counters;
use procsim_detection::DeadlockReport;

/// One detection event and what the resolver did about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlockRecord {
    pub report: DeadlockReport,
    pub terminated: Option<Pid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub quantum: Ticks,
    pub final_time: Ticks,
    pub processes: Vec<Process>,
    pub resources: ResourceTable,
    pub event_log: EventLog,
    pub finished_order: Vec<Pid>,
    pub counters: Counters,
    pub requests: RequestTable,
    pub allocations: AllocationTable,
    pub deadlocks: Vec<DeadlockRecord>,
}

impl SimulationReport {
    /// Processes that ran to completion.
    pub fn completed(&self) -> impl Iterator<Item = &Process> {
        self.processes
            .iter()
            .filter(|p| p.outcome() == Some(Outcome::Completed))
    }

    /// Processes finished by the resolver.
    pub fn terminated(&self) -> impl Iterator<Item = &Process> {
        self.processes
            .iter()
            .filter(|p| p.outcome() == Some(Outcome::Terminated))
    }

    /// Mean waiting time over completed processes.
    pub fn average_waiting(&self) -> Option<f64> {
        mean(self.completed().map(Process::waiting))
    }

    /// Mean turnaround time over completed processes.
    pub fn average_turnaround(&self) -> Option<f64> {
        mean(self.completed().map(Process::turnaround))
    }

    /// BLAKE3 digest of the dispatch log, final statistics and counters.
    /// Two runs of the same workload and configuration hash identically.
    pub fn state_hash(&self) -> String {
        let mut hasher = Hasher::new();
        hasher.update(&self.quantum.to_le_bytes());
        hasher.update(&self.final_time.to_le_bytes());

        for event in self.event_log.iter() {
            hasher.update(&(event.pid as u64).to_le_bytes());
            hasher.update(&event.start.to_le_bytes());
            hasher.update(&event.duration.to_le_bytes());
            hasher.update(event.discipline.as_str().as_bytes());
        }

        for p in &self.processes {
            let outcome: u8 = match p.outcome() {
                None => 0,
                Some(Outcome::Completed) => 1,
                Some(Outcome::Terminated) => 2,
            };
            hasher.update(&(p.pid as u64).to_le_bytes());
            hasher.update(&p.remaining().to_le_bytes());
            hasher.update(&p.waiting().to_le_bytes());
            hasher.update(&p.turnaround().to_le_bytes());
            hasher.update(&p.finish_time().to_le_bytes());
            hasher.update(&[outcome]);
        }

        hasher.update(&self.counters.context_switches.to_le_bytes());
        hasher.update(&self.counters.deadlocks_detected.to_le_bytes());
        hex::encode(hasher.finalize().as_bytes())
    }
}

fn mean(values: impl Iterator<Item = Ticks>) -> Option<f64> {
    let (sum, count) = values.fold((0u64, 0u64), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}
