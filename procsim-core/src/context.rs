//! Owned simulation state.
//!
//! Every phase of the loop (admission, scheduling, dispatch, detection,
//! resolution) receives the context explicitly; nothing lives in globals.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::events::EventLog;
use crate::model::{AllocationTable, Pid, Process, ReadyQueue, RequestTable, ResourceTable};
use crate::time::VirtualClock;

/// Cumulative per-run counters. Never reset mid-run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// One per dispatch, final slices included.
    pub context_switches: u64,
    pub deadlocks_detected: u64,
    pub terminations: u64,
    pub idle_ticks: u64,
}

#[derive(Debug, Clone)]
pub struct SimContext {
    pub clock: VirtualClock,
    pub processes: Vec<Process>,
    pub resources: ResourceTable,
    pub requests: RequestTable,
    pub allocations: AllocationTable,
    pub ready: ReadyQueue,
    pub event_log: EventLog,
    /// Pids in the order they completed. Terminated processes never appear.
    pub finished_order: Vec<Pid>,
    pub counters: Counters,
}

impl SimContext {
    /// Builds the context. Each process' pid must equal its index.
    pub fn new(processes: Vec<Process>, resources: ResourceTable) -> Result<Self, SimulationError> {
        if let Some((index, p)) = processes.iter().enumerate().find(|(i, p)| p.pid != *i) {
            return Err(SimulationError::PidMismatch { index, pid: p.pid });
        }
        let requests = RequestTable::from_processes(&processes);
        Ok(Self {
            clock: VirtualClock::default(),
            processes,
            resources,
            requests,
            allocations: AllocationTable::new(),
            ready: ReadyQueue::new(),
            event_log: EventLog::new(),
            finished_order: Vec::new(),
            counters: Counters::default(),
        })
    }

    #[inline]
    pub fn process(&self, pid: Pid) -> &Process {
        &self.processes[pid]
    }

    #[inline]
    pub fn process_mut(&mut self, pid: Pid) -> &mut Process {
        &mut self.processes[pid]
    }

    pub fn all_finished(&self) -> bool {
        self.processes.iter().all(Process::is_finished)
    }

    /// Unfinished processes in ascending pid order.
    pub fn unfinished(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter().filter(|p| !p.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Resource;

    #[test]
    fn test_context_rejects_pid_gaps() {
        let processes = vec![Process::new(0, 0, 1, 0, vec![]), Process::new(2, 0, 1, 0, vec![])];
        let err = SimContext::new(processes, ResourceTable::new()).unwrap_err();
        assert_eq!(err, SimulationError::PidMismatch { index: 1, pid: 2 });
    }

    #[test]
    fn test_context_builds_request_table() {
        let processes = vec![Process::new(0, 0, 1, 0, vec![0])];
        let resources = [Resource::new(0, 1)].into_iter().collect();
        let ctx = SimContext::new(processes, resources).unwrap();
        assert_eq!(ctx.requests.get(0), Some(&[0][..]));
        assert!(ctx.allocations.is_empty());
        assert!(!ctx.all_finished());
        assert_eq!(ctx.clock.now(), 0);
    }
}
