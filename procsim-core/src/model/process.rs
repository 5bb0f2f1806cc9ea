use serde::{Deserialize, Serialize};

use super::resource::Rid;
use crate::time::Ticks;

/// Process identifier. Equal to the process' index in the registry.
pub type Pid = usize;

/// Lower value means higher precedence.
pub type Priority = i32;

/// How a process left the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Ran until `remaining` reached zero.
    Completed,
    /// Forcibly finished by the deadlock resolver.
    Terminated,
}

/// A simulated process.
///
/// Parameters are fixed at creation. Execution state is only reachable through
/// [`Process::execute`], [`Process::complete`] and [`Process::terminate`], which
/// keep `0 <= remaining <= burst` and make `finished` a one-way transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub pid: Pid,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: Priority,
    pub resources_requested: Vec<Rid>,
    remaining: Ticks,
    waiting: Ticks,
    turnaround: Ticks,
    finish_time: Ticks,
    outcome: Option<Outcome>,
}

impl Process {
    pub fn new(
        pid: Pid,
        arrival: Ticks,
        burst: Ticks,
        priority: Priority,
        resources_requested: Vec<Rid>,
    ) -> Self {
        Self {
            pid,
            arrival,
            burst,
            priority,
            resources_requested,
            remaining: burst,
            waiting: 0,
            turnaround: 0,
            finish_time: 0,
            outcome: None,
        }
    }

    #[inline]
    pub fn remaining(&self) -> Ticks {
        self.remaining
    }

    #[inline]
    pub fn waiting(&self) -> Ticks {
        self.waiting
    }

    #[inline]
    pub fn turnaround(&self) -> Ticks {
        self.turnaround
    }

    #[inline]
    pub fn finish_time(&self) -> Ticks {
        self.finish_time
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Eligible for admission at `now`.
    #[inline]
    pub fn has_arrived(&self, now: Ticks) -> bool {
        self.arrival <= now
    }

    /// Runs the process for at most `quantum` ticks and returns the slice length.
    pub fn execute(&mut self, quantum: Ticks) -> Ticks {
        debug_assert!(!self.is_finished(), "P{} executed after finishing", self.pid);
        let slice = quantum.min(self.remaining);
        self.remaining -= slice;
        slice
    }

    /// Records completion at `now` and derives the timing statistics.
    pub fn complete(&mut self, now: Ticks) {
        debug_assert_eq!(self.remaining, 0, "P{} completed with work left", self.pid);
        debug_assert!(!self.is_finished(), "P{} completed twice", self.pid);
        self.finish_time = now;
        self.turnaround = now.saturating_sub(self.arrival);
        self.waiting = self.turnaround.saturating_sub(self.burst);
        self.outcome = Some(Outcome::Completed);
    }

    /// Forces the process to finish without touching its statistics.
    ///
    /// Returns `false` if it had already finished.
    pub fn terminate(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.outcome = Some(Outcome::Terminated);
        true
    }
}
