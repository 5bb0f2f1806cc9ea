//! # procsim Deadlock Detection
//!
//! Crate for the detection pass that runs after every dispatch.

pub mod exhausted;

pub use exhausted::ExhaustedRequestDetector;

use serde::{Deserialize, Serialize};

use procsim_core::model::{Pid, Rid};
use procsim_core::time::Ticks;
use procsim_core::SimContext;

/// Outcome of a positive detection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlockReport {
    /// Clock value when the pass ran.
    pub time: Ticks,
    /// Flagged processes, ascending pid.
    pub waiting: Vec<Pid>,
    /// Exhausted resources that caused a flag, ascending rid.
    pub exhausted: Vec<Rid>,
}

/// Inspects the simulation state and reports contention, if any.
pub trait DeadlockDetector: Send + Sync {
    fn detect(&self, ctx: &SimContext) -> Option<DeadlockReport>;
}
