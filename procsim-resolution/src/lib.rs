//! # procsim Deadlock Resolution
//!
//! Crate for relieving detected contention by forced termination.

pub mod terminate;

pub use terminate::LowestPidResolver;

use procsim_core::model::Pid;
use procsim_core::SimContext;
use procsim_detection::DeadlockReport;

/// Acts on a detection report. Returns the pid it terminated, if any.
pub trait DeadlockResolver: Send + Sync {
    fn resolve(&self, ctx: &mut SimContext, report: &DeadlockReport) -> Option<Pid>;
}
