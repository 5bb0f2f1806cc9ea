//! ## procsim-resolution::terminate
//! **Lowest-pid forced termination**
//!
//! One victim per detection event: the unfinished process with the lowest pid,
//! whether or not it was among the flagged ones. The victim keeps its zeroed
//! statistics, is dropped from the ready queue and never enters the
//! finished-order list.

use tracing::warn;

use procsim_core::model::Pid;
use procsim_core::SimContext;
use procsim_detection::DeadlockReport;

use crate::DeadlockResolver;

#[derive(Debug, Default, Clone, Copy)]
pub struct LowestPidResolver;

impl DeadlockResolver for LowestPidResolver {
    fn resolve(&self, ctx: &mut SimContext, report: &DeadlockReport) -> Option<Pid> {
        let victim = ctx.unfinished().next()?.pid;

        ctx.process_mut(victim).terminate();
        ctx.ready.remove(victim);
        ctx.counters.terminations += 1;

        warn!(
            pid = victim,
            time = report.time,
            flagged = report.waiting.len(),
            "Terminating process to resolve deadlock"
        );
        Some(victim)
    }
}
