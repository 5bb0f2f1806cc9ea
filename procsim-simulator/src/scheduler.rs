//! Workload-adaptive selection.
//!
//! The discipline is chosen from the size *k* of the ready set on every
//! dispatch: exact ordering for small contention, a cheap static key for medium
//! contention, plain FIFO for high contention. Ties always fall back to the
//! ready-queue insertion sequence, so selection never depends on sort
//! stability.

use procsim_config::TierConfig;
use procsim_core::model::{Discipline, Pid, ReadyEntry};
use procsim_core::SimContext;

/// The process picked for the next dispatch and the tier that picked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub pid: Pid,
    pub discipline: Discipline,
}

/// Discipline for a ready set of `k` processes.
pub fn discipline_for(k: usize, tiers: &TierConfig) -> Discipline {
    if k <= tiers.shortest_remaining_max {
        Discipline::ShortestRemaining
    } else if k <= tiers.priority_max {
        Discipline::Priority
    } else {
        Discipline::RoundRobin
    }
}

/// Snapshot of the ready queue sorted under `discipline`. The queue itself is
/// left untouched.
pub fn order_candidates(ctx: &SimContext, discipline: Discipline) -> Vec<Pid> {
    let mut candidates: Vec<ReadyEntry> = ctx.ready.iter().copied().collect();
    match discipline {
        Discipline::ShortestRemaining => {
            candidates.sort_unstable_by_key(|e| (ctx.process(e.pid).remaining(), e.seq))
        }
        Discipline::Priority => {
            candidates.sort_unstable_by_key(|e| (ctx.process(e.pid).priority, e.seq))
        }
        Discipline::RoundRobin => candidates.sort_unstable_by_key(|e| e.seq),
    }
    candidates.into_iter().map(|e| e.pid).collect()
}

/// Front of the ordered candidate list, or `None` if nothing is ready.
pub fn select(ctx: &SimContext, tiers: &TierConfig) -> Option<Selection> {
    let discipline = discipline_for(ctx.ready.len(), tiers);
    let pid = *order_candidates(ctx, discipline).first()?;
    Some(Selection { pid, discipline })
}
