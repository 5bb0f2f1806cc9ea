//! Dispatch: one bounded slice for the selected process.

use tracing::{debug, trace};

use procsim_core::events::DispatchEvent;
use procsim_core::time::Ticks;
use procsim_core::SimContext;

use crate::scheduler::Selection;

/// Runs `selection.pid` for `min(quantum, remaining)` ticks.
///
/// The process leaves the ready queue for the slice. If work remains it goes
/// back to the tail, whichever tier picked it; otherwise its statistics are
/// finalized and it joins the finished-order list.
pub fn dispatch(ctx: &mut SimContext, selection: Selection, quantum: Ticks) -> DispatchEvent {
    let Selection { pid, discipline } = selection;
    ctx.ready.remove(pid);

    let start = ctx.clock.now();
    let slice = ctx.process_mut(pid).execute(quantum);
    ctx.clock.advance(slice);
    ctx.counters.context_switches += 1;

    let event = DispatchEvent {
        pid,
        start,
        duration: slice,
        discipline,
    };
    ctx.event_log.record(event);
    trace!(pid, start, slice, %discipline, "Dispatched slice");

    let now = ctx.clock.now();
    let process = ctx.process_mut(pid);
    if process.remaining() == 0 {
        process.complete(now);
        debug!(
            pid,
            finish = process.finish_time(),
            waiting = process.waiting(),
            turnaround = process.turnaround(),
            "Process completed"
        );
        ctx.finished_order.push(pid);
    } else {
        ctx.ready.push_back(pid);
    }
    event
}
