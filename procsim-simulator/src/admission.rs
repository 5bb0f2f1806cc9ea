//! Admission: arrived, unfinished processes join the back of the ready queue.

use tracing::trace;

use procsim_core::SimContext;

/// Admits every unfinished process with `arrival <= now` that is not already
/// queued, in ascending pid order. Returns how many were admitted.
pub fn admit_arrivals(ctx: &mut SimContext) -> usize {
    let now = ctx.clock.now();
    let mut admitted = 0;

    for pid in 0..ctx.processes.len() {
        let process = ctx.process(pid);
        if process.is_finished() || !process.has_arrived(now) {
            continue;
        }
        if ctx.ready.push_back(pid) {
            trace!(pid, time = now, "Admitted process");
            admitted += 1;
        }
    }
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use procsim_core::model::{Process, ResourceTable};

    fn context() -> SimContext {
        let processes = vec![
            Process::new(0, 2, 3, 0, vec![]),
            Process::new(1, 0, 3, 0, vec![]),
            Process::new(2, 0, 3, 0, vec![]),
        ];
        SimContext::new(processes, ResourceTable::new()).unwrap()
    }

    #[test]
    fn test_only_arrived_processes_are_admitted() {
        let mut ctx = context();
        assert_eq!(admit_arrivals(&mut ctx), 2);
        assert_eq!(ctx.ready.pids(), vec![1, 2]);

        ctx.clock.advance(2);
        assert_eq!(admit_arrivals(&mut ctx), 1);
        assert_eq!(ctx.ready.pids(), vec![1, 2, 0]);
    }

    #[test]
    fn test_admission_is_duplicate_free() {
        let mut ctx = context();
        admit_arrivals(&mut ctx);
        assert_eq!(admit_arrivals(&mut ctx), 0);
        assert_eq!(ctx.ready.len(), 2);
    }

    #[test]
    fn test_finished_processes_are_not_admitted() {
        let mut ctx = context();
        ctx.process_mut(1).terminate();
        admit_arrivals(&mut ctx);
        assert_eq!(ctx.ready.pids(), vec![2]);
    }
}
