//! ## procsim-detection::exhausted
//! **Exhausted-request heuristic**
//!
//! Flags every unfinished process that declared a request against a resource
//! whose pool currently has zero free units. This is not a circular-wait check:
//! nobody holding the resource is consulted, and a pool that would refill on
//! its own still counts. Detection counts and termination timing depend on
//! this exact rule.

use std::collections::BTreeSet;

use tracing::warn;

use procsim_core::SimContext;

use crate::{DeadlockDetector, DeadlockReport};

#[derive(Debug, Default, Clone, Copy)]
pub struct ExhaustedRequestDetector;

impl DeadlockDetector for ExhaustedRequestDetector {
    fn detect(&self, ctx: &SimContext) -> Option<DeadlockReport> {
        let mut waiting = BTreeSet::new();
        let mut exhausted = BTreeSet::new();

        for (pid, rids) in ctx.requests.iter() {
            if ctx.process(pid).is_finished() {
                continue;
            }
            for &rid in rids {
                if ctx.resources.is_exhausted(rid) {
                    waiting.insert(pid);
                    exhausted.insert(rid);
                }
            }
        }

        if waiting.is_empty() {
            return None;
        }

        let report = DeadlockReport {
            time: ctx.clock.now(),
            waiting: waiting.into_iter().collect(),
            exhausted: exhausted.into_iter().collect(),
        };
        warn!(
            time = report.time,
            waiting = ?report.waiting,
            exhausted = ?report.exhausted,
            "Deadlock detected among processes"
        );
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procsim_core::model::{Process, Resource, ResourceTable};
    use tracing_test::traced_test;

    fn context(processes: Vec<Process>, resources: Vec<Resource>) -> SimContext {
        let table: ResourceTable = resources.into_iter().collect();
        SimContext::new(processes, table).unwrap()
    }

    #[test]
    fn test_available_pool_is_not_flagged() {
        let ctx = context(
            vec![
                Process::new(0, 0, 4, 1, vec![0]),
                Process::new(1, 0, 4, 2, vec![0]),
            ],
            vec![Resource::new(0, 1)],
        );
        assert!(ExhaustedRequestDetector.detect(&ctx).is_none());
    }

    #[traced_test]
    #[test]
    fn test_exhausted_pool_flags_every_requester() {
        let mut ctx = context(
            vec![
                Process::new(0, 0, 4, 1, vec![1]),
                Process::new(1, 0, 4, 2, vec![0, 1]),
                Process::new(2, 0, 4, 2, vec![0]),
            ],
            vec![Resource::new(0, 2), Resource::new(1, 1)],
        );
        ctx.resources.set_available(1, 0).unwrap();

        let report = ExhaustedRequestDetector.detect(&ctx).unwrap();
        assert_eq!(report.waiting, vec![0, 1]);
        assert_eq!(report.exhausted, vec![1]);
        assert!(logs_contain("Deadlock detected among processes"));
    }

    #[test]
    fn test_finished_requesters_are_ignored() {
        let mut ctx = context(
            vec![
                Process::new(0, 0, 4, 1, vec![0]),
                Process::new(1, 0, 4, 2, vec![]),
            ],
            vec![Resource::new(0, 1)],
        );
        ctx.resources.set_available(0, 0).unwrap();
        ctx.process_mut(0).terminate();
        assert!(ExhaustedRequestDetector.detect(&ctx).is_none());
    }

    #[test]
    fn test_unknown_resource_counts_as_exhausted() {
        let ctx = context(vec![Process::new(0, 0, 1, 0, vec![5])], vec![]);
        let report = ExhaustedRequestDetector.detect(&ctx).unwrap();
        assert_eq!(report.waiting, vec![0]);
        assert_eq!(report.exhausted, vec![5]);
    }
}
