use std::collections::VecDeque;

use super::process::Pid;

/// A ready-queue slot. `seq` grows with every insertion, so ordering by it
/// reproduces arrival-to-ready order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyEntry {
    pub pid: Pid,
    pub seq: u64,
}

/// Duplicate-free FIFO of processes waiting for dispatch.
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    entries: VecDeque<ReadyEntry>,
    next_seq: u64,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `pid` at the back. Returns `false` if it is already queued.
    pub fn push_back(&mut self, pid: Pid) -> bool {
        if self.contains(pid) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(ReadyEntry { pid, seq });
        true
    }

    /// Removes `pid`, keeping every other entry in place.
    pub fn remove(&mut self, pid: Pid) -> Option<ReadyEntry> {
        let index = self.entries.iter().position(|e| e.pid == pid)?;
        self.entries.remove(index)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.entries.iter().any(|e| e.pid == pid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReadyEntry> {
        self.entries.iter()
    }

    pub fn pids(&self) -> Vec<Pid> {
        self.entries.iter().map(|e| e.pid).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
