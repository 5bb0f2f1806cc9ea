use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::process::{Pid, Process};
use super::resource::Rid;

/// Resources each process declared at creation. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTable {
    requests: BTreeMap<Pid, Vec<Rid>>,
}

impl RequestTable {
    /// Builds the table from the process registry. Processes that request
    /// nothing get no entry.
    pub fn from_processes(processes: &[Process]) -> Self {
        let requests = processes
            .iter()
            .filter(|p| !p.resources_requested.is_empty())
            .map(|p| (p.pid, p.resources_requested.clone()))
            .collect();
        Self { requests }
    }

    pub fn get(&self, pid: Pid) -> Option<&[Rid]> {
        self.requests.get(&pid).map(Vec::as_slice)
    }

    /// Entries in ascending pid order.
    pub fn iter(&self) -> impl Iterator<Item = (Pid, &[Rid])> {
        self.requests.iter().map(|(pid, rids)| (*pid, rids.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Resources each process currently holds.
///
/// The dispatch loop never acquires or releases units, so this stays empty for
/// a whole run. It is kept as a data surface for graph renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationTable {
    held: BTreeMap<Pid, Vec<Rid>>,
}

impl AllocationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pid: Pid) -> Option<&[Rid]> {
        self.held.get(&pid).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pid, &[Rid])> {
        self.held.iter().map(|(pid, rids)| (*pid, rids.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

impl FromIterator<(Pid, Vec<Rid>)> for AllocationTable {
    fn from_iter<I: IntoIterator<Item = (Pid, Vec<Rid>)>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_table_skips_empty_requests() {
        let processes = vec![
            Process::new(0, 0, 1, 0, vec![1, 0]),
            Process::new(1, 0, 1, 0, vec![]),
            Process::new(2, 0, 1, 0, vec![2]),
        ];
        let table = RequestTable::from_processes(&processes);
        let entries: Vec<_> = table.iter().map(|(pid, rids)| (pid, rids.to_vec())).collect();
        assert_eq!(entries, vec![(0, vec![1, 0]), (2, vec![2])]);
        assert!(table.get(1).is_none());
    }

    #[test]
    fn test_allocation_table_starts_empty() {
        assert!(AllocationTable::new().is_empty());
    }
}
