use thiserror::Error;

use crate::model::{Pid, Rid};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Quantum must be at least one tick")]
    ZeroQuantum,

    #[error("Invalid tier thresholds: shortest-remaining max {shortest_remaining_max} must be below priority max {priority_max}")]
    InvalidTiers {
        shortest_remaining_max: usize,
        priority_max: usize,
    },

    #[error("Process at index {index} carries pid {pid}")]
    PidMismatch { index: usize, pid: Pid },

    #[error("Unknown resource R{0}")]
    UnknownResource(Rid),

    #[error("Resource R{rid} cannot have {available} of {total} units available")]
    CapacityExceeded { rid: Rid, available: u32, total: u32 },
}
