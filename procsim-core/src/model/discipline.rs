use std::fmt;

use serde::{Deserialize, Serialize};

/// Scheduling discipline applied to the ready set for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    /// Ascending remaining execution time.
    ShortestRemaining,
    /// Ascending priority value.
    Priority,
    /// Arrival-to-ready order, no reordering.
    RoundRobin,
}

impl Discipline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortestRemaining => "srt",
            Self::Priority => "priority",
            Self::RoundRobin => "rr",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
