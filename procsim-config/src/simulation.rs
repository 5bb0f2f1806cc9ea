//! Dispatch loop parameters.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Parameters of the dispatch loop.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Maximum slice length per dispatch, in ticks.
    #[serde(default = "default_quantum")]
    #[validate(range(min = 1, message = "quantum must be at least one tick"))]
    pub quantum: u64,

    /// Ready-set sizes at which the scheduler switches discipline.
    #[serde(default)]
    #[validate(nested)]
    pub tiers: TierConfig,
}

fn default_quantum() -> u64 {
    3
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            quantum: default_quantum(),
            tiers: TierConfig::default(),
        }
    }
}

/// Up to `shortest_remaining_max` ready processes: shortest remaining first.
/// Up to `priority_max`: priority. Beyond that: round robin.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, Copy, PartialEq, Eq)]
#[validate(schema(function = validation::validate_tiers))]
pub struct TierConfig {
    #[serde(default = "default_shortest_remaining_max")]
    pub shortest_remaining_max: usize,

    #[serde(default = "default_priority_max")]
    pub priority_max: usize,
}

fn default_shortest_remaining_max() -> usize {
    2
}

fn default_priority_max() -> usize {
    5
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            shortest_remaining_max: default_shortest_remaining_max(),
            priority_max: default_priority_max(),
        }
    }
}
