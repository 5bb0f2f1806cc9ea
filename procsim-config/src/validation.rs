//! Custom validation functions for configuration.

use std::borrow::Cow;

use validator::ValidationError;

use crate::simulation::TierConfig;
use crate::workload::WorkloadConfig;

/// Tier thresholds must leave the priority tier non-empty.
pub fn validate_tiers(tiers: &TierConfig) -> Result<(), ValidationError> {
    if tiers.shortest_remaining_max < tiers.priority_max {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_tiers")
            .with_message(Cow::from("shortest_remaining_max must be below priority_max")))
    }
}

/// Every requested rid must name a declared resource, and no pool may start
/// with more free units than it has.
pub fn validate_workload(workload: &WorkloadConfig) -> Result<(), ValidationError> {
    for (rid, resource) in workload.resources.iter().enumerate() {
        if resource.available.is_some_and(|a| a > resource.total) {
            return Err(ValidationError::new("available_exceeds_total").with_message(Cow::from(
                format!("resource {rid} declares more available units than its total"),
            )));
        }
    }

    let count = workload.resources.len();
    for (pid, process) in workload.processes.iter().enumerate() {
        if let Some(rid) = process.resources.iter().find(|&&rid| rid >= count) {
            return Err(ValidationError::new("unknown_resource").with_message(Cow::from(
                format!("process {pid} requests undeclared resource {rid}"),
            )));
        }
    }
    Ok(())
}

/// Validate a tracing level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error"].contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}
