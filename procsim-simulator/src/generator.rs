//! Seeded random workloads.
//!
//! The same seed and parameters always produce the same workload, so a
//! failing fuzz case can be reproduced from its seed alone.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use procsim_config::{ProcessSpec, ResourceSpec, WorkloadConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorParams {
    pub processes: usize,
    pub resources: usize,
    /// Arrivals are drawn from `0..=max_arrival`.
    pub max_arrival: u64,
    /// Bursts are drawn from `1..=max_burst`.
    pub max_burst: u64,
    /// Priorities are drawn from `0..=max_priority`.
    pub max_priority: i32,
    /// Pool capacities are drawn from `1..=max_units`.
    pub max_units: u32,
    /// Each process requests up to this many distinct resources.
    pub max_requests: usize,
    /// Chance that a pool starts with no free units.
    pub exhausted_probability: f64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            processes: 8,
            resources: 3,
            max_arrival: 10,
            max_burst: 10,
            max_priority: 5,
            max_units: 3,
            max_requests: 2,
            exhausted_probability: 0.0,
        }
    }
}

pub fn generate_workload(seed: u64, params: &GeneratorParams) -> WorkloadConfig {
    let mut rng = StdRng::seed_from_u64(seed);
    let exhausted_probability = params.exhausted_probability.clamp(0.0, 1.0);

    let resources = (0..params.resources)
        .map(|_| {
            let total = rng.random_range(1..=params.max_units.max(1));
            let available = rng.random_bool(exhausted_probability).then_some(0);
            ResourceSpec { total, available }
        })
        .collect();

    let processes = (0..params.processes)
        .map(|_| {
            let arrival = rng.random_range(0..=params.max_arrival);
            let burst = rng.random_range(1..=params.max_burst.max(1));
            let priority = rng.random_range(0..=params.max_priority.max(0));
            let wanted = rng.random_range(0..=params.max_requests.min(params.resources));
            let mut requested = index::sample(&mut rng, params.resources, wanted).into_vec();
            requested.sort_unstable();
            ProcessSpec {
                arrival,
                burst,
                priority,
                resources: requested,
            }
        })
        .collect();

    WorkloadConfig {
        resources,
        processes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_same_seed_same_workload() {
        let params = GeneratorParams::default();
        assert_eq!(generate_workload(7, &params), generate_workload(7, &params));
    }

    #[test]
    fn test_generated_workload_validates() {
        let params = GeneratorParams {
            processes: 20,
            resources: 4,
            exhausted_probability: 0.5,
            ..GeneratorParams::default()
        };
        for seed in 0..16 {
            let workload = generate_workload(seed, &params);
            assert_eq!(workload.processes.len(), 20);
            assert_eq!(workload.resources.len(), 4);
            workload.validate().expect("Generated workload should validate");
        }
    }

    #[test]
    fn test_no_resources_means_no_requests() {
        let params = GeneratorParams {
            resources: 0,
            ..GeneratorParams::default()
        };
        let workload = generate_workload(1, &params);
        assert!(workload.processes.iter().all(|p| p.resources.is_empty()));
    }
}
