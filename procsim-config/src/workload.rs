//! Workload description: the resources and processes of one run.
//!
//! Resource ids and pids are positions in the respective lists.

use std::path::{Path, PathBuf};

use figment::providers::{Format, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;
use crate::ConfigError;

#[derive(Debug, Default, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
#[validate(schema(function = validation::validate_workload))]
pub struct WorkloadConfig {
    /// Resource pools; the index is the rid.
    #[serde(default)]
    pub resources: Vec<ResourceSpec>,

    /// Processes; the index is the pid.
    #[serde(default)]
    #[validate(nested)]
    pub processes: Vec<ProcessSpec>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Capacity of the pool.
    pub total: u32,
    /// Free units at start; defaults to `total`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    #[serde(default)]
    pub arrival: u64,

    #[validate(range(min = 1, message = "burst must be at least one tick"))]
    pub burst: u64,

    /// Lower value means higher precedence.
    #[serde(default)]
    pub priority: i32,

    /// Rids this process declares it needs.
    #[serde(default)]
    pub resources: Vec<usize>,
}

impl WorkloadConfig {
    /// Load a workload file on its own.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Figment::new()
            .merge(Yaml::file(path))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|workload: Self| {
                workload.validate()?;
                Ok(workload)
            })
    }

    /// Write the workload as YAML.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}
