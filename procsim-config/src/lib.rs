//! # procsim Configuration System
//!
//! Hierarchical configuration for the process simulator.
//!
//! ## Features
//! - **Layering**: defaults, then YAML, then `PROCSIM_*` environment variables
//! - **Validation**: every section is checked with `validator` before use
//! - **Workloads**: resource and process lists can live in the main file or in
//!   a file of their own

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

mod error;
mod simulation;
mod telemetry;
mod validation;
mod workload;

pub use error::ConfigError;
pub use simulation::{SimulationConfig, TierConfig};
pub use telemetry::TelemetryConfig;
pub use workload::{ProcessSpec, ResourceSpec, WorkloadConfig};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/procsim.yaml";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct ProcsimConfig {
    /// Dispatch loop parameters.
    #[serde(default)]
    #[validate(nested)]
    pub simulation: SimulationConfig,

    /// Resources and processes to simulate.
    #[serde(default)]
    #[validate(nested)]
    pub workload: WorkloadConfig,

    /// Logging and metrics.
    #[serde(default)]
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl ProcsimConfig {
    /// Load configuration from the default file and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/procsim.yaml`, if present
    /// 3. `PROCSIM_*` environment variables (`__` separates nesting levels)
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(ProcsimConfig::default()));

        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            figment = figment.merge(Yaml::file(DEFAULT_CONFIG_PATH));
        } else {
            debug!("{DEFAULT_CONFIG_PATH} not found, using default configuration");
        }

        Self::finish(figment)
    }

    /// Load configuration from a specific path, then the environment.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        let figment =
            Figment::from(Serialized::defaults(ProcsimConfig::default())).merge(Yaml::file(path));
        Self::finish(figment)
    }

    fn finish(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed("PROCSIM_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
