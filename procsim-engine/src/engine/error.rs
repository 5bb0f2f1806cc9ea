use thiserror::Error;
use tokio::task::JoinError;

use procsim_config::ConfigError;
use procsim_core::SimulationError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation setup error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("State hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed: {0}")]
    Join(#[from] JoinError),
}
