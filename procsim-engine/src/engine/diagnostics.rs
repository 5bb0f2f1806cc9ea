use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use procsim_config::WorkloadConfig;

use super::EngineError;

/// Everything needed to reproduce a failing fuzz case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugReport {
    pub seed: u64,
    pub quantum: u64,
    pub generated_at: DateTime<Utc>,
    pub violations: Vec<String>,
    pub workload: WorkloadConfig,
}

/// Writes bug reports for failing fuzz cases.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsCollector {
    output_dir: PathBuf,
}

impl DiagnosticsCollector {
    /// Bug reports are written under `output_dir`.
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn record_bug_report(&self, report: &BugReport) -> Result<PathBuf, EngineError> {
        fs::create_dir_all(&self.output_dir)?;
        let filename = format!(
            "bug_report_{}_{}.yaml",
            report.seed,
            report.generated_at.format("%Y%m%dT%H%M%S")
        );
        let path = self.output_dir.join(filename);
        fs::write(&path, serde_yaml::to_string(report)?)?;

        warn!(seed = report.seed, path = %path.display(), "Bug report written");
        Ok(path)
    }
}
