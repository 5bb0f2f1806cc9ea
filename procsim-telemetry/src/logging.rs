//! ## procsim-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies.

use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber at `info` unless `RUST_LOG` says otherwise.
    pub fn init() {
        Self::init_with_level("info")
    }

    /// Installs the global subscriber with `level` as the fallback filter.
    /// Calling it twice is harmless; the second subscriber is dropped.
    pub fn init_with_level(level: &str) {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
            )
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE)
            .try_init();
    }

    /// Emits a one-line summary of a finished run.
    pub fn log_run_summary(label: &str, dispatches: u64, deadlocks: u64, final_time: u64) {
        let span = info_span!("simulation_run", label = label);
        let _guard = span.enter();
        tracing::info!(dispatches, deadlocks, final_time, "Simulation finished");
    }
}
