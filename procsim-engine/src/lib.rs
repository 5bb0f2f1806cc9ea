pub mod engine;
pub mod report;
pub mod runtime;

// Re-export the runtime functions so frontends can simply do:
pub use runtime::{
    check_invariants, load_run_config, run_fuzz_mode, run_simulation_mode, save_scenario,
    FuzzOptions, FuzzSummary, SimulateOptions,
};
