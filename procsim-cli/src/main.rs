//! ## procsim
//! Command-line frontend for the process scheduling simulator: run a workload,
//! fuzz generated workloads, or write a generated workload to disk.

use clap::Parser;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    commands::run_command(cli).await
}
