// procsim-simulator/src/lib.rs

/*!
# procsim Simulator

Deterministic discrete-time simulation of cooperative multitasking over a fixed
set of processes and typed resource pools.

## Key Components:
- **Admission:** moves arrived processes into the ready queue.
- **Scheduler:** picks the next process, switching discipline with the size of
  the ready set (shortest remaining, priority, round robin).
- **Dispatch:** runs one bounded slice and finalizes statistics on completion.
- **Detection & Resolution:** pluggable passes that run after every dispatch.
- **Report:** final statistics, dispatch log and a BLAKE3 state hash used to
  check that a replay is identical.
- **Generator:** seeded random workloads for fuzzing and benchmarks.
*/

pub mod admission;
pub mod dispatch;
pub mod generator;
pub mod report;
pub mod scheduler;
pub mod simulation;

pub use generator::{generate_workload, GeneratorParams};
pub use report::{DeadlockRecord, SimulationReport};
pub use scheduler::Selection;
pub use simulation::{Simulation, Step};
