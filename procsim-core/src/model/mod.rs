//! ## procsim-core::model
//! **Registries and tables owned by the simulation loop**
//!
//! - `process`: per-process parameters and write-once timing statistics
//! - `resource`: typed resource pools with fixed capacity
//! - `tables`: request table (declared needs) and allocation table (held units)
//! - `ready`: FIFO ready queue with explicit insertion sequence numbers
//! - `discipline`: the scheduling tiers a dispatch can be selected under

pub mod discipline;
pub mod process;
pub mod ready;
pub mod resource;
pub mod tables;

pub use discipline::Discipline;
pub use process::{Outcome, Pid, Priority, Process};
pub use ready::{ReadyEntry, ReadyQueue};
pub use resource::{Resource, ResourceTable, Rid};
pub use tables::{AllocationTable, RequestTable};
