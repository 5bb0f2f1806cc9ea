//! # procsim-core
//!
//! Foundation layer for the process simulator: the entities that live for the
//! whole run and the owned context that every phase of the dispatch loop works on.
//!
//! ### Key Submodules:
//! - `model`: processes, resources, request/allocation tables, the ready queue
//! - `events`: append-only dispatch log consumed by timeline renderers
//! - `time`: `VirtualClock` counting integer ticks
//! - `context`: `SimContext`, the single owner of all simulation state

pub mod context;
pub mod error;
pub mod events;
pub mod model;
pub mod time;

pub mod prelude {
    pub use crate::context::*;
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::model::*;
    pub use crate::time::*;
}

pub use context::{Counters, SimContext};
pub use error::SimulationError;
