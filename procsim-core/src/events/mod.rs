//! ## procsim-core::events
//! **Append-only dispatch log**
//!
//! One entry per dispatch, in chronological order. The `(pid, duration)`
//! projection is the timeline handed to Gantt renderers.

use serde::{Deserialize, Serialize};

use crate::model::{Discipline, Pid};
use crate::time::Ticks;

/// One execution slice awarded to one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchEvent {
    pub pid: Pid,
    /// Clock value when the slice started.
    pub start: Ticks,
    pub duration: Ticks,
    /// Tier that selected the process.
    pub discipline: Discipline,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<DispatchEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: DispatchEvent) {
        debug_assert!(
            self.events
                .last()
                .map_or(true, |prev| prev.start + prev.duration <= event.start),
            "Dispatch events must be recorded in chronological order"
        );
        self.events.push(event);
    }

    /// `(pid, duration)` pairs in dispatch order.
    pub fn timeline(&self) -> impl Iterator<Item = (Pid, Ticks)> + '_ {
        self.events.iter().map(|e| (e.pid, e.duration))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DispatchEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[DispatchEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
