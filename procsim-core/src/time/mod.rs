//! ## procsim-core::time
//! **Virtual clock for the dispatch loop**
//!
//! Time is a plain integer tick counter owned by the simulation context.
//! It only ever moves forward: by one tick when nothing is ready, or by the
//! length of the slice that was just executed.

/// Simulation time unit.
pub type Ticks = u64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualClock {
    now: Ticks,
}

impl VirtualClock {
    /// Creates a clock starting at `start`.
    pub fn new(start: Ticks) -> Self {
        Self { now: start }
    }

    #[inline]
    pub fn now(&self) -> Ticks {
        self.now
    }

    /// Advances the clock by `delta` ticks.
    #[inline]
    pub fn advance(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    /// Idle tick.
    #[inline]
    pub fn tick(&mut self) {
        self.advance(1);
    }
}
