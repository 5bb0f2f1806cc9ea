//! ## procsim-telemetry::metrics
//! **Prometheus counters and histograms for simulation runs**

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub dispatches: IntCounter,
    pub idle_ticks: IntCounter,
    pub completions: IntCounter,
    pub deadlocks: IntCounter,
    pub terminations: IntCounter,
    pub slice_length: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let dispatches = IntCounter::new("procsim_dispatches_total", "Slices dispatched")?;
        let idle_ticks = IntCounter::new("procsim_idle_ticks_total", "Ticks with an empty ready set")?;
        let completions =
            IntCounter::new("procsim_completions_total", "Processes that ran to completion")?;
        let deadlocks = IntCounter::new("procsim_deadlocks_total", "Detection events")?;
        let terminations =
            IntCounter::new("procsim_terminations_total", "Processes terminated by the resolver")?;
        let slice_length = Histogram::with_opts(
            HistogramOpts::new("procsim_slice_ticks", "Length of each dispatched slice")
                .buckets(vec![1.0, 2.0, 3.0, 5.0, 8.0, 13.0]),
        )?;

        registry.register(Box::new(dispatches.clone()))?;
        registry.register(Box::new(idle_ticks.clone()))?;
        registry.register(Box::new(completions.clone()))?;
        registry.register(Box::new(deadlocks.clone()))?;
        registry.register(Box::new(terminations.clone()))?;
        registry.register(Box::new(slice_length.clone()))?;

        Ok(Self {
            registry,
            dispatches,
            idle_ticks,
            completions,
            deadlocks,
            terminations,
            slice_length,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    #[inline]
    pub fn record_dispatch(&self, slice: u64) {
        self.dispatches.inc();
        self.slice_length.observe(slice as f64);
    }
}
