/*
 * Prometheus metrics for aggregation passes
 */

use crate::models::{Protocol, Result};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    passes: IntCounterVec,
    fetch_failures: IntCounterVec,
    skipped_records: IntCounterVec,
    pass_duration: HistogramVec,
    pools_emitted: IntGaugeVec,
}

#[derive(Debug, Clone, Copy)]
pub enum PassOutcome {
    Success,
    Failure,
}

impl PassOutcome {
    fn as_str(self) -> &'static str {
        match self {
            PassOutcome::Success => "success",
            PassOutcome::Failure => "failure",
        }
    }
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let passes = IntCounterVec::new(
            Opts::new("yield_lens_passes_total", "Aggregation passes by outcome"),
            &["protocol", "outcome"],
        )?;
        let fetch_failures = IntCounterVec::new(
            Opts::new(
                "yield_lens_fetch_failures_total",
                "Pool or market fetches that failed and were skipped",
            ),
            &["protocol"],
        )?;
        let skipped_records = IntCounterVec::new(
            Opts::new(
                "yield_lens_skipped_records_total",
                "Raw records dropped before reaching the output",
            ),
            &["protocol", "reason"],
        )?;
        let pass_duration = HistogramVec::new(
            HistogramOpts::new(
                "yield_lens_pass_duration_seconds",
                "Wall time of one aggregation pass",
            ),
            &["protocol"],
        )?;
        let pools_emitted = IntGaugeVec::new(
            Opts::new("yield_lens_pools_emitted", "Pools returned by the last pass"),
            &["protocol"],
        )?;

        registry.register(Box::new(passes.clone()))?;
        registry.register(Box::new(fetch_failures.clone()))?;
        registry.register(Box::new(skipped_records.clone()))?;
        registry.register(Box::new(pass_duration.clone()))?;
        registry.register(Box::new(pools_emitted.clone()))?;

        Ok(Self {
            registry,
            passes,
            fetch_failures,
            skipped_records,
            pass_duration,
            pools_emitted,
        })
    }

    pub fn record_pass(&self, protocol: Protocol, outcome: PassOutcome, seconds: f64) {
        self.passes
            .with_label_values(&[protocol.as_str(), outcome.as_str()])
            .inc();
        self.pass_duration
            .with_label_values(&[protocol.as_str()])
            .observe(seconds);
    }

    #[allow(clippy::cast_possible_wrap)]
    pub fn record_emitted(&self, protocol: Protocol, count: usize) {
        self.pools_emitted
            .with_label_values(&[protocol.as_str()])
            .set(count as i64);
    }

    pub fn record_fetch_failure(&self, protocol: Protocol) {
        self.fetch_failures
            .with_label_values(&[protocol.as_str()])
            .inc();
    }

    pub fn record_skipped(&self, protocol: Protocol, reason: &str) {
        self.skipped_records
            .with_label_values(&[protocol.as_str(), reason])
            .inc();
    }

    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
