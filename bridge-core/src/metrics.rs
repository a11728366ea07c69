//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the bridge.
//!
//! # Metrics
//!
//! - `bridge_deposits_total` - Accepted balance deposits
//! - `bridge_liquidity_adds_total` - Accepted liquidity additions
//! - `bridge_transfers_initiated_total` - Accepted transfer initiations
//! - `bridge_transfers_completed_total` - Accepted transfer completions
//! - `bridge_operations_rejected_total` - Operations rejected by validation
//! - `bridge_operation_duration_seconds` - Histogram of operation latencies
//! - `bridge_paused` - Pause flag gauge (0/1)

use prometheus::{Histogram, HistogramOpts, IntCounter, IntGauge, Registry};
use std::sync::Arc;

/// Metrics collector
///
/// Each collector owns its registry, so independent bridge instances (and
/// tests) never collide on metric names.
#[derive(Clone)]
pub struct Metrics {
    /// Accepted deposits
    pub deposits_total: IntCounter,

    /// Accepted liquidity additions
    pub liquidity_adds_total: IntCounter,

    /// Accepted transfer initiations
    pub transfers_initiated_total: IntCounter,

    /// Accepted transfer completions
    pub transfers_completed_total: IntCounter,

    /// Operations rejected by the validation gate
    pub operations_rejected_total: IntCounter,

    /// Operation duration histogram
    pub operation_duration: Histogram,

    /// Pause flag gauge
    pub paused: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let deposits_total =
            IntCounter::new("bridge_deposits_total", "Accepted balance deposits")?;
        registry.register(Box::new(deposits_total.clone()))?;

        let liquidity_adds_total = IntCounter::new(
            "bridge_liquidity_adds_total",
            "Accepted liquidity additions",
        )?;
        registry.register(Box::new(liquidity_adds_total.clone()))?;

        let transfers_initiated_total = IntCounter::new(
            "bridge_transfers_initiated_total",
            "Accepted transfer initiations",
        )?;
        registry.register(Box::new(transfers_initiated_total.clone()))?;

        let transfers_completed_total = IntCounter::new(
            "bridge_transfers_completed_total",
            "Accepted transfer completions",
        )?;
        registry.register(Box::new(transfers_completed_total.clone()))?;

        let operations_rejected_total = IntCounter::new(
            "bridge_operations_rejected_total",
            "Operations rejected by validation",
        )?;
        registry.register(Box::new(operations_rejected_total.clone()))?;

        let operation_duration = Histogram::with_opts(
            HistogramOpts::new(
                "bridge_operation_duration_seconds",
                "Histogram of operation latencies",
            )
            .buckets(vec![0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500]),
        )?;
        registry.register(Box::new(operation_duration.clone()))?;

        let paused = IntGauge::new("bridge_paused", "Pause flag gauge (0/1)")?;
        registry.register(Box::new(paused.clone()))?;

        Ok(Self {
            deposits_total,
            liquidity_adds_total,
            transfers_initiated_total,
            transfers_completed_total,
            operations_rejected_total,
            operation_duration,
            paused,
            registry,
        })
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
