//! Prometheus adapter for generation outcome metrics.
//!
//! # Metrics
//!
//! - `darasa_generation_finalized_total{kind}`: placeholders finalized with
//!   generated text.
//! - `darasa_generation_abandoned_total{kind}`: placeholders left unresolved
//!   after a failed stream or finalize.
//!
//! `kind` is `question` or `feedback`.

use async_trait::async_trait;
use prometheus::{CounterVec, Opts, Registry};

use crate::domain::ports::{GeneratedContent, GenerationMetrics, GenerationMetricsError};

/// Prometheus-backed generation metrics recorder.
pub struct PrometheusGenerationMetrics {
    finalized_total: CounterVec,
    abandoned_total: CounterVec,
}

impl PrometheusGenerationMetrics {
    /// Create and register the counters with `registry`.
    ///
    /// # Errors
    ///
    /// Fails when a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let finalized_total = CounterVec::new(
            Opts::new(
                "darasa_generation_finalized_total",
                "Generated records finalized by kind",
            ),
            &["kind"],
        )?;
        let abandoned_total = CounterVec::new(
            Opts::new(
                "darasa_generation_abandoned_total",
                "Generated records left as placeholders by kind",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(finalized_total.clone()))?;
        registry.register(Box::new(abandoned_total.clone()))?;
        Ok(Self {
            finalized_total,
            abandoned_total,
        })
    }
}

#[async_trait]
impl GenerationMetrics for PrometheusGenerationMetrics {
    async fn record_finalized(&self, kind: GeneratedContent) -> Result<(), GenerationMetricsError> {
        self.finalized_total.with_label_values(&[kind.as_str()]).inc();
        Ok(())
    }

    async fn record_abandoned(&self, kind: GeneratedContent) -> Result<(), GenerationMetricsError> {
        self.abandoned_total.with_label_values(&[kind.as_str()]).inc();
        Ok(())
    }
}
