//! Prometheus-backed metrics adapters, available with the `metrics` feature.

mod prometheus_generation;

pub use prometheus_generation::PrometheusGenerationMetrics;
