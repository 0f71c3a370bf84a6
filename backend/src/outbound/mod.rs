//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **cache**: in-process tagged read-model cache
//! - **identity**: session-token verification and claim-based grants
//! - **generation**: streaming Gemini text generation
//! - **metrics**: Prometheus exporters (feature-gated)
//!
//! Adapters translate between domain types and infrastructure representations
//! and contain no business logic.

pub mod cache;
pub mod generation;
pub mod identity;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
