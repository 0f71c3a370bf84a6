//! Port for recording generation outcomes.
//!
//! Implementations may export to Prometheus or discard the events; the
//! orchestrator never fails a generation because recording failed.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording generation metrics.
    pub enum GenerationMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "generation metrics exporter failed: {message}",
    }
}

/// Kind of generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratedContent {
    Question,
    Feedback,
}

impl GeneratedContent {
    /// Label value used by exporters and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Feedback => "feedback",
        }
    }
}

/// Records whether placeholders were finalized or abandoned.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationMetrics: Send + Sync {
    /// A placeholder received its final text.
    async fn record_finalized(&self, kind: GeneratedContent)
    -> Result<(), GenerationMetricsError>;

    /// A placeholder was left unresolved because generation failed.
    async fn record_abandoned(&self, kind: GeneratedContent)
    -> Result<(), GenerationMetricsError>;
}

/// No-op implementation for when metrics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpGenerationMetrics;

#[async_trait]
impl GenerationMetrics for NoOpGenerationMetrics {
    async fn record_finalized(
        &self,
        _kind: GeneratedContent,
    ) -> Result<(), GenerationMetricsError> {
        Ok(())
    }

    async fn record_abandoned(
        &self,
        _kind: GeneratedContent,
    ) -> Result<(), GenerationMetricsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_accepts_both_outcomes() {
        let metrics = NoOpGenerationMetrics;
        assert!(metrics.record_finalized(GeneratedContent::Question).await.is_ok());
        assert!(metrics.record_abandoned(GeneratedContent::Feedback).await.is_ok());
    }

    #[test]
    fn error_constructor_accepts_str() {
        let err = GenerationMetricsError::export("registry closed");
        assert_eq!(
            err.to_string(),
            "generation metrics exporter failed: registry closed"
        );
    }
}
