//! Port for answer feedback persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Feedback, FeedbackId, QuestionId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by feedback repository adapters.
    pub enum FeedbackRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "feedback repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "feedback repository query failed: {message}",
    }
}

/// Storage for generated feedback.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Insert a feedback row, normally a placeholder with empty text.
    async fn insert(&self, feedback: &Feedback) -> Result<(), FeedbackRepositoryError>;

    /// Replace the text of the feedback with `id`.
    ///
    /// Returns `false` when no row matched the id.
    async fn finalize(
        &self,
        id: FeedbackId,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, FeedbackRepositoryError>;

    /// List the feedback recorded for a question in creation order.
    async fn list_for_question(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<Feedback>, FeedbackRepositoryError>;
}

/// Fixture repository that accepts writes and stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFeedbackRepository;

#[async_trait]
impl FeedbackRepository for FixtureFeedbackRepository {
    async fn insert(&self, _feedback: &Feedback) -> Result<(), FeedbackRepositoryError> {
        Ok(())
    }

    async fn finalize(
        &self,
        _id: FeedbackId,
        _text: &str,
        _updated_at: DateTime<Utc>,
    ) -> Result<bool, FeedbackRepositoryError> {
        Ok(true)
    }

    async fn list_for_question(
        &self,
        _question_id: QuestionId,
    ) -> Result<Vec<Feedback>, FeedbackRepositoryError> {
        Ok(Vec::new())
    }
}
