//! Port for question persistence, including the placeholder/finalize pair.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{JobInfoId, Question, QuestionId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by question repository adapters.
    pub enum QuestionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "question repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "question repository query failed: {message}",
    }
}

/// Storage for generated questions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Insert a question row, normally a placeholder with empty text.
    async fn insert(&self, question: &Question) -> Result<(), QuestionRepositoryError>;

    /// Replace the text of the question with `id`.
    ///
    /// Returns `false` when no row matched the id.
    async fn finalize(
        &self,
        id: QuestionId,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, QuestionRepositoryError>;

    /// Find a question by id.
    async fn find_by_id(&self, id: QuestionId) -> Result<Option<Question>, QuestionRepositoryError>;

    /// List the questions of a job context in creation order.
    async fn list_for_job_info(
        &self,
        job_info_id: JobInfoId,
    ) -> Result<Vec<Question>, QuestionRepositoryError>;
}

/// Fixture repository that accepts writes and stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureQuestionRepository;

#[async_trait]
impl QuestionRepository for FixtureQuestionRepository {
    async fn insert(&self, _question: &Question) -> Result<(), QuestionRepositoryError> {
        Ok(())
    }

    async fn finalize(
        &self,
        _id: QuestionId,
        _text: &str,
        _updated_at: DateTime<Utc>,
    ) -> Result<bool, QuestionRepositoryError> {
        Ok(true)
    }

    async fn find_by_id(
        &self,
        _id: QuestionId,
    ) -> Result<Option<Question>, QuestionRepositoryError> {
        Ok(None)
    }

    async fn list_for_job_info(
        &self,
        _job_info_id: JobInfoId,
    ) -> Result<Vec<Question>, QuestionRepositoryError> {
        Ok(Vec::new())
    }
}
