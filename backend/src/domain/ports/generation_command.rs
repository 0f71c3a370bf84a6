//! Driving port for streamed question and feedback generation.
//!
//! Callers receive the placeholder id as soon as the record is durable and
//! then consume the body stream. The stream ends only after the record has
//! been finalized (or the failure has been reported as its last item).

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use uuid::Uuid;

use crate::domain::{Error, Principal, QuestionDifficulty, QuestionId, JobInfoId};

use super::TextGenerationError;

/// Request to generate a question for a job context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateQuestionRequest {
    pub job_info_id: JobInfoId,
    pub difficulty: QuestionDifficulty,
}

/// Request to generate feedback on an answer to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateFeedbackRequest {
    pub question_id: QuestionId,
    pub answer: String,
}

/// Failure surfaced inside an already-started body stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationStreamError {
    #[error(transparent)]
    Generation(#[from] TextGenerationError),
    #[error("text generation produced no output")]
    EmptyOutput,
    #[error("generated text could not be saved: {message}")]
    Finalize { message: String },
}

/// Streamed body chunks.
pub type GenerationChunks = BoxStream<'static, Result<String, GenerationStreamError>>;

/// Correlation id plus the streamed body of one generation.
pub struct GenerationStream {
    /// Id of the placeholder record the stream will finalize.
    pub record_id: Uuid,
    pub chunks: GenerationChunks,
}

impl std::fmt::Debug for GenerationStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationStream")
            .field("record_id", &self.record_id)
            .finish_non_exhaustive()
    }
}

/// Quota-gated generation use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationCommand: Send + Sync {
    /// Validate, authorize, write a placeholder question, and stream its text.
    async fn generate_question(
        &self,
        principal: Option<Principal>,
        request: GenerateQuestionRequest,
    ) -> Result<GenerationStream, Error>;

    /// Validate, authorize, write placeholder feedback, and stream its text.
    async fn generate_feedback(
        &self,
        principal: Option<Principal>,
        request: GenerateFeedbackRequest,
    ) -> Result<GenerationStream, Error>;
}
