//! Streaming AI generation handlers.
//!
//! ```text
//! POST /api/v1/ai/questions/generate-question {"prompt":"easy","jobInfoId":"…"}
//! POST /api/v1/ai/questions/generate-feedback {"prompt":"my answer","questionId":"…"}
//! ```
//!
//! Both answer with a chunked `text/plain` body and name the new record in a
//! response header. Failures before streaming starts are plain-text bodies,
//! not the JSON envelope.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, post, web};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::{GenerateFeedbackRequest, GenerateQuestionRequest, GenerationStream};
use crate::domain::{Error, JobInfoId, QuestionDifficulty, QuestionId};

use super::error::PlainTextError;
use super::principal::PrincipalContext;
use super::state::HttpState;

/// Header naming the question record being generated.
pub const QUESTION_ID_HEADER: &str = "x-question-id";

/// Header naming the feedback record being generated.
pub const FEEDBACK_ID_HEADER: &str = "x-feedback-id";

const QUESTION_ERROR_MESSAGE: &str = "Error generating your question";
const FEEDBACK_ERROR_MESSAGE: &str = "Error generating your feedback";

/// Body of `generate-question`; `prompt` carries the difficulty.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionBody {
    #[schema(example = "medium")]
    pub prompt: Option<String>,
    pub job_info_id: Option<String>,
}

/// Body of `generate-feedback`; `prompt` carries the candidate's answer.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFeedbackBody {
    pub prompt: Option<String>,
    pub question_id: Option<String>,
}

fn rejected(message: &'static str, reason: impl std::fmt::Display) -> PlainTextError {
    debug!(%reason, "generation request rejected");
    PlainTextError::from(Error::invalid_request(message))
}

impl TryFrom<&[u8]> for GenerateQuestionRequest {
    type Error = PlainTextError;

    fn try_from(raw: &[u8]) -> Result<Self, Self::Error> {
        let body: GenerateQuestionBody = serde_json::from_slice(raw)
            .map_err(|err| rejected(QUESTION_ERROR_MESSAGE, err))?;
        let difficulty = body
            .prompt
            .as_deref()
            .ok_or_else(|| rejected(QUESTION_ERROR_MESSAGE, "missing prompt"))?
            .parse::<QuestionDifficulty>()
            .map_err(|err| rejected(QUESTION_ERROR_MESSAGE, err))?;
        let job_info_id = body
            .job_info_id
            .as_deref()
            .ok_or_else(|| rejected(QUESTION_ERROR_MESSAGE, "missing jobInfoId"))?
            .parse::<JobInfoId>()
            .map_err(|err| rejected(QUESTION_ERROR_MESSAGE, err))?;
        Ok(Self {
            job_info_id,
            difficulty,
        })
    }
}

impl TryFrom<&[u8]> for GenerateFeedbackRequest {
    type Error = PlainTextError;

    fn try_from(raw: &[u8]) -> Result<Self, Self::Error> {
        let body: GenerateFeedbackBody = serde_json::from_slice(raw)
            .map_err(|err| rejected(FEEDBACK_ERROR_MESSAGE, err))?;
        let question_id = body
            .question_id
            .as_deref()
            .ok_or_else(|| rejected(FEEDBACK_ERROR_MESSAGE, "missing questionId"))?
            .parse::<QuestionId>()
            .map_err(|err| rejected(FEEDBACK_ERROR_MESSAGE, err))?;
        // Blank answers are rejected by the orchestrator.
        Ok(Self {
            question_id,
            answer: body.prompt.unwrap_or_default(),
        })
    }
}

fn streaming_response(header: &'static str, stream: GenerationStream) -> HttpResponse {
    let GenerationStream { record_id, chunks } = stream;
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .insert_header((header, record_id.to_string()))
        .streaming(chunks.map(|chunk| chunk.map(web::Bytes::from)))
}

/// Generate an interview question for a job context.
#[utoipa::path(
    post,
    path = "/api/v1/ai/questions/generate-question",
    request_body = GenerateQuestionBody,
    responses(
        (
            status = 200,
            description = "Question text streamed as it is generated",
            content_type = "text/plain",
            body = String,
            headers(("x-question-id" = String, description = "Id of the question record"))
        ),
        (status = 400, description = "Malformed request", content_type = "text/plain", body = String),
        (status = 401, description = "Not signed in", content_type = "text/plain", body = String),
        (status = 403, description = "Plan limit reached or not the owner", content_type = "text/plain", body = String),
        (status = 404, description = "Job context not found", content_type = "text/plain", body = String),
        (status = 503, description = "Storage unavailable", content_type = "text/plain", body = String)
    ),
    tags = ["generation"],
    operation_id = "generateQuestion"
)]
#[post("/ai/questions/generate-question")]
pub async fn generate_question(
    state: web::Data<HttpState>,
    context: Result<PrincipalContext, Error>,
    body: web::Bytes,
) -> Result<HttpResponse, PlainTextError> {
    let request = GenerateQuestionRequest::try_from(body.as_ref())?;
    let principal = context?.into_inner();
    let stream = state
        .generation
        .generate_question(principal, request)
        .await?;
    Ok(streaming_response(QUESTION_ID_HEADER, stream))
}

/// Generate feedback on an answer to a question.
#[utoipa::path(
    post,
    path = "/api/v1/ai/questions/generate-feedback",
    request_body = GenerateFeedbackBody,
    responses(
        (
            status = 200,
            description = "Feedback text streamed as it is generated",
            content_type = "text/plain",
            body = String,
            headers(("x-feedback-id" = String, description = "Id of the feedback record"))
        ),
        (status = 400, description = "Malformed request or blank answer", content_type = "text/plain", body = String),
        (status = 401, description = "Not signed in", content_type = "text/plain", body = String),
        (status = 403, description = "Plan limit reached or not the owner", content_type = "text/plain", body = String),
        (status = 404, description = "Question not found", content_type = "text/plain", body = String),
        (status = 409, description = "Question still generating", content_type = "text/plain", body = String)
    ),
    tags = ["generation"],
    operation_id = "generateFeedback"
)]
#[post("/ai/questions/generate-feedback")]
pub async fn generate_feedback(
    state: web::Data<HttpState>,
    context: Result<PrincipalContext, Error>,
    body: web::Bytes,
) -> Result<HttpResponse, PlainTextError> {
    let request = GenerateFeedbackRequest::try_from(body.as_ref())?;
    let principal = context?.into_inner();
    let stream = state
        .generation
        .generate_feedback(principal, request)
        .await?;
    Ok(streaming_response(FEEDBACK_ID_HEADER, stream))
}

#[cfg(test)]
#[path = "generation_tests.rs"]
mod tests;
