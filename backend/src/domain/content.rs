//! Content records produced for a job context: questions, feedback, and
//! interviews.
//!
//! Questions and feedback are generated text. They are inserted as a
//! placeholder with an empty payload and later finalized in place; a record
//! whose generation never completes keeps its empty payload.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FeedbackId, InterviewId, JobInfoId, QuestionId};

/// Payload stored for a record whose generation has not completed.
pub const PLACEHOLDER_TEXT: &str = "";

/// Maximum length of an interview duration label such as `00:12:31`.
pub const DURATION_MAX: usize = 32;

/// Requested question difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuestionDifficulty {
    Easy,
    Medium,
    Hard,
}

impl QuestionDifficulty {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for QuestionDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown difficulty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown question difficulty: {value}")]
pub struct UnknownDifficulty {
    pub value: String,
}

impl FromStr for QuestionDifficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(UnknownDifficulty {
                value: other.to_owned(),
            }),
        }
    }
}

/// Generated interview question belonging to a job context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub job_info_id: JobInfoId,
    pub text: String,
    pub difficulty: QuestionDifficulty,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    /// Build a placeholder question awaiting generated text.
    pub fn placeholder(
        job_info_id: JobInfoId,
        difficulty: QuestionDifficulty,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: QuestionId::random(),
            job_info_id,
            text: PLACEHOLDER_TEXT.to_owned(),
            difficulty,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the question still carries the placeholder payload.
    pub fn is_placeholder(&self) -> bool {
        self.text == PLACEHOLDER_TEXT
    }
}

/// Generated feedback on an answer to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: FeedbackId,
    pub question_id: QuestionId,
    pub answer: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Feedback {
    /// Build a placeholder feedback record for `answer`.
    pub fn placeholder(question_id: QuestionId, answer: String, now: DateTime<Utc>) -> Self {
        Self {
            id: FeedbackId::random(),
            question_id,
            answer,
            text: PLACEHOLDER_TEXT.to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.text == PLACEHOLDER_TEXT
    }
}

/// Validation errors for interview input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterviewValidationError {
    #[error("duration must not be empty")]
    EmptyDuration,
    #[error("duration must be at most {max} characters")]
    DurationTooLong { max: usize },
    #[error("externalSessionId must not be empty")]
    EmptyExternalSessionId,
}

/// Rehearsal interview; completed once an external voice session is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: InterviewId,
    pub job_info_id: JobInfoId,
    #[schema(example = "00:12:31")]
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validate a duration label.
pub fn validate_duration(duration: &str) -> Result<String, InterviewValidationError> {
    let duration = duration.trim();
    if duration.is_empty() {
        return Err(InterviewValidationError::EmptyDuration);
    }
    if duration.chars().count() > DURATION_MAX {
        return Err(InterviewValidationError::DurationTooLong { max: DURATION_MAX });
    }
    Ok(duration.to_owned())
}

/// Validate an external session identifier.
pub fn validate_external_session_id(value: &str) -> Result<String, InterviewValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InterviewValidationError::EmptyExternalSessionId);
    }
    Ok(value.to_owned())
}

impl Interview {
    /// Start a new, not yet completed interview.
    pub fn start(
        job_info_id: JobInfoId,
        duration: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, InterviewValidationError> {
        Ok(Self {
            id: InterviewId::random(),
            job_info_id,
            duration: validate_duration(duration)?,
            external_session_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether the interview counts towards the completed-interview quota.
    pub fn is_completed(&self) -> bool {
        self.external_session_id.is_some()
    }
}
