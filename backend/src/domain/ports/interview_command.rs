//! Driving port for interview lifecycle writes.

use async_trait::async_trait;

use crate::domain::{Error, Interview, InterviewId, JobInfoId, Principal};

/// Session details reported when a voice interview ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteInterviewRequest {
    pub external_session_id: String,
    pub duration: String,
}

/// Quota-gated interview creation and completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InterviewCommand: Send + Sync {
    async fn start(
        &self,
        principal: &Principal,
        job_info_id: JobInfoId,
        duration: String,
    ) -> Result<Interview, Error>;

    /// Attach the external session, marking the interview completed.
    async fn complete(
        &self,
        principal: &Principal,
        id: InterviewId,
        request: CompleteInterviewRequest,
    ) -> Result<Interview, Error>;
}
