//! Port for interview persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Interview, InterviewId, JobInfoId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by interview repository adapters.
    pub enum InterviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "interview repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "interview repository query failed: {message}",
    }
}

/// Details written when an interview's external session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewCompletion {
    pub external_session_id: String,
    pub duration: String,
    pub updated_at: DateTime<Utc>,
}

/// Storage for interviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InterviewRepository: Send + Sync {
    /// Insert a new interview.
    async fn insert(&self, interview: &Interview) -> Result<(), InterviewRepositoryError>;

    /// Find an interview by id.
    async fn find_by_id(
        &self,
        id: InterviewId,
    ) -> Result<Option<Interview>, InterviewRepositoryError>;

    /// Attach the external session to an interview, marking it completed.
    ///
    /// Returns `false` when no row matched the id.
    async fn record_completion(
        &self,
        id: InterviewId,
        completion: &InterviewCompletion,
    ) -> Result<bool, InterviewRepositoryError>;

    /// List completed interviews of a job context, newest first.
    async fn list_completed_for_job_info(
        &self,
        job_info_id: JobInfoId,
    ) -> Result<Vec<Interview>, InterviewRepositoryError>;
}

/// Fixture repository that accepts writes and stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInterviewRepository;

#[async_trait]
impl InterviewRepository for FixtureInterviewRepository {
    async fn insert(&self, _interview: &Interview) -> Result<(), InterviewRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: InterviewId,
    ) -> Result<Option<Interview>, InterviewRepositoryError> {
        Ok(None)
    }

    async fn record_completion(
        &self,
        _id: InterviewId,
        _completion: &InterviewCompletion,
    ) -> Result<bool, InterviewRepositoryError> {
        Ok(false)
    }

    async fn list_completed_for_job_info(
        &self,
        _job_info_id: JobInfoId,
    ) -> Result<Vec<Interview>, InterviewRepositoryError> {
        Ok(Vec::new())
    }
}
