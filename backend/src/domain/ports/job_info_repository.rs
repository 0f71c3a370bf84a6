//! Port for job context persistence.

use async_trait::async_trait;

use crate::domain::{JobInfo, JobInfoId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by job context repository adapters.
    pub enum JobInfoRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "job info repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "job info repository query failed: {message}",
    }
}

/// Storage for job contexts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobInfoRepository: Send + Sync {
    /// Insert a new job context.
    async fn insert(&self, job_info: &JobInfo) -> Result<(), JobInfoRepositoryError>;

    /// Overwrite the editable fields of an existing job context.
    ///
    /// Returns `false` when no row matched the id.
    async fn update(&self, job_info: &JobInfo) -> Result<bool, JobInfoRepositoryError>;

    /// Find a job context by id regardless of owner.
    async fn find_by_id(&self, id: JobInfoId) -> Result<Option<JobInfo>, JobInfoRepositoryError>;

    /// List a user's job contexts, most recently updated first.
    async fn list_for_user(&self, user_id: &UserId)
    -> Result<Vec<JobInfo>, JobInfoRepositoryError>;

    /// Delete a job context and, by cascade, its content.
    ///
    /// Returns `false` when no row matched the id.
    async fn delete(&self, id: JobInfoId) -> Result<bool, JobInfoRepositoryError>;
}

/// Fixture repository that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureJobInfoRepository;

#[async_trait]
impl JobInfoRepository for FixtureJobInfoRepository {
    async fn insert(&self, _job_info: &JobInfo) -> Result<(), JobInfoRepositoryError> {
        Ok(())
    }

    async fn update(&self, _job_info: &JobInfo) -> Result<bool, JobInfoRepositoryError> {
        Ok(false)
    }

    async fn find_by_id(&self, _id: JobInfoId) -> Result<Option<JobInfo>, JobInfoRepositoryError> {
        Ok(None)
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<JobInfo>, JobInfoRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _id: JobInfoId) -> Result<bool, JobInfoRepositoryError> {
        Ok(false)
    }
}
