//! Driving port for interview reads.

use async_trait::async_trait;

use crate::domain::{Error, Interview, JobInfoId, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InterviewQuery: Send + Sync {
    /// Completed interviews of an owned job context, newest first.
    async fn list_completed(
        &self,
        principal: &Principal,
        job_info_id: JobInfoId,
    ) -> Result<Vec<Interview>, Error>;
}
