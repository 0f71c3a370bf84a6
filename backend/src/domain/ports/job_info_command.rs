//! Driving port for job context writes.

use async_trait::async_trait;

use crate::domain::{Error, JobInfo, JobInfoFields, JobInfoId, Principal};

/// Job context mutations owned by the principal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobInfoCommand: Send + Sync {
    async fn create(&self, principal: &Principal, fields: JobInfoFields)
    -> Result<JobInfo, Error>;

    async fn update(
        &self,
        principal: &Principal,
        id: JobInfoId,
        fields: JobInfoFields,
    ) -> Result<JobInfo, Error>;

    /// Delete a job context together with its questions and interviews.
    async fn delete(&self, principal: &Principal, id: JobInfoId) -> Result<(), Error>;
}
