//! Driving port for cached job context reads.

use async_trait::async_trait;

use crate::domain::{Error, JobInfo, JobInfoId, Principal, Question};

/// Job context reads scoped to the principal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobInfoQuery: Send + Sync {
    /// The principal's job contexts, most recently updated first.
    async fn list(&self, principal: &Principal) -> Result<Vec<JobInfo>, Error>;

    async fn get(&self, principal: &Principal, id: JobInfoId) -> Result<JobInfo, Error>;

    /// Questions of an owned job context in creation order.
    async fn list_questions(
        &self,
        principal: &Principal,
        id: JobInfoId,
    ) -> Result<Vec<Question>, Error>;
}
