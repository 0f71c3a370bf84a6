//! Port counting a principal's existing records for quota checks.
//!
//! Every count joins through the owning job context to the user id, so one
//! user's records never count against another.

use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised while counting usage.
    pub enum UsageCountError {
        /// Repository connection could not be established.
        Connection { message: String } => "usage counter connection failed: {message}",
        /// Count query failed during execution.
        Query { message: String } => "usage count query failed: {message}",
    }
}

/// Count queries backing the quota evaluator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsageCounter: Send + Sync {
    /// Interviews with an external session attached, across the user's job contexts.
    async fn count_completed_interviews(&self, user_id: &UserId) -> Result<u64, UsageCountError>;

    /// Questions (including unfinished placeholders) across the user's job contexts.
    ///
    /// Gates both question generation and feedback generation.
    async fn count_questions(&self, user_id: &UserId) -> Result<u64, UsageCountError>;
}

/// Fixture counter reporting no prior usage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsageCounter;

#[async_trait]
impl UsageCounter for FixtureUsageCounter {
    async fn count_completed_interviews(&self, _user_id: &UserId) -> Result<u64, UsageCountError> {
        Ok(0)
    }

    async fn count_questions(&self, _user_id: &UserId) -> Result<u64, UsageCountError> {
        Ok(0)
    }
}
