//! PostgreSQL-backed `UsageCounter`.
//!
//! Every count joins back to `job_infos.user_id`, so usage is principal-wide
//! across all of a user's job contexts. Placeholder rows count: a question
//! whose generation is still streaming already consumes allowance. Feedback is
//! gated on the question count, so feedback rows are never counted.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::ports::{UsageCountError, UsageCounter};

use super::diesel_basic_error_mapping::basic_error_mappers;
use super::pool::DbPool;
use super::schema::{interviews, job_infos, questions};

basic_error_mappers!(UsageCountError);

#[derive(Clone)]
pub struct DieselUsageCounter {
    pool: DbPool,
}

impl DieselUsageCounter {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_count(value: i64) -> Result<u64, UsageCountError> {
    u64::try_from(value).map_err(|_| UsageCountError::query(format!("negative count {value}")))
}

#[async_trait]
impl UsageCounter for DieselUsageCounter {
    async fn count_completed_interviews(&self, user_id: &UserId) -> Result<u64, UsageCountError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = interviews::table
            .inner_join(job_infos::table)
            .filter(job_infos::user_id.eq(user_id.as_ref()))
            .filter(interviews::external_session_id.is_not_null())
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_count(count)
    }

    async fn count_questions(&self, user_id: &UserId) -> Result<u64, UsageCountError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = questions::table
            .inner_join(job_infos::table)
            .filter(job_infos::user_id.eq(user_id.as_ref()))
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_count(count)
    }

}
