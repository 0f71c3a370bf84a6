//! PostgreSQL-backed `InterviewRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{InterviewCompletion, InterviewRepository, InterviewRepositoryError};
use crate::domain::{Interview, InterviewId, JobInfoId};

use super::diesel_basic_error_mapping::basic_error_mappers;
use super::models::{InterviewCompletionUpdate, InterviewRow, NewInterviewRow};
use super::pool::DbPool;
use super::schema::interviews;

basic_error_mappers!(InterviewRepositoryError);

#[derive(Clone)]
pub struct DieselInterviewRepository {
    pool: DbPool,
}

impl DieselInterviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<InterviewRow> for Interview {
    fn from(row: InterviewRow) -> Self {
        Self {
            id: InterviewId::from_uuid(row.id),
            job_info_id: JobInfoId::from_uuid(row.job_info_id),
            duration: row.duration,
            external_session_id: row.external_session_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl InterviewRepository for DieselInterviewRepository {
    async fn insert(&self, interview: &Interview) -> Result<(), InterviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewInterviewRow {
            id: *interview.id.as_uuid(),
            job_info_id: *interview.job_info_id.as_uuid(),
            duration: &interview.duration,
            external_session_id: interview.external_session_id.as_deref(),
            created_at: interview.created_at,
            updated_at: interview.updated_at,
        };
        diesel::insert_into(interviews::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: InterviewId,
    ) -> Result<Option<Interview>, InterviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = interviews::table
            .find(id.as_uuid())
            .select(InterviewRow::as_select())
            .first::<InterviewRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Interview::from))
    }

    async fn record_completion(
        &self,
        id: InterviewId,
        completion: &InterviewCompletion,
    ) -> Result<bool, InterviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = InterviewCompletionUpdate {
            external_session_id: &completion.external_session_id,
            duration: &completion.duration,
            updated_at: completion.updated_at,
        };
        let updated = diesel::update(interviews::table.find(id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn list_completed_for_job_info(
        &self,
        job_info_id: JobInfoId,
    ) -> Result<Vec<Interview>, InterviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<InterviewRow> = interviews::table
            .filter(interviews::job_info_id.eq(job_info_id.as_uuid()))
            .filter(interviews::external_session_id.is_not_null())
            .order((interviews::updated_at.desc(), interviews::id.desc()))
            .select(InterviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Interview::from).collect())
    }
}
