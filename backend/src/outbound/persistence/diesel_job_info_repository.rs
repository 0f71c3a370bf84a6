//! PostgreSQL-backed `JobInfoRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{JobInfoRepository, JobInfoRepositoryError};
use crate::domain::{ExperienceLevel, JobInfo, JobInfoFields, JobInfoId, UserId};

use super::diesel_basic_error_mapping::basic_error_mappers;
use super::models::{JobInfoRow, JobInfoUpdate, NewJobInfoRow};
use super::pool::DbPool;
use super::schema::job_infos;

basic_error_mappers!(JobInfoRepositoryError);

/// Diesel-backed implementation of the job info repository port.
#[derive(Clone)]
pub struct DieselJobInfoRepository {
    pool: DbPool,
}

impl DieselJobInfoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn corrupt_row(error: impl std::fmt::Display) -> JobInfoRepositoryError {
    JobInfoRepositoryError::query(format!("invalid job info row: {error}"))
}

/// Rebuild a validated domain job info from its row.
fn row_to_job_info(row: JobInfoRow) -> Result<JobInfo, JobInfoRepositoryError> {
    let JobInfoRow {
        id,
        user_id,
        name,
        title,
        description,
        experience_level,
        created_at,
        updated_at,
    } = row;
    let experience_level: ExperienceLevel = experience_level.parse().map_err(corrupt_row)?;
    JobInfo::restore(
        JobInfoId::from_uuid(id),
        UserId::new(&user_id).map_err(corrupt_row)?,
        JobInfoFields {
            name,
            title,
            description,
            experience_level,
        },
        created_at,
        updated_at,
    )
    .map_err(corrupt_row)
}

#[async_trait]
impl JobInfoRepository for DieselJobInfoRepository {
    async fn insert(&self, job_info: &JobInfo) -> Result<(), JobInfoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewJobInfoRow {
            id: *job_info.id().as_uuid(),
            user_id: job_info.user_id().as_ref(),
            name: job_info.name(),
            title: job_info.title(),
            description: job_info.description(),
            experience_level: job_info.experience_level().as_str(),
            created_at: job_info.created_at(),
            updated_at: job_info.updated_at(),
        };
        diesel::insert_into(job_infos::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, job_info: &JobInfo) -> Result<bool, JobInfoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = JobInfoUpdate {
            name: job_info.name(),
            title: job_info.title(),
            description: job_info.description(),
            experience_level: job_info.experience_level().as_str(),
            updated_at: job_info.updated_at(),
        };
        let updated = diesel::update(job_infos::table.find(job_info.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn find_by_id(&self, id: JobInfoId) -> Result<Option<JobInfo>, JobInfoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = job_infos::table
            .find(id.as_uuid())
            .select(JobInfoRow::as_select())
            .first::<JobInfoRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_job_info).transpose()
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<JobInfo>, JobInfoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<JobInfoRow> = job_infos::table
            .filter(job_infos::user_id.eq(user_id.as_ref()))
            .order((job_infos::updated_at.desc(), job_infos::id.desc()))
            .select(JobInfoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_job_info).collect()
    }

    async fn delete(&self, id: JobInfoId) -> Result<bool, JobInfoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(job_infos::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
