//! PostgreSQL-backed `QuestionRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{QuestionRepository, QuestionRepositoryError};
use crate::domain::{JobInfoId, Question, QuestionDifficulty, QuestionId};

use super::diesel_basic_error_mapping::basic_error_mappers;
use super::models::{NewQuestionRow, QuestionRow};
use super::pool::DbPool;
use super::schema::questions;

basic_error_mappers!(QuestionRepositoryError);

#[derive(Clone)]
pub struct DieselQuestionRepository {
    pool: DbPool,
}

impl DieselQuestionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_question(row: QuestionRow) -> Result<Question, QuestionRepositoryError> {
    let difficulty: QuestionDifficulty = row
        .difficulty
        .parse()
        .map_err(|err| QuestionRepositoryError::query(format!("invalid question row: {err}")))?;
    Ok(Question {
        id: QuestionId::from_uuid(row.id),
        job_info_id: JobInfoId::from_uuid(row.job_info_id),
        text: row.text,
        difficulty,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl QuestionRepository for DieselQuestionRepository {
    async fn insert(&self, question: &Question) -> Result<(), QuestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewQuestionRow {
            id: *question.id.as_uuid(),
            job_info_id: *question.job_info_id.as_uuid(),
            text: &question.text,
            difficulty: question.difficulty.as_str(),
            created_at: question.created_at,
            updated_at: question.updated_at,
        };
        diesel::insert_into(questions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn finalize(
        &self,
        id: QuestionId,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, QuestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(questions::table.find(id.as_uuid()))
            .set((questions::text.eq(text), questions::updated_at.eq(updated_at)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn find_by_id(&self, id: QuestionId) -> Result<Option<Question>, QuestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = questions::table
            .find(id.as_uuid())
            .select(QuestionRow::as_select())
            .first::<QuestionRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_question).transpose()
    }

    async fn list_for_job_info(
        &self,
        job_info_id: JobInfoId,
    ) -> Result<Vec<Question>, QuestionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<QuestionRow> = questions::table
            .filter(questions::job_info_id.eq(job_info_id.as_uuid()))
            .order((questions::created_at.asc(), questions::id.asc()))
            .select(QuestionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_question).collect()
    }
}
