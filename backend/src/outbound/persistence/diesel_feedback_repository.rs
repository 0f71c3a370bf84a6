//! PostgreSQL-backed `FeedbackRepository` over the `question_feedback` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FeedbackRepository, FeedbackRepositoryError};
use crate::domain::{Feedback, FeedbackId, QuestionId};

use super::diesel_basic_error_mapping::basic_error_mappers;
use super::models::{FeedbackRow, NewFeedbackRow};
use super::pool::DbPool;
use super::schema::question_feedback;

basic_error_mappers!(FeedbackRepositoryError);

#[derive(Clone)]
pub struct DieselFeedbackRepository {
    pool: DbPool,
}

impl DieselFeedbackRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<FeedbackRow> for Feedback {
    fn from(row: FeedbackRow) -> Self {
        Self {
            id: FeedbackId::from_uuid(row.id),
            question_id: QuestionId::from_uuid(row.question_id),
            answer: row.answer,
            text: row.text,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl FeedbackRepository for DieselFeedbackRepository {
    async fn insert(&self, feedback: &Feedback) -> Result<(), FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewFeedbackRow {
            id: *feedback.id.as_uuid(),
            question_id: *feedback.question_id.as_uuid(),
            answer: &feedback.answer,
            text: &feedback.text,
            created_at: feedback.created_at,
            updated_at: feedback.updated_at,
        };
        diesel::insert_into(question_feedback::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn finalize(
        &self,
        id: FeedbackId,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(question_feedback::table.find(id.as_uuid()))
            .set((
                question_feedback::text.eq(text),
                question_feedback::updated_at.eq(updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn list_for_question(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<Feedback>, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FeedbackRow> = question_feedback::table
            .filter(question_feedback::question_id.eq(question_id.as_uuid()))
            .order((question_feedback::created_at.asc(), question_feedback::id.asc()))
            .select(FeedbackRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Feedback::from).collect())
    }
}
