//! Job context use-cases.
//!
//! Reads go through the tagged cache; every write invalidates the job
//! context's own tag and the owner's list tag before returning.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use super::access::load_owned_job_info;
use super::cache::{CacheKey, CacheTag, cached_read, job_info_write_tags};
use super::error_mapping::{map_job_info_error, map_question_error};
use super::ports::{
    ContentCache, JobInfoCommand, JobInfoQuery, JobInfoRepository, QuestionRepository,
};
use super::{Error, JobInfo, JobInfoFields, JobInfoId, JobInfoValidationError, Principal, Question};

fn map_validation_error(error: JobInfoValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": "invalid_field",
    }))
}

/// Job context service implementing the command and query driving ports.
#[derive(Clone)]
pub struct JobInfoService<J: ?Sized, Q: ?Sized> {
    job_infos: Arc<J>,
    questions: Arc<Q>,
    cache: Arc<dyn ContentCache>,
}

impl<J: ?Sized, Q: ?Sized> JobInfoService<J, Q> {
    pub fn new(job_infos: Arc<J>, questions: Arc<Q>, cache: Arc<dyn ContentCache>) -> Self {
        Self {
            job_infos,
            questions,
            cache,
        }
    }
}

impl<J, Q> JobInfoService<J, Q>
where
    J: JobInfoRepository + ?Sized,
    Q: ?Sized,
{
    async fn owned(&self, principal: &Principal, id: JobInfoId) -> Result<JobInfo, Error> {
        load_owned_job_info(self.job_infos.as_ref(), self.cache.as_ref(), principal, id).await
    }
}

#[async_trait]
impl<J, Q> JobInfoCommand for JobInfoService<J, Q>
where
    J: JobInfoRepository + ?Sized,
    Q: QuestionRepository + ?Sized,
{
    async fn create(
        &self,
        principal: &Principal,
        fields: JobInfoFields,
    ) -> Result<JobInfo, Error> {
        let job_info = JobInfo::create(principal.user_id().clone(), fields, Utc::now())
            .map_err(map_validation_error)?;
        self.job_infos
            .insert(&job_info)
            .await
            .map_err(map_job_info_error)?;
        self.cache
            .invalidate(&job_info_write_tags(job_info.user_id(), job_info.id()))
            .await;
        info!(job_info_id = %job_info.id(), user_id = %principal.user_id(), "job info created");
        Ok(job_info)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: JobInfoId,
        fields: JobInfoFields,
    ) -> Result<JobInfo, Error> {
        let current = self.owned(principal, id).await?;
        let revised = current
            .revise(fields, Utc::now())
            .map_err(map_validation_error)?;
        let updated = self
            .job_infos
            .update(&revised)
            .await
            .map_err(map_job_info_error)?;
        self.cache
            .invalidate(&job_info_write_tags(revised.user_id(), id))
            .await;
        if !updated {
            return Err(Error::not_found("job info not found").with_details(json!({ "jobInfoId": id })));
        }
        Ok(revised)
    }

    async fn delete(&self, principal: &Principal, id: JobInfoId) -> Result<(), Error> {
        let current = self.owned(principal, id).await?;
        let deleted = self
            .job_infos
            .delete(id)
            .await
            .map_err(map_job_info_error)?;
        let mut tags = job_info_write_tags(current.user_id(), id);
        tags.extend([CacheTag::JobInfoQuestions(id), CacheTag::JobInfoInterviews(id)]);
        self.cache.invalidate(&tags).await;
        if !deleted {
            return Err(Error::not_found("job info not found").with_details(json!({ "jobInfoId": id })));
        }
        info!(job_info_id = %id, "job info deleted");
        Ok(())
    }
}

#[async_trait]
impl<J, Q> JobInfoQuery for JobInfoService<J, Q>
where
    J: JobInfoRepository + ?Sized,
    Q: QuestionRepository + ?Sized,
{
    async fn list(&self, principal: &Principal) -> Result<Vec<JobInfo>, Error> {
        let user_id = principal.user_id();
        cached_read(
            self.cache.as_ref(),
            CacheKey::job_info_list(user_id),
            &[CacheTag::UserJobInfos(user_id.clone())],
            || async {
                self.job_infos
                    .list_for_user(user_id)
                    .await
                    .map_err(map_job_info_error)
            },
        )
        .await
    }

    async fn get(&self, principal: &Principal, id: JobInfoId) -> Result<JobInfo, Error> {
        self.owned(principal, id).await
    }

    async fn list_questions(
        &self,
        principal: &Principal,
        id: JobInfoId,
    ) -> Result<Vec<Question>, Error> {
        self.owned(principal, id).await?;
        cached_read(
            self.cache.as_ref(),
            CacheKey::question_list(id),
            &[CacheTag::JobInfoQuestions(id)],
            || async {
                self.questions
                    .list_for_job_info(id)
                    .await
                    .map_err(map_question_error)
            },
        )
        .await
    }
}

#[cfg(test)]
#[path = "job_info_service_tests.rs"]
mod tests;
