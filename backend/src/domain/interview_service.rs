//! Interview use-cases.
//!
//! Starting an interview is quota-gated. An interview only counts against the
//! `1_interview` allowance once completion attaches its external session id.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use super::access::load_owned_job_info;
use super::cache::{CacheKey, CacheTag, cached_read, interview_write_tags};
use super::content::{validate_duration, validate_external_session_id};
use super::error_mapping::map_interview_error;
use super::ports::{
    CompleteInterviewRequest, ContentCache, InterviewCommand, InterviewCompletion,
    InterviewQuery, InterviewRepository, JobInfoRepository,
};
use super::{
    Error, Interview, InterviewId, InterviewValidationError, JobInfoId, Principal, QuotaAction,
    QuotaEvaluator,
};

fn map_validation_error(error: InterviewValidationError) -> Error {
    let field = match error {
        InterviewValidationError::EmptyDuration | InterviewValidationError::DurationTooLong { .. } => {
            "duration"
        }
        InterviewValidationError::EmptyExternalSessionId => "externalSessionId",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": "invalid_field",
    }))
}

/// Interview service implementing the command and query driving ports.
#[derive(Clone)]
pub struct InterviewService<J: ?Sized, I: ?Sized> {
    job_infos: Arc<J>,
    interviews: Arc<I>,
    quota: QuotaEvaluator,
    cache: Arc<dyn ContentCache>,
}

impl<J: ?Sized, I: ?Sized> InterviewService<J, I> {
    pub fn new(
        job_infos: Arc<J>,
        interviews: Arc<I>,
        quota: QuotaEvaluator,
        cache: Arc<dyn ContentCache>,
    ) -> Self {
        Self {
            job_infos,
            interviews,
            quota,
            cache,
        }
    }
}

#[async_trait]
impl<J, I> InterviewCommand for InterviewService<J, I>
where
    J: JobInfoRepository + ?Sized,
    I: InterviewRepository + ?Sized,
{
    async fn start(
        &self,
        principal: &Principal,
        job_info_id: JobInfoId,
        duration: String,
    ) -> Result<Interview, Error> {
        let interview =
            Interview::start(job_info_id, &duration, Utc::now()).map_err(map_validation_error)?;
        self.quota
            .authorize(QuotaAction::CreateInterview, principal)
            .await?;
        load_owned_job_info(
            self.job_infos.as_ref(),
            self.cache.as_ref(),
            principal,
            job_info_id,
        )
        .await?;

        self.interviews
            .insert(&interview)
            .await
            .map_err(map_interview_error)?;
        self.cache
            .invalidate(&interview_write_tags(job_info_id, interview.id))
            .await;
        info!(interview_id = %interview.id, %job_info_id, "interview started");
        Ok(interview)
    }

    async fn complete(
        &self,
        principal: &Principal,
        id: InterviewId,
        request: CompleteInterviewRequest,
    ) -> Result<Interview, Error> {
        let external_session_id = validate_external_session_id(&request.external_session_id)
            .map_err(map_validation_error)?;
        let duration = validate_duration(&request.duration).map_err(map_validation_error)?;

        let interview = self
            .interviews
            .find_by_id(id)
            .await
            .map_err(map_interview_error)?
            .ok_or_else(|| {
                Error::not_found("interview not found").with_details(json!({ "interviewId": id }))
            })?;
        load_owned_job_info(
            self.job_infos.as_ref(),
            self.cache.as_ref(),
            principal,
            interview.job_info_id,
        )
        .await?;

        let completion = InterviewCompletion {
            external_session_id,
            duration,
            updated_at: Utc::now(),
        };
        let updated = self
            .interviews
            .record_completion(id, &completion)
            .await
            .map_err(map_interview_error)?;
        self.cache
            .invalidate(&interview_write_tags(interview.job_info_id, id))
            .await;
        if !updated {
            return Err(
                Error::not_found("interview not found").with_details(json!({ "interviewId": id }))
            );
        }
        info!(interview_id = %id, "interview completed");

        Ok(Interview {
            duration: completion.duration,
            external_session_id: Some(completion.external_session_id),
            updated_at: completion.updated_at,
            ..interview
        })
    }
}

#[async_trait]
impl<J, I> InterviewQuery for InterviewService<J, I>
where
    J: JobInfoRepository + ?Sized,
    I: InterviewRepository + ?Sized,
{
    async fn list_completed(
        &self,
        principal: &Principal,
        job_info_id: JobInfoId,
    ) -> Result<Vec<Interview>, Error> {
        load_owned_job_info(
            self.job_infos.as_ref(),
            self.cache.as_ref(),
            principal,
            job_info_id,
        )
        .await?;
        cached_read(
            self.cache.as_ref(),
            CacheKey::interview_list(job_info_id),
            &[CacheTag::JobInfoInterviews(job_info_id)],
            || async {
                self.interviews
                    .list_completed_for_job_info(job_info_id)
                    .await
                    .map_err(map_interview_error)
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    //! Interview gating, ownership, and completion.

    use super::*;
    use crate::domain::ports::{
        MockEntitlementService, MockInterviewRepository, MockJobInfoRepository, MockUsageCounter,
        NoOpContentCache,
    };
    use crate::domain::{
        EntitlementResolver, ErrorCode, ExperienceLevel, FeatureClaims, Grant, JobInfo,
        JobInfoFields, PLAN_LIMIT_MESSAGE, UserId,
    };
    use rstest::{fixture, rstest};

    type Service = InterviewService<MockJobInfoRepository, MockInterviewRepository>;

    #[fixture]
    fn owner() -> Principal {
        Principal::new(UserId::new("user_owner").expect("id"), FeatureClaims::default())
    }

    fn job_info(owner: &Principal) -> JobInfo {
        JobInfo::create(
            owner.user_id().clone(),
            JobInfoFields {
                name: "Infra".to_owned(),
                title: None,
                description: "Run Kubernetes".to_owned(),
                experience_level: ExperienceLevel::MidLevel,
            },
            Utc::now(),
        )
        .expect("valid")
    }

    fn quota(completed: u64) -> QuotaEvaluator {
        let mut entitlements = MockEntitlementService::new();
        entitlements
            .expect_has_grant()
            .returning(|_, grant| Ok(grant == Grant::OneInterview));
        let mut usage = MockUsageCounter::new();
        usage
            .expect_count_completed_interviews()
            .returning(move |_| Ok(completed));
        QuotaEvaluator::new(EntitlementResolver::new(Arc::new(entitlements)), Arc::new(usage))
    }

    fn owning(job_info: &JobInfo) -> MockJobInfoRepository {
        let stored = job_info.clone();
        let mut repo = MockJobInfoRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo
    }

    fn service(
        job_infos: MockJobInfoRepository,
        interviews: MockInterviewRepository,
        completed: u64,
    ) -> Service {
        InterviewService::new(
            Arc::new(job_infos),
            Arc::new(interviews),
            quota(completed),
            Arc::new(NoOpContentCache),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn first_interview_is_permitted_under_single_allowance(owner: Principal) {
        let job_info = job_info(&owner);
        let mut interviews = MockInterviewRepository::new();
        interviews.expect_insert().times(1).returning(|_| Ok(()));
        let service = service(owning(&job_info), interviews, 0);

        let interview = service
            .start(&owner, job_info.id(), "00:00:00".to_owned())
            .await
            .expect("started");

        assert!(!interview.is_completed());
        assert_eq!(interview.job_info_id, job_info.id());
    }

    #[rstest]
    #[tokio::test]
    async fn completed_interview_exhausts_single_allowance(owner: Principal) {
        let job_info = job_info(&owner);
        let mut interviews = MockInterviewRepository::new();
        interviews.expect_insert().never();
        let service = service(owning(&job_info), interviews, 1);

        let err = service
            .start(&owner, job_info.id(), "00:00:00".to_owned())
            .await
            .expect_err("allowance used");

        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), PLAN_LIMIT_MESSAGE);
    }

    #[rstest]
    #[case("", "00:10:00", "externalSessionId")]
    #[case("session_1", " ", "duration")]
    #[tokio::test]
    async fn completion_validates_input(
        owner: Principal,
        #[case] session: &str,
        #[case] duration: &str,
        #[case] field: &str,
    ) {
        let service = service(
            MockJobInfoRepository::new(),
            MockInterviewRepository::new(),
            0,
        );

        let err = service
            .complete(
                &owner,
                InterviewId::random(),
                CompleteInterviewRequest {
                    external_session_id: session.to_owned(),
                    duration: duration.to_owned(),
                },
            )
            .await
            .expect_err("invalid");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details().and_then(|details| details.get("field")),
            Some(&json!(field))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn completion_marks_interview_completed(owner: Principal) {
        let job_info = job_info(&owner);
        let started = Interview::start(job_info.id(), "00:00:00", Utc::now()).expect("valid");
        let id = started.id;
        let mut interviews = MockInterviewRepository::new();
        interviews
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(started)));
        interviews
            .expect_record_completion()
            .withf(move |interview_id, completion| {
                *interview_id == id
                    && completion.external_session_id == "hume_123"
                    && completion.duration == "00:14:02"
            })
            .times(1)
            .returning(|_, _| Ok(true));
        let service = service(owning(&job_info), interviews, 0);

        let completed = service
            .complete(
                &owner,
                id,
                CompleteInterviewRequest {
                    external_session_id: "hume_123".to_owned(),
                    duration: "00:14:02".to_owned(),
                },
            )
            .await
            .expect("completed");

        assert!(completed.is_completed());
        assert_eq!(completed.duration, "00:14:02");
    }

    #[rstest]
    #[tokio::test]
    async fn completing_someone_elses_interview_is_forbidden(owner: Principal) {
        let job_info = job_info(&owner);
        let started = Interview::start(job_info.id(), "00:00:00", Utc::now()).expect("valid");
        let id = started.id;
        let mut interviews = MockInterviewRepository::new();
        interviews
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(started)));
        interviews.expect_record_completion().never();
        let service = service(owning(&job_info), interviews, 0);
        let intruder =
            Principal::new(UserId::new("user_other").expect("id"), FeatureClaims::default());

        let err = service
            .complete(
                &intruder,
                id,
                CompleteInterviewRequest {
                    external_session_id: "hume_123".to_owned(),
                    duration: "00:14:02".to_owned(),
                },
            )
            .await
            .expect_err("forbidden");

        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
