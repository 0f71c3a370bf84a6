//! Interview API handlers.
//!
//! ```text
//! POST  /api/v1/job-infos/{id}/interviews {"duration":"00:00:00"}
//! PATCH /api/v1/interviews/{id} {"externalSessionId":"…","duration":"00:12:31"}
//! GET   /api/v1/job-infos/{id}/interviews
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CompleteInterviewRequest;
use crate::domain::{Error, Interview, InterviewId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::job_infos::parse_job_info_id;
use crate::inbound::http::principal::PrincipalContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require_field};

const DURATION: FieldName = FieldName::new("duration");
const EXTERNAL_SESSION_ID: FieldName = FieldName::new("externalSessionId");
const ID: FieldName = FieldName::new("id");

/// Body of `POST /api/v1/job-infos/{id}/interviews`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartInterviewBody {
    #[schema(example = "00:00:00")]
    pub duration: Option<String>,
}

/// Body of `PATCH /api/v1/interviews/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteInterviewBody {
    pub external_session_id: Option<String>,
    #[schema(example = "00:12:31")]
    pub duration: Option<String>,
}

impl TryFrom<CompleteInterviewBody> for CompleteInterviewRequest {
    type Error = Error;

    fn try_from(value: CompleteInterviewBody) -> Result<Self, Self::Error> {
        Ok(Self {
            external_session_id: require_field(value.external_session_id, EXTERNAL_SESSION_ID)?,
            duration: require_field(value.duration, DURATION)?,
        })
    }
}

/// Start an interview for a job context. Quota-gated.
#[utoipa::path(
    post,
    path = "/api/v1/job-infos/{id}/interviews",
    params(("id" = String, Path, description = "Job context id")),
    request_body = StartInterviewBody,
    responses(
        (status = 201, description = "Interview started", body = Interview),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Plan limit reached or not the owner", body = Error),
        (status = 404, description = "Job context not found", body = Error)
    ),
    tags = ["interviews"],
    operation_id = "startInterview"
)]
#[post("/job-infos/{id}/interviews")]
pub async fn start_interview(
    state: web::Data<HttpState>,
    principal: PrincipalContext,
    path: web::Path<String>,
    payload: web::Json<StartInterviewBody>,
) -> ApiResult<HttpResponse> {
    let principal = principal.require()?;
    let job_info_id = parse_job_info_id(&path)?;
    let duration = require_field(payload.into_inner().duration, DURATION)?;
    let interview = state
        .interviews
        .start(principal, job_info_id, duration)
        .await?;
    Ok(HttpResponse::Created().json(interview))
}

/// Attach the voice session to an interview, marking it completed.
#[utoipa::path(
    patch,
    path = "/api/v1/interviews/{id}",
    params(("id" = String, Path, description = "Interview id")),
    request_body = CompleteInterviewBody,
    responses(
        (status = 200, description = "Interview completed", body = Interview),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Interview not found", body = Error)
    ),
    tags = ["interviews"],
    operation_id = "completeInterview"
)]
#[patch("/interviews/{id}")]
pub async fn complete_interview(
    state: web::Data<HttpState>,
    principal: PrincipalContext,
    path: web::Path<String>,
    payload: web::Json<CompleteInterviewBody>,
) -> ApiResult<web::Json<Interview>> {
    let principal = principal.require()?;
    let id = InterviewId::from_uuid(parse_uuid(&path, ID)?);
    let request = CompleteInterviewRequest::try_from(payload.into_inner())?;
    Ok(web::Json(
        state.interviews.complete(principal, id, request).await?,
    ))
}

/// Completed interviews of a job context, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/job-infos/{id}/interviews",
    params(("id" = String, Path, description = "Job context id")),
    responses(
        (status = 200, description = "Completed interviews", body = [Interview]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Job context not found", body = Error)
    ),
    tags = ["interviews"],
    operation_id = "listInterviews"
)]
#[get("/job-infos/{id}/interviews")]
pub async fn list_interviews(
    state: web::Data<HttpState>,
    principal: PrincipalContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Interview>>> {
    let principal = principal.require()?;
    let job_info_id = parse_job_info_id(&path)?;
    Ok(web::Json(
        state
            .interviews_query
            .list_completed(principal, job_info_id)
            .await?,
    ))
}
