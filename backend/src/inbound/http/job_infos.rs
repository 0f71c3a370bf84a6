//! Job context API handlers.
//!
//! ```text
//! POST   /api/v1/job-infos
//! GET    /api/v1/job-infos
//! GET    /api/v1/job-infos/{id}
//! PUT    /api/v1/job-infos/{id}
//! DELETE /api/v1/job-infos/{id}
//! GET    /api/v1/job-infos/{id}/questions
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, ExperienceLevel, JobInfo, JobInfoFields, JobInfoId, Question};
use crate::inbound::http::ApiResult;
use crate::inbound::http::principal::PrincipalContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, parse_value, require_field};

const NAME: FieldName = FieldName::new("name");
const DESCRIPTION: FieldName = FieldName::new("description");
const EXPERIENCE_LEVEL: FieldName = FieldName::new("experienceLevel");
const ID: FieldName = FieldName::new("id");

/// Body of create and update requests.
///
/// Example JSON:
/// `{"name":"Acme","title":"Backend engineer","description":"Rust services","experienceLevel":"senior"}`
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobInfoRequest {
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "mid-level")]
    pub experience_level: Option<String>,
}

impl TryFrom<JobInfoRequest> for JobInfoFields {
    type Error = Error;

    fn try_from(value: JobInfoRequest) -> Result<Self, Self::Error> {
        let experience_level = require_field(value.experience_level, EXPERIENCE_LEVEL)?;
        Ok(Self {
            name: require_field(value.name, NAME)?,
            title: value.title,
            description: require_field(value.description, DESCRIPTION)?,
            experience_level: parse_value::<ExperienceLevel>(&experience_level, EXPERIENCE_LEVEL)?,
        })
    }
}

pub(crate) fn parse_job_info_id(raw: &str) -> Result<JobInfoId, Error> {
    parse_uuid(raw, ID).map(JobInfoId::from_uuid)
}

/// Create a job context for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/job-infos",
    request_body = JobInfoRequest,
    responses(
        (status = 201, description = "Created", body = JobInfo),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["job-infos"],
    operation_id = "createJobInfo"
)]
#[post("/job-infos")]
pub async fn create_job_info(
    state: web::Data<HttpState>,
    principal: PrincipalContext,
    payload: web::Json<JobInfoRequest>,
) -> ApiResult<HttpResponse> {
    let principal = principal.require()?;
    let fields = JobInfoFields::try_from(payload.into_inner())?;
    let created = state.job_infos.create(principal, fields).await?;
    Ok(HttpResponse::Created().json(created))
}

/// List the caller's job contexts, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/v1/job-infos",
    responses(
        (status = 200, description = "Job contexts", body = [JobInfo]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["job-infos"],
    operation_id = "listJobInfos"
)]
#[get("/job-infos")]
pub async fn list_job_infos(
    state: web::Data<HttpState>,
    principal: PrincipalContext,
) -> ApiResult<web::Json<Vec<JobInfo>>> {
    let principal = principal.require()?;
    Ok(web::Json(state.job_infos_query.list(principal).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/job-infos/{id}",
    params(("id" = String, Path, description = "Job context id")),
    responses(
        (status = 200, description = "Job context", body = JobInfo),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["job-infos"],
    operation_id = "getJobInfo"
)]
#[get("/job-infos/{id}")]
pub async fn get_job_info(
    state: web::Data<HttpState>,
    principal: PrincipalContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<JobInfo>> {
    let principal = principal.require()?;
    let id = parse_job_info_id(&path)?;
    Ok(web::Json(state.job_infos_query.get(principal, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/job-infos/{id}",
    params(("id" = String, Path, description = "Job context id")),
    request_body = JobInfoRequest,
    responses(
        (status = 200, description = "Updated", body = JobInfo),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["job-infos"],
    operation_id = "updateJobInfo"
)]
#[put("/job-infos/{id}")]
pub async fn update_job_info(
    state: web::Data<HttpState>,
    principal: PrincipalContext,
    path: web::Path<String>,
    payload: web::Json<JobInfoRequest>,
) -> ApiResult<web::Json<JobInfo>> {
    let principal = principal.require()?;
    let id = parse_job_info_id(&path)?;
    let fields = JobInfoFields::try_from(payload.into_inner())?;
    Ok(web::Json(state.job_infos.update(principal, id, fields).await?))
}

/// Delete a job context with its questions and interviews.
#[utoipa::path(
    delete,
    path = "/api/v1/job-infos/{id}",
    params(("id" = String, Path, description = "Job context id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["job-infos"],
    operation_id = "deleteJobInfo"
)]
#[delete("/job-infos/{id}")]
pub async fn delete_job_info(
    state: web::Data<HttpState>,
    principal: PrincipalContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let principal = principal.require()?;
    let id = parse_job_info_id(&path)?;
    state.job_infos.delete(principal, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Questions of a job context in creation order.
#[utoipa::path(
    get,
    path = "/api/v1/job-infos/{id}/questions",
    params(("id" = String, Path, description = "Job context id")),
    responses(
        (status = 200, description = "Questions", body = [Question]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["job-infos"],
    operation_id = "listJobInfoQuestions"
)]
#[get("/job-infos/{id}/questions")]
pub async fn list_questions(
    state: web::Data<HttpState>,
    principal: PrincipalContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Question>>> {
    let principal = principal.require()?;
    let id = parse_job_info_id(&path)?;
    Ok(web::Json(
        state.job_infos_query.list_questions(principal, id).await?,
    ))
}

#[cfg(test)]
#[path = "job_infos_tests.rs"]
mod tests;
