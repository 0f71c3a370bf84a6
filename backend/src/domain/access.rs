//! Authentication and ownership guards shared by the use-cases.

use serde_json::json;

use super::cache::{CacheKey, CacheTag, cached_read};
use super::error_mapping::map_job_info_error;
use super::ports::{ContentCache, JobInfoRepository};
use super::{Error, JobInfo, JobInfoId, Principal};

/// Message returned when no principal accompanies a request.
pub const NOT_LOGGED_IN_MESSAGE: &str = "You are not logged in";

/// Message returned when a principal touches another user's records.
pub const NO_PERMISSION_MESSAGE: &str = "You do not have permission to do this";

/// Fail with 401 unless a principal is present.
pub fn require_principal(principal: Option<&Principal>) -> Result<&Principal, Error> {
    principal.ok_or_else(|| Error::unauthorized(NOT_LOGGED_IN_MESSAGE))
}

/// Load a job context through the cache and check that `principal` owns it.
pub(crate) async fn load_owned_job_info<R>(
    repo: &R,
    cache: &dyn ContentCache,
    principal: &Principal,
    id: JobInfoId,
) -> Result<JobInfo, Error>
where
    R: JobInfoRepository + ?Sized,
{
    let found = cached_read(cache, CacheKey::job_info(id), &[CacheTag::JobInfo(id)], || async {
        repo.find_by_id(id).await.map_err(map_job_info_error)
    })
    .await?;

    let job_info = found.ok_or_else(|| {
        Error::not_found("job info not found").with_details(json!({ "jobInfoId": id }))
    })?;
    if !job_info.is_owned_by(principal.user_id()) {
        return Err(Error::forbidden(NO_PERMISSION_MESSAGE));
    }
    Ok(job_info)
}
