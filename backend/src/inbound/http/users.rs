//! Users API handlers.
//!
//! ```text
//! GET /api/v1/users/me
//! GET /api/v1/users/me/plan
//! ```

use actix_web::{get, web};

use crate::domain::ports::PlanSummary;
use crate::domain::{Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::principal::PrincipalContext;
use crate::inbound::http::state::HttpState;

/// The caller's mirrored profile.
///
/// Answers 404 until the identity provider's `user.created` webhook has been
/// processed, so onboarding clients poll this endpoint.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use darasa::inbound::http::users::current_user;
///
/// let app = App::new().service(current_user);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Profile not synchronised yet", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    principal: PrincipalContext,
) -> ApiResult<web::Json<User>> {
    let principal = principal.require()?;
    Ok(web::Json(state.accounts_query.current_user(principal).await?))
}

/// Plan tier and per-action permissions for the caller.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/plan",
    responses(
        (status = 200, description = "Plan summary", body = PlanSummary),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentPlan"
)]
#[get("/users/me/plan")]
pub async fn current_plan(
    state: web::Data<HttpState>,
    principal: PrincipalContext,
) -> ApiResult<web::Json<PlanSummary>> {
    let principal = principal.require()?;
    Ok(web::Json(state.plan.summarize(principal).await))
}
