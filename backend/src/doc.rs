//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every annotated handler together with the domain
//! schemas they exchange. The document backs Swagger UI in debug builds and
//! is exported by `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{PlanPermissions, PlanSummary};
use crate::domain::{
    Error, ErrorCode, ExperienceLevel, Interview, JobInfo, Question, QuestionDifficulty, Tier,
    User,
};
use crate::inbound::http::generation::{GenerateFeedbackBody, GenerateQuestionBody};
use crate::inbound::http::interviews::{CompleteInterviewBody, StartInterviewBody};
use crate::inbound::http::job_infos::JobInfoRequest;
use crate::inbound::http::principal::SESSION_COOKIE;

/// Register the bearer token and session cookie schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Identity-provider session token."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE,
                "Session cookie set by the identity provider's frontend SDK.",
            ))),
        );
    }
}

/// OpenAPI document for the REST and streaming API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Darasa backend API",
        description = "Job contexts, quota-gated AI question and feedback generation, mock interviews, and plan information."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionToken" = []), ("SessionCookie" = [])),
    paths(
        crate::inbound::http::job_infos::create_job_info,
        crate::inbound::http::job_infos::list_job_infos,
        crate::inbound::http::job_infos::get_job_info,
        crate::inbound::http::job_infos::update_job_info,
        crate::inbound::http::job_infos::delete_job_info,
        crate::inbound::http::job_infos::list_questions,
        crate::inbound::http::generation::generate_question,
        crate::inbound::http::generation::generate_feedback,
        crate::inbound::http::interviews::start_interview,
        crate::inbound::http::interviews::complete_interview,
        crate::inbound::http::interviews::list_interviews,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::current_plan,
        crate::inbound::http::webhooks::receive_identity_event,
        crate::inbound::http::webhooks::identity_webhook_reachable,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        JobInfo,
        ExperienceLevel,
        JobInfoRequest,
        Question,
        QuestionDifficulty,
        Interview,
        StartInterviewBody,
        CompleteInterviewBody,
        GenerateQuestionBody,
        GenerateFeedbackBody,
        PlanSummary,
        PlanPermissions,
        Tier,
    )),
    tags(
        (name = "job-infos", description = "Job contexts owned by the caller"),
        (name = "generation", description = "Streaming AI question and feedback generation"),
        (name = "interviews", description = "Mock interview sessions"),
        (name = "users", description = "Current user and plan"),
        (name = "webhooks", description = "Identity-provider callbacks"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
