//! Identity-provider webhook endpoint.
//!
//! ```text
//! POST /api/v1/webhooks/identity
//! GET  /api/v1/webhooks/identity
//! ```
//!
//! Deliveries mirror user profiles into local storage. Every delivery must
//! carry a valid Svix-style signature; without a configured signing secret
//! all deliveries are refused.

mod events;
mod signature;

pub use self::events::{EventEnvelope, UserEvent};
pub use self::signature::{
    SignatureError, SignatureHeaders, TIMESTAMP_TOLERANCE_SECS, WebhookSecretError,
    WebhookVerifier,
};

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

pub const SVIX_ID_HEADER: &str = "svix-id";
pub const SVIX_TIMESTAMP_HEADER: &str = "svix-timestamp";
pub const SVIX_SIGNATURE_HEADER: &str = "svix-signature";

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

/// Receive a user lifecycle event.
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/identity",
    request_body(content = String, description = "Signed event payload", content_type = "application/json"),
    params(
        ("svix-id" = String, Header, description = "Delivery id"),
        ("svix-timestamp" = String, Header, description = "Unix timestamp of the delivery"),
        ("svix-signature" = String, Header, description = "Space-separated v1 signatures")
    ),
    responses(
        (status = 200, description = "Event processed or acknowledged"),
        (status = 400, description = "Missing headers, bad signature, or malformed event", body = Error),
        (status = 503, description = "Webhook signing secret not configured", body = Error)
    ),
    tags = ["webhooks"],
    operation_id = "receiveIdentityEvent",
    security([])
)]
#[post("/webhooks/identity")]
pub async fn receive_identity_event(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let Some(verifier) = state.webhook_verifier.as_deref() else {
        warn!("identity webhook delivered but no signing secret is configured");
        return Err(Error::service_unavailable("webhook verification is not configured"));
    };
    let headers = SignatureHeaders {
        id: header(&req, SVIX_ID_HEADER),
        timestamp: header(&req, SVIX_TIMESTAMP_HEADER),
        signature: header(&req, SVIX_SIGNATURE_HEADER),
    };
    verifier
        .verify(headers, &body, Utc::now())
        .map_err(|err| {
            debug!(error = %err, "identity webhook rejected");
            Error::invalid_request(format!("webhook verification failed: {err}"))
        })?;

    let envelope: EventEnvelope = serde_json::from_slice(&body)
        .map_err(|err| Error::invalid_request(format!("malformed webhook payload: {err}")))?;
    match UserEvent::try_from(envelope)? {
        UserEvent::Upserted(user) => {
            info!(user_id = %user.id(), "user synchronised from identity provider");
            state.accounts.sync_user(user).await?;
        }
        UserEvent::Deleted(id) => {
            info!(user_id = %id, "user removed by identity provider");
            state.accounts.remove_user(&id).await?;
        }
        UserEvent::Ignored(kind) => {
            debug!(event = %kind, "identity webhook event ignored");
        }
    }
    Ok(HttpResponse::Ok().body("Webhook received"))
}

/// Reachability check used when registering the webhook.
#[utoipa::path(
    get,
    path = "/api/v1/webhooks/identity",
    responses((status = 200, description = "Endpoint reachable")),
    tags = ["webhooks"],
    operation_id = "identityWebhookReachable",
    security([])
)]
#[get("/webhooks/identity")]
pub async fn identity_webhook_reachable() -> HttpResponse {
    HttpResponse::Ok().body("Identity webhook endpoint is working")
}
