//! Request extractor resolving the caller's [`Principal`].
//!
//! The session token is read from `Authorization: Bearer …`, falling back to
//! the identity provider's `__session` cookie. Missing or rejected tokens
//! yield an anonymous context; an unreachable verifier fails the request
//! with 503.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::ports::IdentityError;
use crate::domain::{Error, Principal, require_principal};

use super::state::HttpState;

/// Cookie set by the identity provider's frontend SDK.
pub const SESSION_COOKIE: &str = "__session";

/// The authenticated principal, if any, for the current request.
#[derive(Debug, Clone, Default)]
pub struct PrincipalContext(Option<Principal>);

impl PrincipalContext {
    pub fn new(principal: Option<Principal>) -> Self {
        Self(principal)
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> Option<Principal> {
        self.0
    }

    /// Require an authenticated principal or return `401 Unauthorized`.
    pub fn require(&self) -> Result<&Principal, Error> {
        require_principal(self.0.as_ref())
    }
}

fn session_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned);
    bearer.or_else(|| {
        req.cookie(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .filter(|token| !token.is_empty())
    })
}

impl FromRequest for PrincipalContext {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = session_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(token) = token else {
                return Ok(Self(None));
            };
            let Some(state) = state else {
                return Err(Error::internal("http state is not configured"));
            };
            match state.identity.authenticate(&token).await {
                Ok(principal) => Ok(Self(Some(principal))),
                Err(IdentityError::InvalidToken { message }) => {
                    debug!(reason = %message, "treating request as anonymous");
                    Ok(Self(None))
                }
                Err(err @ IdentityError::Unavailable { .. }) => {
                    warn!(error = %err, "identity verification unavailable");
                    Err(Error::service_unavailable("identity verification unavailable"))
                }
            }
        })
    }
}
