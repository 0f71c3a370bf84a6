//! Port resolving a presented session token into a [`Principal`].
//!
//! Authentication itself is delegated to an external identity provider; this
//! port only verifies what the provider issued.

use async_trait::async_trait;

use crate::domain::Principal;

use super::define_port_error;

define_port_error! {
    /// Errors raised while verifying session tokens.
    pub enum IdentityError {
        /// The token is malformed, expired, or not signed by the provider.
        InvalidToken { message: String } => "session token rejected: {message}",
        /// Verification material is unavailable.
        Unavailable { message: String } => "identity verification unavailable: {message}",
    }
}

/// Verifies identity-provider session tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the principal a token was issued for.
    async fn authenticate(&self, token: &str) -> Result<Principal, IdentityError>;
}

/// Fixture provider used when no verification key is configured: every token
/// is rejected, so all protected endpoints answer 401.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn authenticate(&self, _token: &str) -> Result<Principal, IdentityError> {
        Err(IdentityError::invalid_token("no session verification key configured"))
    }
}
