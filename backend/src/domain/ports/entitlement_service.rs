//! Port answering whether a principal holds a named entitlement grant.

use async_trait::async_trait;

use crate::domain::{Grant, Principal};

use super::define_port_error;

define_port_error! {
    /// Errors raised by entitlement adapters.
    pub enum EntitlementError {
        /// The authorisation service could not be reached.
        Unavailable { message: String } => "entitlement service unavailable: {message}",
        /// The authorisation service answered with something unusable.
        Malformed { message: String } => "entitlement response malformed: {message}",
    }
}

/// External authorisation service checking one grant at a time.
///
/// Callers treat any error as "not granted"; implementations should still
/// report failures rather than guessing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntitlementService: Send + Sync {
    /// Whether `principal` currently holds `grant`.
    async fn has_grant(&self, principal: &Principal, grant: Grant)
    -> Result<bool, EntitlementError>;
}

/// Fixture service that grants nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEntitlementService;

#[async_trait]
impl EntitlementService for FixtureEntitlementService {
    async fn has_grant(
        &self,
        _principal: &Principal,
        _grant: Grant,
    ) -> Result<bool, EntitlementError> {
        Ok(false)
    }
}
