//! Entitlement checks answered from the principal's verified feature claims.

use async_trait::async_trait;

use crate::domain::ports::{EntitlementError, EntitlementService};
use crate::domain::{Grant, Principal};

/// Answers grant checks from the `fea` claim carried by the session token.
///
/// Feature names go through [`Grant::from_feature_name`], so legacy spellings
/// count and unknown names are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClaimsEntitlementService;

#[async_trait]
impl EntitlementService for ClaimsEntitlementService {
    async fn has_grant(&self, principal: &Principal, grant: Grant) -> Result<bool, EntitlementError> {
        Ok(principal
            .features()
            .iter()
            .any(|name| Grant::from_feature_name(name) == Some(grant)))
    }
}
