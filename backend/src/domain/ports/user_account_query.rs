//! Driving port for reading the mirrored user record.

use async_trait::async_trait;

use crate::domain::{Error, Principal, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountQuery: Send + Sync {
    /// The principal's mirrored record; `not_found` until the webhook lands.
    async fn current_user(&self, principal: &Principal) -> Result<User, Error>;
}
