//! Driving port applying identity-provider user lifecycle events.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Mirror of provider-side user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountCommand: Send + Sync {
    /// Insert or refresh the mirrored user.
    async fn sync_user(&self, user: User) -> Result<(), Error>;

    /// Remove the mirrored user; content cascades with it.
    async fn remove_user(&self, id: &UserId) -> Result<(), Error>;
}
