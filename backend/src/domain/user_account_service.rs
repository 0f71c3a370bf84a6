//! Mirrored user accounts maintained from identity-provider webhooks.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::cache::{CacheKey, CacheTag, cached_read};
use super::error_mapping::map_user_error;
use super::ports::{ContentCache, UserAccountCommand, UserAccountQuery, UserRepository};
use super::{Error, Principal, User, UserId};

/// User account service implementing the command and query driving ports.
#[derive(Clone)]
pub struct UserAccountService<U: ?Sized> {
    users: Arc<U>,
    cache: Arc<dyn ContentCache>,
}

impl<U: ?Sized> UserAccountService<U> {
    pub fn new(users: Arc<U>, cache: Arc<dyn ContentCache>) -> Self {
        Self { users, cache }
    }
}

#[async_trait]
impl<U> UserAccountCommand for UserAccountService<U>
where
    U: UserRepository + ?Sized,
{
    async fn sync_user(&self, user: User) -> Result<(), Error> {
        self.users.upsert(&user).await.map_err(map_user_error)?;
        self.cache.invalidate(&[CacheTag::User(user.id().clone())]).await;
        info!(user_id = %user.id(), "user synchronised");
        Ok(())
    }

    async fn remove_user(&self, id: &UserId) -> Result<(), Error> {
        let removed = self.users.delete(id).await.map_err(map_user_error)?;
        self.cache
            .invalidate(&[CacheTag::User(id.clone()), CacheTag::UserJobInfos(id.clone())])
            .await;
        info!(user_id = %id, removed, "user removed");
        Ok(())
    }
}

#[async_trait]
impl<U> UserAccountQuery for UserAccountService<U>
where
    U: UserRepository + ?Sized,
{
    async fn current_user(&self, principal: &Principal) -> Result<User, Error> {
        let id = principal.user_id();
        let found = cached_read(
            self.cache.as_ref(),
            CacheKey::user(id),
            &[CacheTag::User(id.clone())],
            || async { self.users.find_by_id(id).await.map_err(map_user_error) },
        )
        .await?;
        found.ok_or_else(|| Error::not_found("user not found").with_details(json!({ "userId": id })))
    }
}
