//! Port for the mirrored identity-provider user table.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Storage for mirrored users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user or overwrite the stored profile.
    async fn upsert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Delete a user and, by cascade, everything they own.
    ///
    /// Returns `false` when no row matched the id.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;

    /// Find a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;
}

/// Fixture repository that accepts writes and stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn upsert(&self, _user: &User) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &UserId) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }
}
