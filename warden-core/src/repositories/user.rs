use crate::{Error, User, UserId};
use async_trait::async_trait;

/// Credential store access for users
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error>;

    /// Find a user by ID
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error>;

    /// Insert a new unverified, non-admin user.
    ///
    /// Fails with `AuthError::UserExists` when the email is already taken.
    async fn insert(&self, email: &str, password_hash: &str) -> Result<UserId, Error>;

    /// Replace the password hash and mark the user verified.
    ///
    /// Fails with `AuthError::UserNotFound` when no user has this email.
    async fn update_password(&self, email: &str, password_hash: &str) -> Result<UserId, Error>;

    /// Mark the user verified.
    ///
    /// Fails with `AuthError::UserNotFound` when no user has this email.
    async fn mark_verified(&self, email: &str) -> Result<UserId, Error>;
}
