use crate::{Error, VerificationRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Verification store: one pending record per email
#[async_trait]
pub trait VerificationRepository: Send + Sync + 'static {
    /// Insert a record or replace the pending one for the same email.
    ///
    /// Must be a single atomic operation so concurrent writers leave exactly one record. Fails
    /// with `AuthError::UserNotFound` when the email does not belong to a user.
    async fn upsert(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationRecord, Error>;

    /// Fetch the pending record for an email
    async fn find(&self, email: &str) -> Result<Option<VerificationRecord>, Error>;

    /// Delete the pending record for an email. Deleting a missing record succeeds.
    async fn delete(&self, email: &str) -> Result<(), Error>;
}
