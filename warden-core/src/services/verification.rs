use crate::{
    Clock, Error, UserId, VerificationRecord,
    crypto::constant_time_compare,
    error::{ResultExt, VerificationError},
    repositories::{UserRepository, VerificationRepository},
    services::auth::log_store_failure,
    validation::{require_code, require_email, require_expires_at},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Lifecycle of one-time verification codes
///
/// Per email the state moves from no record, to pending on [`store_verification`], and back to
/// no record when a code is consumed with deletion, observed expired, or force-deleted.
///
/// [`store_verification`]: VerificationService::store_verification
pub struct VerificationService<V: VerificationRepository, U: UserRepository> {
    verifications: Arc<V>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<V: VerificationRepository, U: UserRepository> VerificationService<V, U> {
    pub fn new(verifications: Arc<V>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            verifications,
            users,
            clock,
        }
    }

    /// Persist a code for an email, replacing any pending one.
    ///
    /// Code generation is the caller's job. An email without a user fails with `UserNotFound`.
    pub async fn store_verification(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationRecord, Error> {
        const OP: &str = "Verification.Store";

        if let Err(e) = require_email(email)
            .and_then(|_| require_code(code))
            .and_then(|_| require_expires_at(expires_at))
        {
            warn!(op = OP, email = %email, error = %e, "Invalid verification request");
            return Err(e.into());
        }

        let record = self
            .verifications
            .upsert(email, code, expires_at)
            .await
            .inspect_err(|e| log_store_failure(OP, email, e))
            .context(OP, email)?;

        info!(op = OP, email = %email, expires_at = %record.expires_at, "Verification stored");
        Ok(record)
    }

    /// Match a code against the pending record and mark the user verified.
    ///
    /// A mismatch leaves the record in place for retries. An expired record is deleted and
    /// reported as expired even if that delete fails. With `delete_after_attempt` the record is
    /// consumed on success; otherwise it stays until [`delete_verification`] runs.
    ///
    /// [`delete_verification`]: VerificationService::delete_verification
    pub async fn verify(
        &self,
        email: &str,
        code: &str,
        delete_after_attempt: bool,
    ) -> Result<UserId, Error> {
        const OP: &str = "Verification.Verify";

        if let Err(e) = require_email(email).and_then(|_| require_code(code)) {
            warn!(op = OP, email = %email, error = %e, "Invalid verification attempt");
            return Err(e.into());
        }

        let record = self
            .verifications
            .find(email)
            .await
            .inspect_err(|e| log_store_failure(OP, email, e))
            .context(OP, email)?;

        let Some(record) = record else {
            warn!(op = OP, email = %email, "No pending verification");
            return Err(VerificationError::NotFound.into());
        };

        if !constant_time_compare(&record.code, code) {
            warn!(op = OP, email = %email, "Verification code mismatch");
            return Err(VerificationError::CodesDiffer.into());
        }

        if record.is_expired(self.clock.now()) {
            if let Err(e) = self.verifications.delete(email).await {
                warn!(op = OP, email = %email, error = %e, "Failed to delete expired verification");
            }
            warn!(op = OP, email = %email, expires_at = %record.expires_at, "Verification expired");
            return Err(VerificationError::Expired.into());
        }

        let user_id = self
            .users
            .mark_verified(email)
            .await
            .inspect_err(|e| log_store_failure(OP, email, e))
            .context(OP, email)?;

        if delete_after_attempt {
            self.verifications
                .delete(email)
                .await
                .inspect_err(|e| log_store_failure(OP, email, e))
                .context(OP, email)?;
        }

        info!(op = OP, email = %email, user_id, consumed = delete_after_attempt, "User verified");
        Ok(user_id)
    }

    /// Remove the pending record for an email. Succeeds when there is none.
    pub async fn delete_verification(&self, email: &str) -> Result<(), Error> {
        const OP: &str = "Verification.Delete";

        if let Err(e) = require_email(email) {
            warn!(op = OP, error = %e, "Invalid delete request");
            return Err(e.into());
        }

        self.verifications
            .delete(email)
            .await
            .inspect_err(|e| log_store_failure(OP, email, e))
            .context(OP, email)?;

        info!(op = OP, email = %email, "Verification deleted");
        Ok(())
    }
}
