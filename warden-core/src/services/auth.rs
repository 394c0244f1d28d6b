use crate::{
    AppId, AuthToken, Clock, Error, TokenClaims, UserId,
    crypto::{hash_password, verify_password},
    error::{AuthError, ResultExt},
    repositories::{AppRepository, UserRepository},
    validation::{require_email, require_password},
};
use chrono::Duration;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Credential validation, token issuance, admin lookup and password updates
pub struct AuthService<U: UserRepository, A: AppRepository> {
    users: Arc<U>,
    apps: Arc<A>,
    clock: Arc<dyn Clock>,
    token_ttl: Duration,
}

impl<U: UserRepository, A: AppRepository> AuthService<U, A> {
    pub fn new(users: Arc<U>, apps: Arc<A>, clock: Arc<dyn Clock>, token_ttl: Duration) -> Self {
        Self {
            users,
            apps,
            clock,
            token_ttl,
        }
    }

    /// Validate credentials and issue a token signed with the app's secret.
    ///
    /// An unknown email and a wrong password both fail with `InvalidCredentials`.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        app_id: AppId,
    ) -> Result<AuthToken, Error> {
        const OP: &str = "Auth.Login";

        if let Err(e) = require_email(email).and_then(|_| require_password(password)) {
            warn!(op = OP, email = %email, error = %e, "Invalid login request");
            return Err(e.into());
        }

        let user = self
            .users
            .find_by_email(email)
            .await
            .inspect_err(|e| log_store_failure(OP, email, e))
            .context(OP, email)?;
        let Some(user) = user else {
            warn!(op = OP, email = %email, "Login for unknown user");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(password, &user.password_hash) {
            warn!(op = OP, email = %email, "Login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let app = self
            .apps
            .find_by_id(app_id)
            .await
            .inspect_err(|e| log_store_failure(OP, email, e))
            .context(OP, email)?
            .ok_or(AuthError::AppNotFound)
            .context(OP, email)?;

        let expires_at = self.clock.now() + self.token_ttl;
        let claims = TokenClaims::new(user.id, &user.email, app.id, expires_at);
        let token = AuthToken::sign(&claims, &app.secret).inspect_err(|e| {
            error!(op = OP, email = %email, app_id, error = %e, "Failed to sign token");
        })?;

        info!(op = OP, email = %email, user_id = user.id, app_id, "User logged in");
        Ok(token)
    }

    /// Create a new unverified user.
    ///
    /// Does not issue a verification code; callers sequence that separately.
    pub async fn register_new_user(&self, email: &str, password: &str) -> Result<UserId, Error> {
        const OP: &str = "Auth.RegisterNewUser";

        if let Err(e) = require_email(email).and_then(|_| require_password(password)) {
            warn!(op = OP, email = %email, error = %e, "Invalid registration request");
            return Err(e.into());
        }

        let password_hash = hash_password(password);

        let user_id = self
            .users
            .insert(email, &password_hash)
            .await
            .inspect_err(|e| log_store_failure(OP, email, e))
            .context(OP, email)?;

        info!(op = OP, email = %email, user_id, "User registered");
        Ok(user_id)
    }

    pub async fn is_admin(&self, user_id: UserId) -> Result<bool, Error> {
        const OP: &str = "Auth.IsAdmin";

        let user = self
            .users
            .find_by_id(user_id)
            .await
            .inspect_err(|e| error!(op = OP, user_id, error = %e, "Failed to fetch user"))
            .context(OP, "")?;

        let Some(user) = user else {
            warn!(op = OP, user_id, "User not found");
            return Err(AuthError::UserNotFound.into());
        };

        Ok(user.is_admin)
    }

    /// Replace a user's password and mark them verified.
    ///
    /// Callers must have proven ownership of the email first; no code is checked here.
    pub async fn update_user(&self, email: &str, new_password: &str) -> Result<UserId, Error> {
        const OP: &str = "Auth.UpdateUser";

        if let Err(e) = require_email(email).and_then(|_| require_password(new_password)) {
            warn!(op = OP, email = %email, error = %e, "Invalid password update request");
            return Err(e.into());
        }

        let user = self
            .users
            .find_by_email(email)
            .await
            .inspect_err(|e| log_store_failure(OP, email, e))
            .context(OP, email)?
            .ok_or(AuthError::UserNotFound)
            .context(OP, email)?;

        if verify_password(new_password, &user.password_hash) {
            warn!(op = OP, email = %email, "New password matches the current one");
            return Err(AuthError::PasswordsAreEqual.into());
        }

        let user_id = self
            .users
            .update_password(email, &hash_password(new_password))
            .await
            .inspect_err(|e| log_store_failure(OP, email, e))
            .context(OP, email)?;

        info!(op = OP, email = %email, user_id, "Password updated");
        Ok(user_id)
    }
}

pub(crate) fn log_store_failure(op: &'static str, email: &str, error: &Error) {
    if error.is_storage_error() {
        error!(op, email = %email, error = %error, "Store call failed");
    } else {
        warn!(op, email = %email, error = %error, "Store rejected request");
    }
}
