//! # Warden
//!
//! Warden issues and validates user credentials and time-boxed one-time verification codes.
//! [`Warden`] wires the credential and verification services from a storage backend and runs
//! the composite flows callers need:
//!
//! - register a user and email them a verification code
//! - re-issue a code for an existing email
//! - confirm an email with a code
//! - reset a password after proving ownership of the email
//!
//! Every flow runs under a request timeout. A flow that runs past it fails with
//! [`ErrorKind::Cancelled`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use warden::{SqliteRepositoryProvider, Warden};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repositories = Arc::new(SqliteRepositoryProvider::connect("./warden.db").await?);
//!     let warden = Warden::new(repositories);
//!     warden.migrate().await?;
//!
//!     let token = warden.login("a@x.com", "p1", 1).await?;
//!     println!("{token}");
//!     Ok(())
//! }
//! ```
pub mod config;

use std::{future::Future, sync::Arc};

use chrono::Duration;
use tracing::{error, info, warn};
use warden_core::repositories::{
    AppRepositoryAdapter, UserRepositoryAdapter, VerificationRepositoryAdapter,
};
use warden_mailer::{Mailer, MailerService};

pub use config::{ConfigError, Env, WardenConfig};
pub use warden_core::{
    App, AppId, AuthService, AuthToken, Clock, Error, ErrorKind, ManualClock, SystemClock,
    TokenClaims, User, UserId, VerificationPolicy, VerificationRecord, VerificationService,
};
pub use warden_core::repositories::{self, RepositoryProvider};
pub use warden_mailer::MailerConfig;

#[cfg(feature = "sqlite")]
pub use warden_storage_sqlite::SqliteRepositoryProvider;

/// Mail service used for verification codes.
pub type WardenMailer = MailerService<Box<dyn Mailer>>;

pub type Auth<R> = AuthService<UserRepositoryAdapter<R>, AppRepositoryAdapter<R>>;
pub type Verification<R> =
    VerificationService<VerificationRepositoryAdapter<R>, UserRepositoryAdapter<R>>;

const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// The coordinator that owns the services and sequences the composite flows.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use warden::{SqliteRepositoryProvider, Warden, WardenMailer, MailerConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let repositories = Arc::new(SqliteRepositoryProvider::connect("./warden.db").await?);
/// let mailer = WardenMailer::from_config(&MailerConfig::from_env()?)?;
///
/// let warden = Warden::new(repositories)
///     .with_token_ttl(chrono::Duration::minutes(30))
///     .with_mailer(mailer);
///
/// let user_id = warden.register("a@x.com", "p1").await?;
/// # Ok(())
/// # }
/// ```
pub struct Warden<R: RepositoryProvider> {
    repositories: Arc<R>,
    auth: Arc<Auth<R>>,
    verification: Arc<Verification<R>>,
    mailer: Option<Arc<WardenMailer>>,
    clock: Arc<dyn Clock>,
    token_ttl: Duration,
    policy: VerificationPolicy,
    request_timeout: std::time::Duration,
}

impl<R: RepositoryProvider> Warden<R> {
    /// Create a new Warden over a repository provider
    ///
    /// Uses the system clock, a one hour token lifetime, the default verification policy and a
    /// ten second request timeout. No mailer is configured; flows that send a code fail with
    /// `DeliveryError` until one is set with [`Warden::with_mailer`].
    pub fn new(repositories: Arc<R>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let token_ttl = Duration::hours(1);
        let (auth, verification) = build_services(&repositories, &clock, token_ttl);

        Self {
            repositories,
            auth,
            verification,
            mailer: None,
            clock,
            token_ttl,
            policy: VerificationPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Apply the token lifetime, verification policy and request timeout of a config file
    pub fn with_config(self, config: &WardenConfig) -> Self {
        self.with_token_ttl(config.token_ttl())
            .with_verification_policy(config.verification_policy())
            .with_request_timeout(config.request_timeout())
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self.rebuild();
        self
    }

    pub fn with_verification_policy(mut self, policy: VerificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_request_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_mailer(mut self, mailer: WardenMailer) -> Self {
        self.mailer = Some(Arc::new(mailer));
        self
    }

    /// Replace the time source used for token expiry and code expiry
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self.rebuild();
        self
    }

    fn rebuild(&mut self) {
        let (auth, verification) = build_services(&self.repositories, &self.clock, self.token_ttl);
        self.auth = auth;
        self.verification = verification;
    }

    pub fn repositories(&self) -> &Arc<R> {
        &self.repositories
    }

    pub fn auth(&self) -> &Auth<R> {
        &self.auth
    }

    pub fn verification(&self) -> &Verification<R> {
        &self.verification
    }

    /// Run migrations for all repositories
    pub async fn migrate(&self) -> Result<(), Error> {
        self.repositories.migrate().await
    }

    /// Health check for all repositories
    pub async fn health_check(&self) -> Result<(), Error> {
        self.bounded(self.repositories.health_check()).await
    }

    /// Validate credentials and issue a token signed with the app's secret
    ///
    /// # Arguments
    ///
    /// * `email` - The email the user registered with
    /// * `password` - The plaintext password
    /// * `app_id` - The app whose secret signs the token
    ///
    /// # Returns
    ///
    /// The signed token, or `InvalidCredentials` for an unknown email or a wrong password
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        app_id: AppId,
    ) -> Result<AuthToken, Error> {
        self.bounded(self.auth.login(email, password, app_id)).await
    }

    /// Register a user and email them a verification code
    ///
    /// When storing or sending the code fails the user stays registered and unverified; a new
    /// code can be requested with [`Warden::create_verification`].
    ///
    /// # Returns
    ///
    /// The id of the new user
    pub async fn register(&self, email: &str, password: &str) -> Result<UserId, Error> {
        self.bounded(async {
            let user_id = self.auth.register_new_user(email, password).await?;
            self.issue_code(email).await?;
            Ok(user_id)
        })
        .await
    }

    pub async fn is_admin(&self, user_id: UserId) -> Result<bool, Error> {
        self.bounded(self.auth.is_admin(user_id)).await
    }

    /// Issue a fresh code for an existing email, superseding any pending one, and send it
    pub async fn create_verification(&self, email: &str) -> Result<(), Error> {
        self.bounded(self.issue_code(email)).await
    }

    /// Confirm an email with a code; the code is consumed on success
    pub async fn verify_mail(&self, email: &str, code: &str) -> Result<UserId, Error> {
        self.bounded(self.verification.verify(email, code, true)).await
    }

    /// Change a password after proving ownership of the email with a code
    ///
    /// The code stays pending until the new password is stored, so a rejected password (for
    /// example `PasswordsAreEqual`) can be retried with the same code.
    ///
    /// # Returns
    ///
    /// The id of the updated user
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<UserId, Error> {
        self.bounded(async {
            self.verification.verify(email, code, false).await?;
            let user_id = self.auth.update_user(email, new_password).await?;
            self.verification.delete_verification(email).await?;
            info!(email = %email, user_id, "Password reset");
            Ok(user_id)
        })
        .await
    }

    async fn issue_code(&self, email: &str) -> Result<(), Error> {
        let (code, expires_at) = self.policy.issue(self.clock.now());
        self.verification
            .store_verification(email, &code, expires_at)
            .await?;
        self.send_code(email, &code).await
    }

    async fn send_code(&self, email: &str, code: &str) -> Result<(), Error> {
        let Some(mailer) = &self.mailer else {
            error!(email = %email, "No mailer configured; verification code not sent");
            return Err(Error::Delivery("no mailer configured".to_string()));
        };

        mailer
            .send_verification_code(email, code, self.policy.ttl_hours())
            .await
            .map_err(|e| {
                error!(email = %email, error = %e, "Failed to send verification code");
                Error::Delivery(e.to_string())
            })
    }

    /// Run a flow under the request timeout. Dropping the flow cancels its store call.
    async fn bounded<T>(&self, flow: impl Future<Output = Result<T, Error>>) -> Result<T, Error> {
        match tokio::time::timeout(self.request_timeout, flow).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_ms = self.request_timeout.as_millis() as u64,
                    "Request timed out"
                );
                Err(Error::Cancelled)
            }
        }
    }
}

fn build_services<R: RepositoryProvider>(
    repositories: &Arc<R>,
    clock: &Arc<dyn Clock>,
    token_ttl: Duration,
) -> (Arc<Auth<R>>, Arc<Verification<R>>) {
    let users = Arc::new(UserRepositoryAdapter::new(repositories.clone()));
    let apps = Arc::new(AppRepositoryAdapter::new(repositories.clone()));
    let verifications = Arc::new(VerificationRepositoryAdapter::new(repositories.clone()));

    let auth = Arc::new(AuthService::new(
        users.clone(),
        apps,
        clock.clone(),
        token_ttl,
    ));
    let verification = Arc::new(VerificationService::new(verifications, users, clock.clone()));

    (auth, verification)
}
