use std::{
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::sync::Mutex;
use warden::{AppId, ManualClock, SqliteRepositoryProvider, Warden, WardenMailer};
use warden_core::repositories::{
    AppRepositoryProvider, RepositoryProvider, VerificationRepository,
    VerificationRepositoryProvider,
};
use warden_mailer::{Email, Mailer, MailerError, TemplateContext};

pub const APP_SECRET: &str = "test-app-secret";

/// Captures every email instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
    failing: AtomicBool,
}

impl RecordingMailer {
    pub async fn sent(&self) -> Vec<Email> {
        self.sent.lock().await.clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_email(&self, email: Email) -> Result<(), MailerError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailerError::Config("relay unavailable".to_string()));
        }
        self.sent.lock().await.push(email);
        Ok(())
    }
}

pub struct Harness {
    pub warden: Warden<SqliteRepositoryProvider>,
    pub mailer: Arc<RecordingMailer>,
    pub clock: ManualClock,
    pub app_id: AppId,
}

impl Harness {
    /// The code currently pending for `email`, read straight from the store.
    pub async fn pending_code(&self, email: &str) -> Option<String> {
        self.warden
            .repositories()
            .verification()
            .find(email)
            .await
            .expect("Failed to read verification")
            .map(|record| record.code)
    }

    pub async fn verification_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM verifications")
            .fetch_one(self.warden.repositories().pool())
            .await
            .expect("Failed to count verifications")
    }
}

pub async fn provider() -> Arc<SqliteRepositoryProvider> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Invalid connection string")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to connect to SQLite");

    let provider = Arc::new(SqliteRepositoryProvider::new(pool));
    provider.migrate().await.expect("Migration failed");
    provider
}

pub async fn harness() -> Harness {
    let repositories = provider().await;
    let app_id = repositories
        .app()
        .insert("web", APP_SECRET)
        .await
        .expect("Failed to register app");

    let mailer = Arc::new(RecordingMailer::default());
    let clock = ManualClock::default();

    let warden = Warden::new(repositories)
        .with_clock(Arc::new(clock.clone()))
        .with_mailer(WardenMailer::new(
            Box::new(mailer.clone()),
            "Warden <noreply@example.com>",
            TemplateContext::default(),
        ));

    Harness {
        warden,
        mailer,
        clock,
        app_id,
    }
}
