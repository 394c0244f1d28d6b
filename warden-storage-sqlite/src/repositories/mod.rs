//! Repository implementations for SQLite storage

pub mod app;
pub mod user;
pub mod verification;

pub use app::SqliteAppRepository;
pub use user::SqliteUserRepository;
pub use verification::SqliteVerificationRepository;

use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use std::{path::Path, sync::Arc, time::Duration};
use warden_core::{
    Error,
    error::StorageError,
    repositories::{
        AppRepositoryProvider, RepositoryProvider, UserRepositoryProvider,
        VerificationRepositoryProvider,
    },
};

use crate::{error::map_sqlx_err, migrations::SqliteMigrationManager};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Repository provider implementation for SQLite
///
/// Implements every individual repository provider trait as well as the unified
/// [`RepositoryProvider`] trait over a single pool.
pub struct SqliteRepositoryProvider {
    pool: SqlitePool,
    user: Arc<SqliteUserRepository>,
    app: Arc<SqliteAppRepository>,
    verification: Arc<SqliteVerificationRepository>,
}

impl SqliteRepositoryProvider {
    pub fn new(pool: SqlitePool) -> Self {
        let user = Arc::new(SqliteUserRepository::new(pool.clone()));
        let app = Arc::new(SqliteAppRepository::new(pool.clone()));
        let verification = Arc::new(SqliteVerificationRepository::new(pool.clone()));

        Self {
            pool,
            user,
            app,
            verification,
        }
    }

    /// Open (creating if missing) the database file at `path`.
    ///
    /// Connections share the file in WAL mode and wait on each other's write locks instead of
    /// failing with `SQLITE_BUSY`.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self, Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to open SQLite database");
                Error::Storage(StorageError::Connection(e.to_string()))
            })?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool. Calls still waiting on a connection fail as cancelled.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl UserRepositoryProvider for SqliteRepositoryProvider {
    type UserRepo = SqliteUserRepository;

    fn user(&self) -> &Self::UserRepo {
        &self.user
    }
}

impl AppRepositoryProvider for SqliteRepositoryProvider {
    type AppRepo = SqliteAppRepository;

    fn app(&self) -> &Self::AppRepo {
        &self.app
    }
}

impl VerificationRepositoryProvider for SqliteRepositoryProvider {
    type VerificationRepo = SqliteVerificationRepository;

    fn verification(&self) -> &Self::VerificationRepo {
        &self.verification
    }
}

#[async_trait]
impl RepositoryProvider for SqliteRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        use warden_migration::MigrationManager;

        let manager = SqliteMigrationManager::new(self.pool.clone());
        manager.initialize().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize migrations");
            Error::Storage(StorageError::Migration(
                "Failed to initialize migrations".to_string(),
            ))
        })?;

        manager
            .up(&crate::migrations::all())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to run migrations");
                Error::from(e)
            })?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(())
    }
}
