//! Versioned schema migrations for warden storage backends
//!
//! A backend defines one [`Migration`] per schema change and a [`MigrationManager`] that records
//! applied versions in a tracking table. Migrations run in ascending version order; rollbacks in
//! descending order.
use async_trait::async_trait;
use sqlx::Database;
use thiserror::Error;
use warden_core::error::StorageError;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration failed: {0}")]
    Migration(String),
    #[error("Duplicate migration version {0}")]
    DuplicateVersion(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<MigrationError> for warden_core::Error {
    fn from(error: MigrationError) -> Self {
        warden_core::Error::Storage(StorageError::Migration(error.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, MigrationError>;

#[async_trait]
pub trait Migration<DB: Database>: Send + Sync {
    /// Execute the migration
    async fn up<'a>(&'a self, conn: &'a mut <DB as Database>::Connection) -> Result<()>;

    /// Rollback the migration
    async fn down<'a>(&'a self, conn: &'a mut <DB as Database>::Connection) -> Result<()>;

    /// Unique version number for ordering migrations
    fn version(&self) -> i64;

    /// Human readable name of the migration
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    /// Unix seconds
    pub applied_at: i64,
}

#[async_trait]
pub trait MigrationManager<DB: Database>: Send + Sync {
    fn get_migration_table_name(&self) -> &str {
        "_warden_migrations"
    }

    /// Initialize migration tracking table
    async fn initialize(&self) -> Result<()>;

    /// Apply pending migrations
    async fn up(&self, migrations: &[Box<dyn Migration<DB>>]) -> Result<()>;

    /// Rollback migrations
    async fn down(&self, migrations: &[Box<dyn Migration<DB>>]) -> Result<()>;

    /// Get list of applied migrations
    async fn get_applied_migrations(&self) -> Result<Vec<MigrationRecord>>;

    /// Check if specific migration was applied
    async fn is_applied(&self, version: i64) -> Result<bool>;
}

/// Versions of `migrations` in ascending order, rejecting duplicates.
pub fn ordered_versions<DB: Database>(migrations: &[Box<dyn Migration<DB>>]) -> Result<Vec<i64>> {
    let mut versions: Vec<i64> = migrations.iter().map(|m| m.version()).collect();
    versions.sort_unstable();

    if let Some(pair) = versions.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(MigrationError::DuplicateVersion(pair[0]));
    }

    Ok(versions)
}
