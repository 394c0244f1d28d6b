use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Database, Sqlite, SqlitePool};
use warden_migration::{
    Migration, MigrationError, MigrationManager, MigrationRecord, ordered_versions,
};

/// Records applied versions in `_warden_migrations` and applies each migration in its own
/// transaction together with its bookkeeping row.
pub struct SqliteMigrationManager {
    pool: SqlitePool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

impl SqliteMigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Migrations of `migrations` whose applied state differs from `direction`, in the order
    /// they must run.
    async fn pending<'m>(
        &self,
        migrations: &'m [Box<dyn Migration<Sqlite>>],
        direction: Direction,
    ) -> Result<Vec<&'m dyn Migration<Sqlite>>, MigrationError> {
        let mut pending = Vec::new();
        for migration in migrations {
            let applied = self.is_applied(migration.version()).await?;
            if applied == (direction == Direction::Down) {
                pending.push(migration.as_ref());
            }
        }

        match direction {
            Direction::Up => pending.sort_by_key(|m| m.version()),
            Direction::Down => pending.sort_by_key(|m| std::cmp::Reverse(m.version())),
        }
        Ok(pending)
    }

    async fn apply(
        &self,
        migration: &dyn Migration<Sqlite>,
        direction: Direction,
    ) -> Result<(), MigrationError> {
        let table = self.get_migration_table_name();
        let mut tx = self.pool.begin().await?;

        match direction {
            Direction::Up => {
                tracing::info!(
                    version = migration.version(),
                    name = migration.name(),
                    "Applying migration"
                );
                migration.up(&mut tx).await?;
                sqlx::query(&format!(
                    "INSERT INTO {table} (version, name, applied_at) VALUES (?1, ?2, ?3)"
                ))
                .bind(migration.version())
                .bind(migration.name())
                .bind(Utc::now().timestamp())
                .execute(&mut *tx)
                .await?;
            }
            Direction::Down => {
                tracing::info!(
                    version = migration.version(),
                    name = migration.name(),
                    "Reverting migration"
                );
                migration.down(&mut tx).await?;
                sqlx::query(&format!("DELETE FROM {table} WHERE version = ?1"))
                    .bind(migration.version())
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Every schema migration of this backend, in version order.
pub(crate) fn all() -> Vec<Box<dyn Migration<Sqlite>>> {
    vec![
        Box::new(CreateUsersTable),
        Box::new(CreateAppsTable),
        Box::new(CreateVerificationsTable),
    ]
}

#[async_trait]
impl MigrationManager<Sqlite> for SqliteMigrationManager {
    async fn initialize(&self) -> Result<(), MigrationError> {
        let table = self.get_migration_table_name();
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at INTEGER NOT NULL
            )"
        ))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn up(&self, migrations: &[Box<dyn Migration<Sqlite>>]) -> Result<(), MigrationError> {
        ordered_versions(migrations)?;
        for migration in self.pending(migrations, Direction::Up).await? {
            self.apply(migration, Direction::Up).await?;
        }
        Ok(())
    }

    async fn down(&self, migrations: &[Box<dyn Migration<Sqlite>>]) -> Result<(), MigrationError> {
        for migration in self.pending(migrations, Direction::Down).await? {
            self.apply(migration, Direction::Down).await?;
        }
        Ok(())
    }

    async fn get_applied_migrations(&self) -> Result<Vec<MigrationRecord>, MigrationError> {
        let table = self.get_migration_table_name();
        let records = sqlx::query_as::<_, MigrationRecord>(&format!(
            "SELECT version, name, applied_at FROM {table} ORDER BY version"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn is_applied(&self, version: i64) -> Result<bool, MigrationError> {
        let table = self.get_migration_table_name();
        let applied: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE version = ?1)"
        ))
        .bind(version)
        .fetch_one(&self.pool)
        .await?;
        Ok(applied)
    }
}

pub struct CreateUsersTable;

#[async_trait]
impl Migration<Sqlite> for CreateUsersTable {
    fn version(&self) -> i64 {
        1
    }

    fn name(&self) -> &str {
        "CreateUsersTable"
    }

    async fn up<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                pass_hash TEXT NOT NULL,
                is_admin INTEGER NOT NULL DEFAULT 0,
                is_verified INTEGER NOT NULL DEFAULT 0
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query("DROP TABLE IF EXISTS users")
            .execute(conn)
            .await?;
        Ok(())
    }
}

pub struct CreateAppsTable;

#[async_trait]
impl Migration<Sqlite> for CreateAppsTable {
    fn version(&self) -> i64 {
        2
    }

    fn name(&self) -> &str {
        "CreateAppsTable"
    }

    async fn up<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS apps (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                secret TEXT NOT NULL UNIQUE
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query("DROP TABLE IF EXISTS apps")
            .execute(conn)
            .await?;
        Ok(())
    }
}

pub struct CreateVerificationsTable;

#[async_trait]
impl Migration<Sqlite> for CreateVerificationsTable {
    fn version(&self) -> i64 {
        3
    }

    fn name(&self) -> &str {
        "CreateVerificationsTable"
    }

    async fn up<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS verifications (
                email TEXT PRIMARY KEY REFERENCES users(email),
                code TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query("DROP TABLE IF EXISTS verifications")
            .execute(conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::tests::memory_pool;

    #[tokio::test]
    async fn test_up_applies_all_migrations_once() {
        let pool = memory_pool().await;
        let manager = SqliteMigrationManager::new(pool.clone());
        manager.initialize().await.unwrap();

        manager.up(&all()).await.unwrap();
        manager.up(&all()).await.unwrap();

        let applied = manager.get_applied_migrations().await.unwrap();
        let versions: Vec<i64> = applied.iter().map(|r| r.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
        assert_eq!(applied[2].name, "CreateVerificationsTable");
    }

    #[tokio::test]
    async fn test_down_rolls_back_in_reverse_order() {
        let pool = memory_pool().await;
        let manager = SqliteMigrationManager::new(pool.clone());
        manager.initialize().await.unwrap();
        manager.up(&all()).await.unwrap();

        // verifications references users, so users can only go after it
        manager.down(&all()).await.unwrap();

        assert!(manager.get_applied_migrations().await.unwrap().is_empty());
        assert!(!manager.is_applied(1).await.unwrap());
    }
}
