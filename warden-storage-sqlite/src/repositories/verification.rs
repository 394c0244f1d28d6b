use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use warden_core::{
    Error, VerificationRecord,
    error::{AuthError, StorageError},
    repositories::VerificationRepository,
};

use crate::error::{is_foreign_key_violation, map_sqlx_err};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SqliteVerification {
    pub email: String,
    pub code: String,
    /// Unix milliseconds
    pub expires_at: i64,
}

impl TryFrom<SqliteVerification> for VerificationRecord {
    type Error = Error;

    fn try_from(row: SqliteVerification) -> Result<Self, Self::Error> {
        let expires_at = DateTime::<Utc>::from_timestamp_millis(row.expires_at).ok_or_else(|| {
            Error::Storage(StorageError::Database(format!(
                "invalid expires_at {} for {}",
                row.expires_at, row.email
            )))
        })?;
        Ok(VerificationRecord::new(row.email, row.code, expires_at))
    }
}

pub struct SqliteVerificationRepository {
    pool: SqlitePool,
}

impl SqliteVerificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationRepository for SqliteVerificationRepository {
    async fn upsert(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationRecord, Error> {
        let row = sqlx::query_as::<_, SqliteVerification>(
            r#"
            INSERT INTO verifications (email, code, expires_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(email) DO UPDATE SET
                code = excluded.code,
                expires_at = excluded.expires_at
            RETURNING email, code, expires_at
            "#,
        )
        .bind(email)
        .bind(code)
        .bind(expires_at.timestamp_millis())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AuthError::UserNotFound.into()
            } else {
                map_sqlx_err(e)
            }
        })?;

        row.try_into()
    }

    async fn find(&self, email: &str) -> Result<Option<VerificationRecord>, Error> {
        let row = sqlx::query_as::<_, SqliteVerification>(
            "SELECT email, code, expires_at FROM verifications WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        row.map(VerificationRecord::try_from).transpose()
    }

    async fn delete(&self, email: &str) -> Result<(), Error> {
        sqlx::query("DELETE FROM verifications WHERE email = ?1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(())
    }
}
