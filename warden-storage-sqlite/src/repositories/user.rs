use async_trait::async_trait;
use sqlx::SqlitePool;
use warden_core::{
    Error, User, UserId, error::AuthError, repositories::UserRepository,
};

use crate::error::{is_unique_violation, map_sqlx_err};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SqliteUser {
    pub id: i64,
    pub email: String,
    pub pass_hash: String,
    pub is_admin: bool,
    pub is_verified: bool,
}

impl From<SqliteUser> for User {
    fn from(user: SqliteUser) -> Self {
        User::builder()
            .id(user.id)
            .email(user.email)
            .password_hash(user.pass_hash)
            .is_admin(user.is_admin)
            .is_verified(user.is_verified)
            .build()
    }
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Grant or revoke the admin flag. Not part of the service surface; used by operators.
    pub async fn set_admin(&self, email: &str, is_admin: bool) -> Result<UserId, Error> {
        let id: Option<i64> =
            sqlx::query_scalar("UPDATE users SET is_admin = ?2 WHERE email = ?1 RETURNING id")
                .bind(email)
                .bind(is_admin)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        id.ok_or_else(|| AuthError::UserNotFound.into())
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, SqliteUser>(
            "SELECT id, email, pass_hash, is_admin, is_verified FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(user.map(User::from))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, SqliteUser>(
            "SELECT id, email, pass_hash, is_admin, is_verified FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(user.map(User::from))
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<UserId, Error> {
        sqlx::query_scalar("INSERT INTO users (email, pass_hash) VALUES (?1, ?2) RETURNING id")
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AuthError::UserExists.into()
                } else {
                    map_sqlx_err(e)
                }
            })
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> Result<UserId, Error> {
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET pass_hash = ?2, is_verified = 1
            WHERE email = ?1
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        id.ok_or_else(|| AuthError::UserNotFound.into())
    }

    async fn mark_verified(&self, email: &str) -> Result<UserId, Error> {
        let id: Option<i64> =
            sqlx::query_scalar("UPDATE users SET is_verified = 1 WHERE email = ?1 RETURNING id")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        id.ok_or_else(|| AuthError::UserNotFound.into())
    }
}
