use async_trait::async_trait;
use sqlx::SqlitePool;
use warden_core::{App, AppId, Error, error::StorageError, repositories::AppRepository};

use crate::error::{is_unique_violation, map_sqlx_err};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SqliteApp {
    pub id: i64,
    pub name: String,
    pub secret: String,
}

impl TryFrom<SqliteApp> for App {
    type Error = Error;

    fn try_from(app: SqliteApp) -> Result<Self, Self::Error> {
        let id = AppId::try_from(app.id).map_err(|_| {
            Error::Storage(StorageError::Database(format!(
                "app id {} out of range",
                app.id
            )))
        })?;
        Ok(App::new(id, app.name, app.secret))
    }
}

pub struct SqliteAppRepository {
    pool: SqlitePool,
}

impl SqliteAppRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a token-signing app. Apps are provisioned by operators, never by the services.
    pub async fn insert(&self, name: &str, secret: &str) -> Result<AppId, Error> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO apps (name, secret) VALUES (?1, ?2) RETURNING id")
                .bind(name)
                .bind(secret)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        Error::Storage(StorageError::Database(format!(
                            "app name or secret already registered: {name}"
                        )))
                    } else {
                        map_sqlx_err(e)
                    }
                })?;

        AppId::try_from(id)
            .map_err(|_| Error::Storage(StorageError::Database(format!("app id {id} out of range"))))
    }
}

#[async_trait]
impl AppRepository for SqliteAppRepository {
    async fn find_by_id(&self, id: AppId) -> Result<Option<App>, Error> {
        let app = sqlx::query_as::<_, SqliteApp>("SELECT id, name, secret FROM apps WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        app.map(App::try_from).transpose()
    }
}
