use crate::{
    App, AppId, Error, User, UserId, VerificationRecord,
    repositories::{AppRepository, RepositoryProvider, UserRepository, VerificationRepository},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Adapter that wraps a RepositoryProvider and implements UserRepository
pub struct UserRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> UserRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> UserRepository for UserRepositoryAdapter<R> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        self.provider.user().find_by_email(email).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        self.provider.user().find_by_id(id).await
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<UserId, Error> {
        self.provider.user().insert(email, password_hash).await
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> Result<UserId, Error> {
        self.provider
            .user()
            .update_password(email, password_hash)
            .await
    }

    async fn mark_verified(&self, email: &str) -> Result<UserId, Error> {
        self.provider.user().mark_verified(email).await
    }
}

pub struct AppRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> AppRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> AppRepository for AppRepositoryAdapter<R> {
    async fn find_by_id(&self, id: AppId) -> Result<Option<App>, Error> {
        self.provider.app().find_by_id(id).await
    }
}

pub struct VerificationRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> VerificationRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> VerificationRepository for VerificationRepositoryAdapter<R> {
    async fn upsert(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationRecord, Error> {
        self.provider
            .verification()
            .upsert(email, code, expires_at)
            .await
    }

    async fn find(&self, email: &str) -> Result<Option<VerificationRecord>, Error> {
        self.provider.verification().find(email).await
    }

    async fn delete(&self, email: &str) -> Result<(), Error> {
        self.provider.verification().delete(email).await
    }
}
