use crate::{
    App, AppId, Error, User, UserId, VerificationRecord,
    error::{AuthError, StorageError},
    repositories::{AppRepository, UserRepository, VerificationRepository},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-memory store implementing every repository, with failure injection.
#[derive(Default)]
pub(crate) struct MockStore {
    users: Mutex<HashMap<String, User>>,
    apps: Mutex<HashMap<AppId, App>>,
    verifications: Mutex<HashMap<String, VerificationRecord>>,
    next_failure: Mutex<Option<StorageError>>,
    fail_deletes: Mutex<bool>,
}

impl MockStore {
    pub async fn add_app(&self, app: App) {
        self.apps.lock().await.insert(app.id, app);
    }

    pub async fn add_user(&self, email: &str, password_hash: &str) -> UserId {
        let mut users = self.users.lock().await;
        let id = users.len() as UserId + 1;
        users.insert(
            email.to_string(),
            User::builder()
                .id(id)
                .email(email)
                .password_hash(password_hash)
                .build(),
        );
        id
    }

    pub async fn promote(&self, email: &str) {
        if let Some(user) = self.users.lock().await.get_mut(email) {
            user.is_admin = true;
        }
    }

    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        self.users.lock().await.get(email).cloned()
    }

    pub async fn verification(&self, email: &str) -> Option<VerificationRecord> {
        self.verifications.lock().await.get(email).cloned()
    }

    pub async fn verification_count(&self) -> usize {
        self.verifications.lock().await.len()
    }

    pub async fn fail_next(&self, message: &str) {
        *self.next_failure.lock().await = Some(StorageError::Database(message.to_string()));
    }

    pub async fn cancel_next(&self) {
        *self.next_failure.lock().await = Some(StorageError::Cancelled);
    }

    pub async fn fail_deletes(&self, fail: bool) {
        *self.fail_deletes.lock().await = fail;
    }

    async fn injected(&self) -> Result<(), Error> {
        match self.next_failure.lock().await.take() {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserRepository for MockStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        self.injected().await?;
        Ok(self.users.lock().await.get(email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        self.injected().await?;
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<UserId, Error> {
        self.injected().await?;
        if self.users.lock().await.contains_key(email) {
            return Err(AuthError::UserExists.into());
        }
        Ok(self.add_user(email, password_hash).await)
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> Result<UserId, Error> {
        self.injected().await?;
        let mut users = self.users.lock().await;
        let user = users.get_mut(email).ok_or(AuthError::UserNotFound)?;
        user.password_hash = password_hash.to_string();
        user.is_verified = true;
        Ok(user.id)
    }

    async fn mark_verified(&self, email: &str) -> Result<UserId, Error> {
        self.injected().await?;
        let mut users = self.users.lock().await;
        let user = users.get_mut(email).ok_or(AuthError::UserNotFound)?;
        user.is_verified = true;
        Ok(user.id)
    }
}

#[async_trait]
impl AppRepository for MockStore {
    async fn find_by_id(&self, id: AppId) -> Result<Option<App>, Error> {
        self.injected().await?;
        Ok(self.apps.lock().await.get(&id).cloned())
    }
}

#[async_trait]
impl VerificationRepository for MockStore {
    async fn upsert(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationRecord, Error> {
        self.injected().await?;
        if !self.users.lock().await.contains_key(email) {
            return Err(AuthError::UserNotFound.into());
        }
        let record = VerificationRecord::new(email, code, expires_at);
        self.verifications
            .lock()
            .await
            .insert(email.to_string(), record.clone());
        Ok(record)
    }

    async fn find(&self, email: &str) -> Result<Option<VerificationRecord>, Error> {
        self.injected().await?;
        Ok(self.verifications.lock().await.get(email).cloned())
    }

    async fn delete(&self, email: &str) -> Result<(), Error> {
        self.injected().await?;
        if *self.fail_deletes.lock().await {
            return Err(StorageError::Database("database is locked".to_string()).into());
        }
        self.verifications.lock().await.remove(email);
        Ok(())
    }
}
