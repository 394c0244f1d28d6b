use crate::{App, AppId, Error};
use async_trait::async_trait;

/// Read-only access to token-signing apps
#[async_trait]
pub trait AppRepository: Send + Sync + 'static {
    async fn find_by_id(&self, id: AppId) -> Result<Option<App>, Error>;
}
