use crate::application_port::*;

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Returns the user's subject id.
    ///
    /// Unknown users and wrong secrets are both [`StoreError::NotFound`];
    /// disabled users are [`StoreError::AccessDenied`].
    async fn authenticate(&self, username: &str, secret: &str) -> StoreResult<String>;
}
