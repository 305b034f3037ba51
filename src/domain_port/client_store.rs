use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait ClientStore: Send + Sync {
    /// Fails with [`StoreError::NotFound`] for unknown clients.
    async fn get_client(&self, id: &str) -> StoreResult<Client>;
}
