use crate::application_port::*;
use crate::domain_model::*;

/// Persistent JTI denylist keyed by [`DeniedJti::signature`].
#[async_trait::async_trait]
pub trait DeniedJtiRepo: Send + Sync {
    /// Fails with [`StoreError::Conflict`] if the signature is already stored.
    async fn create(&self, denied: &DeniedJti) -> StoreResult<DeniedJti>;

    async fn get(&self, signature: &str) -> StoreResult<DeniedJti>;

    async fn delete(&self, signature: &str) -> StoreResult<()>;

    /// Removes every entry whose expiry is strictly before `cutoff` (epoch
    /// seconds) and returns how many were removed.
    async fn delete_before(&self, cutoff: i64) -> StoreResult<u64>;
}
