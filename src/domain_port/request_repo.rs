use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

/// Engine contract for grant records.
///
/// Implementations enforce uniqueness of `id` and `signature` per collection
/// and report violations as [`StoreError::Conflict`]. A missing record is
/// [`StoreError::NotFound`]. No defaulting happens at this level.
#[async_trait::async_trait]
pub trait RequestRepo: Send + Sync {
    async fn find(&self, kind: GrantKind, query: &RequestQuery) -> StoreResult<Vec<Request>>;

    async fn insert(&self, kind: GrantKind, request: &Request) -> StoreResult<()>;

    async fn find_by_id(&self, kind: GrantKind, id: &str) -> StoreResult<Request>;

    async fn find_by_signature(&self, kind: GrantKind, signature: &str) -> StoreResult<Request>;

    /// Full replace of the record whose id is `request.id`.
    async fn replace(&self, kind: GrantKind, request: &Request) -> StoreResult<()>;

    async fn delete_by_id(&self, kind: GrantKind, id: &str) -> StoreResult<()>;

    async fn delete_by_signature(&self, kind: GrantKind, signature: &str) -> StoreResult<()>;

    /// Reads the record and holds it for the lifetime of `tx`.
    async fn find_by_signature_in_tx(
        &self,
        tx: &mut dyn StorageTx,
        kind: GrantKind,
        signature: &str,
    ) -> StoreResult<Request>;

    async fn replace_in_tx(
        &self,
        tx: &mut dyn StorageTx,
        kind: GrantKind,
        request: &Request,
    ) -> StoreResult<()>;
}
