/// Idempotent creation of collections and unique indexes.
#[async_trait::async_trait]
pub trait Configure: Send + Sync {
    async fn configure(&self) -> anyhow::Result<()>;
}

/// Engine-managed expiry of grant records by `requested_at`.
#[async_trait::async_trait]
pub trait Expire: Send + Sync {
    async fn configure_expiry_with_ttl(&self, ttl_secs: u64) -> anyhow::Result<()>;
}
