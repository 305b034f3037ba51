use std::any::Any;

#[async_trait::async_trait]
pub trait TxManager: Send + Sync {
    async fn begin(&self) -> anyhow::Result<Box<dyn StorageTx>>;
}

/// An explicit storage transaction handle.
///
/// Dropping a handle without calling `commit` rolls it back.
#[async_trait::async_trait]
pub trait StorageTx: Send {
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;

    /// Lets an adapter recover its concrete handle.
    fn as_any_mut(&mut self) -> &mut (dyn Any + Send);
}
