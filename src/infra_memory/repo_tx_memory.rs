use super::request_repo_memory::MemoryRequestRepo;
use crate::domain_model::*;
use crate::domain_port::*;
use std::any::Any;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes memory transactions and applies their staged writes on
/// commit.
pub struct MemoryTxManager {
    repo: Arc<MemoryRequestRepo>,
    lock: Arc<Mutex<()>>,
}

impl MemoryTxManager {
    pub fn new(repo: Arc<MemoryRequestRepo>) -> Self {
        MemoryTxManager {
            repo,
            lock: Arc::new(Mutex::new(())),
        }
    }
}

#[async_trait::async_trait]
impl TxManager for MemoryTxManager {
    async fn begin(&self) -> anyhow::Result<Box<dyn StorageTx>> {
        let guard = self.lock.clone().lock_owned().await;
        Ok(Box::new(MemoryTx {
            _guard: guard,
            repo: self.repo.clone(),
            staged: Vec::new(),
        }))
    }
}

pub struct MemoryTx {
    _guard: OwnedMutexGuard<()>,
    repo: Arc<MemoryRequestRepo>,
    staged: Vec<(GrantKind, Request)>,
}

impl MemoryTx {
    pub(crate) fn stage(&mut self, kind: GrantKind, request: Request) {
        self.staged.push((kind, request));
    }

    pub(crate) fn pending(&self, kind: GrantKind, signature: &str) -> Option<&Request> {
        self.staged
            .iter()
            .rev()
            .find(|(k, r)| *k == kind && r.signature == signature)
            .map(|(_, r)| r)
    }
}

#[async_trait::async_trait]
impl StorageTx for MemoryTx {
    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        for (kind, request) in &self.staged {
            self.repo.replace_now(*kind, request)?;
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut (dyn Any + Send) {
        self
    }
}
