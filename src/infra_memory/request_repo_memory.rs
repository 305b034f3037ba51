use super::repo_tx_memory::MemoryTx;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Duration;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
struct Collection {
    by_id: HashMap<String, Request>,
    // signature -> id
    signatures: HashMap<String, String>,
}

impl Collection {
    fn evict_older_than(&mut self, cutoff: chrono::DateTime<chrono::Utc>) {
        let expired: Vec<String> = self
            .by_id
            .values()
            .filter(|r| r.requested_at.is_some_and(|at| at < cutoff))
            .map(|r| r.id.clone())
            .collect();
        for id in expired {
            self.remove(&id);
        }
    }

    fn remove(&mut self, id: &str) -> Option<Request> {
        let removed = self.by_id.remove(id)?;
        self.signatures.remove(&removed.signature);
        Some(removed)
    }

    fn by_signature(&self, signature: &str) -> Option<&Request> {
        self.signatures
            .get(signature)
            .and_then(|id| self.by_id.get(id))
    }
}

/// In-process grant collections.
///
/// Each collection sits behind one dashmap shard lock, so every write is
/// atomic with respect to the uniqueness checks.
pub struct MemoryRequestRepo {
    collections: DashMap<GrantKind, Collection>,
    ttl_secs: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl MemoryRequestRepo {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        MemoryRequestRepo {
            collections: DashMap::new(),
            ttl_secs: AtomicU64::new(0),
            clock,
        }
    }

    fn collection(&self, kind: GrantKind) -> dashmap::mapref::one::RefMut<'_, GrantKind, Collection> {
        let mut col = self.collections.entry(kind).or_default();
        let ttl = self.ttl_secs.load(Ordering::Relaxed);
        if ttl > 0 {
            let cutoff = self.clock.now() - Duration::seconds(ttl as i64);
            col.evict_older_than(cutoff);
        }
        col
    }

    pub(crate) fn replace_now(&self, kind: GrantKind, request: &Request) -> StoreResult<()> {
        let mut col = self.collection(kind);
        let old_signature = match col.by_id.get(&request.id) {
            Some(existing) => existing.signature.clone(),
            None => return Err(StoreError::NotFound),
        };
        if old_signature != request.signature {
            if col.signatures.contains_key(&request.signature) {
                return Err(StoreError::Conflict);
            }
            col.signatures.remove(&old_signature);
            col.signatures
                .insert(request.signature.clone(), request.id.clone());
        }
        col.by_id.insert(request.id.clone(), request.clone());
        Ok(())
    }

    fn check_replace(&self, kind: GrantKind, request: &Request) -> StoreResult<()> {
        let col = self.collection(kind);
        if !col.by_id.contains_key(&request.id) {
            return Err(StoreError::NotFound);
        }
        match col.signatures.get(&request.signature) {
            Some(owner) if owner != &request.id => Err(StoreError::Conflict),
            _ => Ok(()),
        }
    }
}

impl Default for MemoryRequestRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn memory_tx(tx: &mut dyn StorageTx) -> StoreResult<&mut MemoryTx> {
    tx.as_any_mut()
        .downcast_mut::<MemoryTx>()
        .ok_or_else(|| StoreError::InternalError("transaction from another backend".into()))
}

#[async_trait::async_trait]
impl RequestRepo for MemoryRequestRepo {
    async fn find(&self, kind: GrantKind, query: &RequestQuery) -> StoreResult<Vec<Request>> {
        let col = self.collection(kind);
        let mut found: Vec<Request> = col
            .by_id
            .values()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        found.sort_by(|a, b| (a.create_time, &a.id).cmp(&(b.create_time, &b.id)));
        Ok(found)
    }

    async fn insert(&self, kind: GrantKind, request: &Request) -> StoreResult<()> {
        let mut col = self.collection(kind);
        if col.by_id.contains_key(&request.id) || col.signatures.contains_key(&request.signature) {
            return Err(StoreError::Conflict);
        }
        col.signatures
            .insert(request.signature.clone(), request.id.clone());
        col.by_id.insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn find_by_id(&self, kind: GrantKind, id: &str) -> StoreResult<Request> {
        self.collection(kind)
            .by_id
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_signature(&self, kind: GrantKind, signature: &str) -> StoreResult<Request> {
        self.collection(kind)
            .by_signature(signature)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn replace(&self, kind: GrantKind, request: &Request) -> StoreResult<()> {
        self.replace_now(kind, request)
    }

    async fn delete_by_id(&self, kind: GrantKind, id: &str) -> StoreResult<()> {
        self.collection(kind)
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn delete_by_signature(&self, kind: GrantKind, signature: &str) -> StoreResult<()> {
        let mut col = self.collection(kind);
        let id = col
            .signatures
            .get(signature)
            .cloned()
            .ok_or(StoreError::NotFound)?;
        col.remove(&id);
        Ok(())
    }

    async fn find_by_signature_in_tx(
        &self,
        tx: &mut dyn StorageTx,
        kind: GrantKind,
        signature: &str,
    ) -> StoreResult<Request> {
        let tx = memory_tx(tx)?;
        if let Some(pending) = tx.pending(kind, signature) {
            return Ok(pending.clone());
        }
        self.find_by_signature(kind, signature).await
    }

    async fn replace_in_tx(
        &self,
        tx: &mut dyn StorageTx,
        kind: GrantKind,
        request: &Request,
    ) -> StoreResult<()> {
        let tx = memory_tx(tx)?;
        self.check_replace(kind, request)?;
        tx.stage(kind, request.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl Configure for MemoryRequestRepo {
    async fn configure(&self) -> anyhow::Result<()> {
        for kind in GrantKind::ALL {
            self.collections.entry(kind).or_default();
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Expire for MemoryRequestRepo {
    async fn configure_expiry_with_ttl(&self, ttl_secs: u64) -> anyhow::Result<()> {
        self.ttl_secs.store(ttl_secs, Ordering::Relaxed);
        Ok(())
    }
}
