use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

#[derive(Debug, Default)]
pub struct MemoryDeniedJtiRepo {
    entries: DashMap<String, DeniedJti>,
}

impl MemoryDeniedJtiRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DeniedJtiRepo for MemoryDeniedJtiRepo {
    async fn create(&self, denied: &DeniedJti) -> StoreResult<DeniedJti> {
        match self.entries.entry(denied.signature.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(denied.clone());
                Ok(denied.clone())
            }
        }
    }

    async fn get(&self, signature: &str) -> StoreResult<DeniedJti> {
        self.entries
            .get(signature)
            .map(|e| e.value().clone())
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, signature: &str) -> StoreResult<()> {
        self.entries
            .remove(signature)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn delete_before(&self, cutoff: i64) -> StoreResult<u64> {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.expiry < cutoff)
            .map(|e| e.key().clone())
            .collect();

        let mut removed = 0;
        for signature in expired {
            if self
                .entries
                .remove_if(&signature, |_, e| e.expiry < cutoff)
                .is_some()
            {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
