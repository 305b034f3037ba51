use crate::application_port::*;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local map of recently accepted JTIs to their expiry.
///
/// Only a latency shortcut in front of the persistent denylist: a hit here
/// rejects without a round trip, a miss proves nothing.
#[derive(Debug, Default)]
pub struct JtiMemoryCache {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl JtiMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails with [`StoreError::JtiKnown`] if `jti` is held and unexpired.
    pub fn check(&self, jti: &str, now: DateTime<Utc>) -> StoreResult<()> {
        let entries = self.entries.read().map_err(poisoned)?;
        match entries.get(jti) {
            Some(exp) if *exp > now => Err(StoreError::JtiKnown),
            _ => Ok(()),
        }
    }

    /// Sweeps expired entries, then records `jti` unless it is already
    /// held and unexpired.
    pub fn insert(&self, jti: &str, exp: DateTime<Utc>, now: DateTime<Utc>) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.retain(|_, e| *e > now);
        if entries.contains_key(jti) {
            return Err(StoreError::JtiKnown);
        }
        entries.insert(jti.to_string(), exp);
        Ok(())
    }

    /// Records `jti` unconditionally, keeping the later expiry.
    pub fn remember(&self, jti: &str, exp: DateTime<Utc>) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let slot = entries.entry(jti.to_string()).or_insert(exp);
        if *slot < exp {
            *slot = exp;
        }
        Ok(())
    }

    pub fn forget(&self, jti: &str) -> StoreResult<()> {
        self.entries.write().map_err(poisoned)?.remove(jti);
        Ok(())
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.entries.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::InternalError("jti cache lock poisoned".into())
}
