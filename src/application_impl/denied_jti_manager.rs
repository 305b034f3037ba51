use super::jti_memory_cache::JtiMemoryCache;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Two-tier JTI denylist.
///
/// The persistent repo is authoritative. The memory cache only short-circuits
/// rejections for JTIs this process has already seen.
pub struct DeniedJtiManager {
    repo: Arc<dyn DeniedJtiRepo>,
    memory: JtiMemoryCache,
    clock: Arc<dyn Clock>,
}

impl DeniedJtiManager {
    pub fn new(repo: Arc<dyn DeniedJtiRepo>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            memory: JtiMemoryCache::new(),
            clock,
        }
    }

    pub fn memory(&self) -> &JtiMemoryCache {
        &self.memory
    }

    pub async fn create(&self, scope: &OpScope, denied: &DeniedJti) -> StoreResult<DeniedJti> {
        scope
            .run(self.repo.create(denied))
            .await
            .inspect_err(|e| log_failure("create", e))
    }

    pub async fn get(&self, scope: &OpScope, signature: &str) -> StoreResult<DeniedJti> {
        scope
            .run(self.repo.get(signature))
            .await
            .inspect_err(|e| log_failure("get", e))
    }

    pub async fn delete(&self, scope: &OpScope, signature: &str) -> StoreResult<()> {
        scope
            .run(self.repo.delete(signature))
            .await
            .inspect_err(|e| log_failure("delete", e))
    }

    /// Removes a raw JTI from both tiers.
    pub async fn delete_jti(&self, scope: &OpScope, jti: &str) -> StoreResult<()> {
        self.memory.forget(jti)?;
        self.delete(scope, &signature_from_jti(jti)).await
    }

    /// Drops persistent entries that expired strictly before `cutoff`.
    pub async fn delete_before(&self, scope: &OpScope, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        let removed = scope
            .run(self.repo.delete_before(cutoff.timestamp()))
            .await
            .inspect_err(|e| log_failure("delete_before", e))?;
        if removed > 0 {
            debug!(removed, "expired jtis swept");
        }
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl ClientAssertionJwtStorage for DeniedJtiManager {
    async fn client_assertion_jwt_valid(&self, scope: &OpScope, jti: &str) -> StoreResult<()> {
        let now = self.clock.now();
        self.memory.check(jti, now)?;

        match self.get(scope, &signature_from_jti(jti)).await {
            Ok(denied) if denied.is_live_at(now) => {
                if let Some(exp) = DateTime::<Utc>::from_timestamp(denied.expiry, 0) {
                    self.memory.remember(jti, exp)?;
                }
                Err(StoreError::JtiKnown)
            }
            Ok(_) | Err(StoreError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn set_client_assertion_jwt(
        &self,
        scope: &OpScope,
        jti: &str,
        exp: DateTime<Utc>,
    ) -> StoreResult<()> {
        let now = self.clock.now();
        self.memory.check(jti, now)?;

        // entries expiring within the current second are already dead
        self.delete_before(scope, now + Duration::seconds(1)).await?;

        let denied = DeniedJti::new(jti, exp);
        match self.create(scope, &denied).await {
            Ok(_) => {}
            Err(StoreError::Conflict) => return Err(StoreError::JtiKnown),
            Err(e) => return Err(e),
        }

        // both tiers expire on the same whole second
        let exp = DateTime::<Utc>::from_timestamp(denied.expiry, 0).unwrap_or(exp);
        self.memory.insert(jti, exp, now)
    }
}

fn log_failure(method: &str, err: &StoreError) {
    match err {
        StoreError::NotFound | StoreError::Conflict => {
            debug!(method, error = %err, "jti lookup miss")
        }
        StoreError::Cancelled | StoreError::Timeout => {
            warn!(method, error = %err, "jti operation aborted")
        }
        _ => error!(method, error = %err, "jti store failure"),
    }
}
