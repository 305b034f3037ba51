use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

const JTI_INSERT: &str = include_str!("jti_insert.lua");
const JTI_SWEEP: &str = include_str!("jti_sweep.lua");

/// Denylist entries are plain keys expiring at the JTI's own expiry, plus a
/// sorted set scored by expiry so sweeps can report what they removed.
pub struct RedisDeniedJtiRepo {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisDeniedJtiRepo {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisDeniedJtiRepo {
            conn,
            prefix: prefix.into(),
        }
    }

    fn entry_prefix(&self) -> String {
        format!("{}:jti:", self.prefix)
    }

    fn key(&self, signature: &str) -> String {
        format!("{}{}", self.entry_prefix(), signature)
    }

    fn index_key(&self) -> String {
        format!("{}:jti_index", self.prefix)
    }
}

fn redis_err(context: &str, e: redis::RedisError) -> StoreError {
    StoreError::Store(format!("{context}: {e}"))
}

#[async_trait::async_trait]
impl DeniedJtiRepo for RedisDeniedJtiRepo {
    async fn create(&self, denied: &DeniedJti) -> StoreResult<DeniedJti> {
        let mut conn = self.conn.clone();
        let inserted: i64 = Script::new(JTI_INSERT)
            .key(self.key(&denied.signature))
            .key(self.index_key())
            .arg(denied.expiry)
            .arg(&denied.signature)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| redis_err("insert denied jti", e))?;

        match inserted {
            1 => Ok(denied.clone()),
            _ => Err(StoreError::Conflict),
        }
    }

    async fn get(&self, signature: &str) -> StoreResult<DeniedJti> {
        let mut conn = self.conn.clone();
        let expiry: Option<i64> = conn
            .get(self.key(signature))
            .await
            .map_err(|e| redis_err("get denied jti", e))?;

        expiry
            .map(|expiry| DeniedJti {
                signature: signature.to_string(),
                expiry,
            })
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, signature: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn
            .del(self.key(signature))
            .await
            .map_err(|e| redis_err("delete denied jti", e))?;
        let _: i64 = conn
            .zrem(self.index_key(), signature)
            .await
            .map_err(|e| redis_err("unindex denied jti", e))?;

        if removed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_before(&self, cutoff: i64) -> StoreResult<u64> {
        let mut conn = self.conn.clone();
        let removed: u64 = Script::new(JTI_SWEEP)
            .key(self.index_key())
            .arg(cutoff)
            .arg(self.entry_prefix())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| redis_err("sweep denied jtis", e))?;

        Ok(removed)
    }
}
