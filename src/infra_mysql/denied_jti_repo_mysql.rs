use super::util::{render, store_err, table_name};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use sqlx::{MySqlPool, Row};

const JTI_SCHEMA: &str = include_str!("schema/jti_deny_list.sql");

pub struct MySqlDeniedJtiRepo {
    pool: MySqlPool,
    table: String,
}

impl MySqlDeniedJtiRepo {
    pub fn new(pool: MySqlPool, table_prefix: &str) -> anyhow::Result<Self> {
        Ok(MySqlDeniedJtiRepo {
            pool,
            table: table_name(table_prefix, "jti_deny_list")?,
        })
    }
}

#[async_trait::async_trait]
impl DeniedJtiRepo for MySqlDeniedJtiRepo {
    async fn create(&self, denied: &DeniedJti) -> StoreResult<DeniedJti> {
        sqlx::query(&format!(
            "INSERT INTO `{}` (signature, expiry) VALUES (?, ?)",
            self.table
        ))
        .bind(&denied.signature)
        .bind(denied.expiry)
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("insert denied jti", e))?;

        Ok(denied.clone())
    }

    async fn get(&self, signature: &str) -> StoreResult<DeniedJti> {
        let row = sqlx::query(&format!(
            "SELECT signature, expiry FROM `{}` WHERE signature = ?",
            self.table
        ))
        .bind(signature)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("get denied jti", e))?
        .ok_or(StoreError::NotFound)?;

        Ok(DeniedJti {
            signature: row
                .try_get("signature")
                .map_err(|e| store_err("decode denied jti", e))?,
            expiry: row
                .try_get("expiry")
                .map_err(|e| store_err("decode denied jti", e))?,
        })
    }

    async fn delete(&self, signature: &str) -> StoreResult<()> {
        let res = sqlx::query(&format!("DELETE FROM `{}` WHERE signature = ?", self.table))
            .bind(signature)
            .execute(&self.pool)
            .await
            .map_err(|e| store_err("delete denied jti", e))?;

        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_before(&self, cutoff: i64) -> StoreResult<u64> {
        let res = sqlx::query(&format!("DELETE FROM `{}` WHERE expiry < ?", self.table))
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| store_err("sweep denied jtis", e))?;

        Ok(res.rows_affected())
    }
}

#[async_trait::async_trait]
impl Configure for MySqlDeniedJtiRepo {
    async fn configure(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(&render(JTI_SCHEMA, &self.table))
            .execute(&self.pool)
            .await?;
        info!(table = %self.table, "jti table ready");
        Ok(())
    }
}
