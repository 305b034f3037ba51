use super::util::{render, store_err, table_name};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use sqlx::types::Json;
use sqlx::{MySqlPool, Row};
use std::sync::Arc;

const USER_SCHEMA: &str = include_str!("schema/user.sql");

pub struct MySqlUserStore {
    pool: MySqlPool,
    table: String,
    hasher: Arc<dyn CredentialHasher>,
}

impl MySqlUserStore {
    pub fn new(
        pool: MySqlPool,
        table_prefix: &str,
        hasher: Arc<dyn CredentialHasher>,
    ) -> anyhow::Result<Self> {
        Ok(MySqlUserStore {
            pool,
            table: table_name(table_prefix, "users")?,
            hasher,
        })
    }

    async fn get_by_username(&self, username: &str) -> StoreResult<User> {
        let row = sqlx::query(&format!(
            r#"
SELECT id, username, password_hash, scopes, disabled, create_time, update_time
FROM `{}` WHERE username = ?
"#,
            self.table
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("get user", e))?
        .ok_or(StoreError::NotFound)?;

        let decode = |e| store_err("decode user", e);
        Ok(User {
            id: row.try_get("id").map_err(decode)?,
            username: row.try_get("username").map_err(decode)?,
            password_hash: row.try_get("password_hash").map_err(decode)?,
            scopes: row
                .try_get::<Json<Vec<String>>, _>("scopes")
                .map_err(decode)?
                .0,
            disabled: row.try_get("disabled").map_err(decode)?,
            create_time: row.try_get("create_time").map_err(decode)?,
            update_time: row.try_get("update_time").map_err(decode)?,
        })
    }
}

#[async_trait::async_trait]
impl UserStore for MySqlUserStore {
    async fn authenticate(&self, username: &str, secret: &str) -> StoreResult<String> {
        let user = self.get_by_username(username).await?;
        authenticate_user(self.hasher.as_ref(), &user, secret).await
    }
}

#[async_trait::async_trait]
impl Configure for MySqlUserStore {
    async fn configure(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(&render(USER_SCHEMA, &self.table))
            .execute(&self.pool)
            .await?;
        info!(table = %self.table, "user table ready");
        Ok(())
    }
}
