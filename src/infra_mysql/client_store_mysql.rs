use super::util::{render, store_err, table_name};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use sqlx::mysql::MySqlRow;
use sqlx::types::Json;
use sqlx::{MySqlPool, Row};

const CLIENT_SCHEMA: &str = include_str!("schema/client.sql");

pub struct MySqlClientStore {
    pool: MySqlPool,
    table: String,
}

impl MySqlClientStore {
    pub fn new(pool: MySqlPool, table_prefix: &str) -> anyhow::Result<Self> {
        Ok(MySqlClientStore {
            pool,
            table: table_name(table_prefix, "clients")?,
        })
    }
}

fn decode_client(row: &MySqlRow) -> Result<Client, sqlx::Error> {
    Ok(Client {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        secret: row.try_get("secret")?,
        redirect_uris: row.try_get::<Json<Vec<String>>, _>("redirect_uris")?.0,
        grant_types: row.try_get::<Json<Vec<String>>, _>("grant_types")?.0,
        response_types: row.try_get::<Json<Vec<String>>, _>("response_types")?.0,
        scopes: row.try_get::<Json<Vec<String>>, _>("scopes")?.0,
        audience: row.try_get::<Json<Vec<String>>, _>("audience")?.0,
        public: row.try_get("public")?,
        disabled: row.try_get("disabled")?,
        create_time: row.try_get("create_time")?,
        update_time: row.try_get("update_time")?,
    })
}

#[async_trait::async_trait]
impl ClientStore for MySqlClientStore {
    async fn get_client(&self, id: &str) -> StoreResult<Client> {
        let row = sqlx::query(&format!(
            r#"
SELECT id, name, secret, redirect_uris, grant_types, response_types, scopes, audience,
       public, disabled, create_time, update_time
FROM `{}` WHERE id = ?
"#,
            self.table
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("get client", e))?
        .ok_or(StoreError::NotFound)?;

        decode_client(&row).map_err(|e| store_err("decode client", e))
    }
}

#[async_trait::async_trait]
impl Configure for MySqlClientStore {
    async fn configure(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(&render(CLIENT_SCHEMA, &self.table))
            .execute(&self.pool)
            .await?;
        info!(table = %self.table, "client table ready");
        Ok(())
    }
}
