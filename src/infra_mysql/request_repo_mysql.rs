use super::util::{downcast, render, store_err, table_name};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::types::Json;
use sqlx::{MySql, MySqlPool, QueryBuilder, Row};
use std::collections::HashMap;

const REQUEST_SCHEMA: &str = include_str!("schema/request.sql");
const REQUEST_EXPIRY: &str = include_str!("schema/request_expiry.sql");

const COLUMNS: &str = "id, signature, create_time, update_time, requested_at, client_id, \
     user_id, requested_scope, granted_scope, requested_audience, granted_audience, form, \
     active, session";

pub struct MySqlRequestRepo {
    pool: MySqlPool,
    tables: HashMap<GrantKind, String>,
}

impl MySqlRequestRepo {
    pub fn new(pool: MySqlPool, table_prefix: &str) -> anyhow::Result<Self> {
        let tables = GrantKind::ALL
            .into_iter()
            .map(|kind| Ok((kind, table_name(table_prefix, kind.collection())?)))
            .collect::<anyhow::Result<HashMap<_, _>>>()?;
        Ok(MySqlRequestRepo { pool, tables })
    }

    fn table(&self, kind: GrantKind) -> &str {
        // every kind is populated in new()
        self.tables.get(&kind).map(String::as_str).unwrap_or_default()
    }
}

fn decode_row(row: &MySqlRow) -> Result<Request, sqlx::Error> {
    Ok(Request {
        id: row.try_get("id")?,
        signature: row.try_get("signature")?,
        create_time: row.try_get("create_time")?,
        update_time: row.try_get("update_time")?,
        requested_at: row.try_get::<Option<DateTime<Utc>>, _>("requested_at")?,
        client_id: row.try_get("client_id")?,
        user_id: row.try_get("user_id")?,
        requested_scope: row.try_get::<Json<Vec<String>>, _>("requested_scope")?.0,
        granted_scope: row.try_get::<Json<Vec<String>>, _>("granted_scope")?.0,
        requested_audience: row.try_get::<Json<Vec<String>>, _>("requested_audience")?.0,
        granted_audience: row.try_get::<Json<Vec<String>>, _>("granted_audience")?.0,
        form: row.try_get::<Json<Form>, _>("form")?.0,
        active: row.try_get("active")?,
        session: row.try_get("session")?,
    })
}

fn decode_one(context: &str, row: Option<MySqlRow>) -> StoreResult<Request> {
    match row {
        Some(row) => decode_row(&row).map_err(|e| store_err(context, e)),
        None => Err(StoreError::NotFound),
    }
}

fn push_scope_match(qb: &mut QueryBuilder<'_, MySql>, column: &str, m: &ScopeMatch) {
    let (func, wanted) = match m {
        ScopeMatch::All(wanted) => ("JSON_CONTAINS", wanted),
        ScopeMatch::Any(wanted) => ("JSON_OVERLAPS", wanted),
    };
    qb.push(format!(" AND {func}({column}, CAST("))
        .push_bind(Json(wanted.clone()))
        .push(" AS JSON))");
}

#[async_trait::async_trait]
impl RequestRepo for MySqlRequestRepo {
    async fn find(&self, kind: GrantKind, query: &RequestQuery) -> StoreResult<Vec<Request>> {
        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {COLUMNS} FROM `{}` WHERE 1 = 1",
            self.table(kind)
        ));
        if let Some(client_id) = &query.client_id {
            qb.push(" AND client_id = ").push_bind(client_id.clone());
        }
        if let Some(user_id) = &query.user_id {
            qb.push(" AND user_id = ").push_bind(user_id.clone());
        }
        if let Some(m) = &query.requested_scope {
            push_scope_match(&mut qb, "requested_scope", m);
        }
        if let Some(m) = &query.granted_scope {
            push_scope_match(&mut qb, "granted_scope", m);
        }
        qb.push(" ORDER BY create_time, id");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_err("list requests", e))?;

        rows.iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| store_err("decode request", e))
    }

    async fn insert(&self, kind: GrantKind, request: &Request) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO `{}` ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.table(kind)
        ))
        .bind(&request.id)
        .bind(&request.signature)
        .bind(request.create_time)
        .bind(request.update_time)
        .bind(request.requested_at)
        .bind(&request.client_id)
        .bind(&request.user_id)
        .bind(Json(&request.requested_scope))
        .bind(Json(&request.granted_scope))
        .bind(Json(&request.requested_audience))
        .bind(Json(&request.granted_audience))
        .bind(Json(&request.form))
        .bind(request.active)
        .bind(request.session.as_slice())
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("insert request", e))?;

        Ok(())
    }

    async fn find_by_id(&self, kind: GrantKind, id: &str) -> StoreResult<Request> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM `{}` WHERE id = ?",
            self.table(kind)
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("get request", e))?;

        decode_one("get request", row)
    }

    async fn find_by_signature(&self, kind: GrantKind, signature: &str) -> StoreResult<Request> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM `{}` WHERE signature = ?",
            self.table(kind)
        ))
        .bind(signature)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("get request by signature", e))?;

        decode_one("get request by signature", row)
    }

    async fn replace(&self, kind: GrantKind, request: &Request) -> StoreResult<()> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| store_err("acquire", e))?;
        replace_on(&mut conn, self.table(kind), request).await
    }

    async fn delete_by_id(&self, kind: GrantKind, id: &str) -> StoreResult<()> {
        let res = sqlx::query(&format!("DELETE FROM `{}` WHERE id = ?", self.table(kind)))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_err("delete request", e))?;

        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_by_signature(&self, kind: GrantKind, signature: &str) -> StoreResult<()> {
        let res = sqlx::query(&format!(
            "DELETE FROM `{}` WHERE signature = ?",
            self.table(kind)
        ))
        .bind(signature)
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("delete request by signature", e))?;

        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn find_by_signature_in_tx(
        &self,
        tx: &mut dyn StorageTx,
        kind: GrantKind,
        signature: &str,
    ) -> StoreResult<Request> {
        let tx = downcast(tx)?;
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM `{}` WHERE signature = ? FOR UPDATE",
            self.table(kind)
        ))
        .bind(signature)
        .fetch_optional(tx.conn())
        .await
        .map_err(|e| store_err("lock request", e))?;

        decode_one("lock request", row)
    }

    async fn replace_in_tx(
        &self,
        tx: &mut dyn StorageTx,
        kind: GrantKind,
        request: &Request,
    ) -> StoreResult<()> {
        let tx = downcast(tx)?;
        replace_on(tx.conn(), self.table(kind), request).await
    }
}

async fn replace_on(
    conn: &mut sqlx::MySqlConnection,
    table: &str,
    request: &Request,
) -> StoreResult<()> {
    let res = sqlx::query(&format!(
        r#"
UPDATE `{table}` SET
    signature = ?, create_time = ?, update_time = ?, requested_at = ?, client_id = ?,
    user_id = ?, requested_scope = ?, granted_scope = ?, requested_audience = ?,
    granted_audience = ?, form = ?, active = ?, session = ?
WHERE id = ?
"#
    ))
    .bind(&request.signature)
    .bind(request.create_time)
    .bind(request.update_time)
    .bind(request.requested_at)
    .bind(&request.client_id)
    .bind(&request.user_id)
    .bind(Json(&request.requested_scope))
    .bind(Json(&request.granted_scope))
    .bind(Json(&request.requested_audience))
    .bind(Json(&request.granted_audience))
    .bind(Json(&request.form))
    .bind(request.active)
    .bind(request.session.as_slice())
    .bind(&request.id)
    .execute(conn)
    .await
    .map_err(|e| store_err("update request", e))?;

    // FOUND_ROWS is set by sqlx, so an unchanged row still counts.
    if res.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

#[async_trait::async_trait]
impl Configure for MySqlRequestRepo {
    async fn configure(&self) -> anyhow::Result<()> {
        for kind in GrantKind::ALL {
            let table = self.table(kind);
            sqlx::raw_sql(&render(REQUEST_SCHEMA, table))
                .execute(&self.pool)
                .await?;
            info!(table, "request table ready");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Expire for MySqlRequestRepo {
    /// Installs one scheduled event per table; requires `event_scheduler=ON`.
    async fn configure_expiry_with_ttl(&self, ttl_secs: u64) -> anyhow::Result<()> {
        for kind in GrantKind::ALL {
            let table = self.table(kind);
            sqlx::raw_sql(&format!("DROP EVENT IF EXISTS `{table}_expiry`"))
                .execute(&self.pool)
                .await?;
            let create = render(REQUEST_EXPIRY, table).replace("{ttl}", &ttl_secs.to_string());
            sqlx::raw_sql(&create).execute(&self.pool).await?;
            info!(table, ttl_secs, "request expiry installed");
        }
        Ok(())
    }
}
