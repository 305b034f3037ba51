use super::repo_tx_mysql::MySqlTx;
use crate::application_port::*;
use crate::domain_port::*;
use anyhow::bail;
use sqlx::mysql::MySqlDatabaseError;

pub fn downcast(tx: &mut dyn StorageTx) -> StoreResult<&mut MySqlTx> {
    tx.as_any_mut()
        .downcast_mut::<MySqlTx>()
        .ok_or_else(|| StoreError::InternalError("transaction from another backend".into()))
}

pub fn is_dup_key(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql_err) = db.try_downcast_ref::<MySqlDatabaseError>() {
            return mysql_err.number() == 1062; // ER_DUP_ENTRY
        }
    }

    false
}

/// Maps an engine error onto the store taxonomy.
pub fn store_err(context: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        e if is_dup_key(&e) => StoreError::Conflict,
        e => StoreError::Store(format!("{context}: {e}")),
    }
}

/// Table names are interpolated into SQL, so only identifier characters
/// are accepted.
pub fn table_name(prefix: &str, name: &str) -> anyhow::Result<String> {
    let table = format!("{prefix}{name}");
    if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        bail!("invalid table name: {table:?}");
    }
    Ok(table)
}

pub fn render(template: &str, table: &str) -> String {
    template.replace("{table}", table)
}
