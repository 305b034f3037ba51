use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::{Backend, Settings};
use anyhow::{anyhow, bail};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fully wired grant and JTI storage.
pub struct Store {
    pub requests: Arc<RequestManager>,
    pub denied_jtis: Arc<DeniedJtiManager>,
    configurables: Vec<Arc<dyn Configure>>,
    expirable: Arc<dyn Expire>,
    token_ttl_secs: u64,
    timeout: Option<Duration>,
    cancel: CancellationToken,
    pool: Option<Pool<MySql>>,
}

impl Store {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let store = &settings.store;
        let needs_mysql = [
            store.requests_backend,
            store.denied_jti_backend,
            store.clients_backend,
            store.users_backend,
        ]
        .contains(&Backend::Mysql);

        let pool = match (needs_mysql, &settings.mysql) {
            (false, _) => None,
            (true, Some(mysql)) => Some(
                MySqlPoolOptions::new()
                    .max_connections(mysql.max_connections)
                    .connect(&mysql.dsn)
                    .await?,
            ),
            (true, None) => bail!("a mysql backend is selected but [mysql] is missing"),
        };
        let table_prefix = settings
            .mysql
            .as_ref()
            .map(|m| m.table_prefix.as_str())
            .unwrap_or_default();
        let mysql_pool = || pool.clone().ok_or_else(|| anyhow!("mysql pool unavailable"));

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let credential_hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2PasswordHasher {});
        let mut configurables: Vec<Arc<dyn Configure>> = Vec::new();

        let (request_repo, tx_manager, expirable): (
            Arc<dyn RequestRepo>,
            Arc<dyn TxManager>,
            Arc<dyn Expire>,
        ) = match store.requests_backend {
            Backend::Memory => {
                let repo = Arc::new(MemoryRequestRepo::with_clock(clock.clone()));
                configurables.push(repo.clone());
                (repo.clone(), Arc::new(MemoryTxManager::new(repo.clone())), repo)
            }
            Backend::Mysql => {
                let pool = mysql_pool()?;
                let repo = Arc::new(MySqlRequestRepo::new(pool.clone(), table_prefix)?);
                configurables.push(repo.clone());
                (repo.clone(), Arc::new(MySqlTxManager::new(pool)), repo)
            }
            other => bail!("unsupported requests backend: {other:?}"),
        };

        let denied_jti_repo: Arc<dyn DeniedJtiRepo> = match store.denied_jti_backend {
            Backend::Memory => Arc::new(MemoryDeniedJtiRepo::new()),
            Backend::Mysql => {
                let repo = Arc::new(MySqlDeniedJtiRepo::new(mysql_pool()?, table_prefix)?);
                configurables.push(repo.clone());
                repo
            }
            Backend::Redis => {
                let redis = settings
                    .redis
                    .as_ref()
                    .ok_or_else(|| anyhow!("the redis backend is selected but [redis] is missing"))?;
                let redis_client = redis::Client::open(redis.dsn.as_str())?;
                let redis_manager = redis_client.get_connection_manager().await?;
                Arc::new(RedisDeniedJtiRepo::new(redis_manager, redis.prefix.clone()))
            }
        };

        let clients: Arc<dyn ClientStore> = match store.clients_backend {
            Backend::Memory => Arc::new(MemoryClientStore::new()),
            Backend::Mysql => {
                let clients = Arc::new(MySqlClientStore::new(mysql_pool()?, table_prefix)?);
                configurables.push(clients.clone());
                clients
            }
            other => bail!("unsupported clients backend: {other:?}"),
        };

        let users: Arc<dyn UserStore> = match store.users_backend {
            Backend::Memory => Arc::new(MemoryUserStore::new(credential_hasher)),
            Backend::Mysql => {
                let users = Arc::new(MySqlUserStore::new(
                    mysql_pool()?,
                    table_prefix,
                    credential_hasher,
                )?);
                configurables.push(users.clone());
                users
            }
            other => bail!("unsupported users backend: {other:?}"),
        };

        let request_store = Arc::new(RequestStore::new(request_repo, clock.clone()));
        let requests = Arc::new(RequestManager::new(
            request_store,
            clients,
            users,
            tx_manager,
        ));
        let denied_jtis = Arc::new(DeniedJtiManager::new(denied_jti_repo, clock));

        info!(
            requests = ?store.requests_backend,
            denied_jtis = ?store.denied_jti_backend,
            clients = ?store.clients_backend,
            users = ?store.users_backend,
            "store started"
        );

        Ok(Self {
            requests,
            denied_jtis,
            configurables,
            expirable,
            token_ttl_secs: store.token_ttl_secs,
            timeout: (store.timeout_secs > 0).then(|| Duration::from_secs(store.timeout_secs)),
            cancel: CancellationToken::new(),
            pool,
        })
    }

    /// Creates tables and indexes, then installs record expiry when a TTL is
    /// configured. Safe to run repeatedly.
    pub async fn configure(&self) -> anyhow::Result<()> {
        for configurable in &self.configurables {
            configurable.configure().await?;
        }
        if self.token_ttl_secs > 0 {
            self.expirable
                .configure_expiry_with_ttl(self.token_ttl_secs)
                .await?;
        }
        info!(ttl_secs = self.token_ttl_secs, "store configured");
        Ok(())
    }

    /// A fresh scope with the configured timeout, cancelled by `shutdown`.
    pub fn scope(&self) -> OpScope {
        let scope = OpScope::new().with_cancellation(self.cancel.child_token());
        match self.timeout {
            Some(timeout) => scope.with_timeout(timeout),
            None => scope,
        }
    }

    pub async fn shutdown(&self) {
        info!("store shutting down...");

        self.cancel.cancel();
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
