//! Walks one authorization code and one client assertion through a
//! memory-backed store.
//!
//! $ cargo run --bin store_demo

use chrono::{Duration, Utc};
use grantkeeper::application_impl::*;
use grantkeeper::application_port::*;
use grantkeeper::domain_model::*;
use grantkeeper::domain_port::*;
use grantkeeper::infra_memory::*;
use grantkeeper::logger::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
struct DemoSession {
    subject: String,
    nonce: String,
}

impl GrantSession for DemoSession {
    fn subject(&self) -> &str {
        &self.subject
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    logger.reload_from_config(&LogConfig {
        filter: "debug".into(),
        format: Default::default(),
    })?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repo = Arc::new(MemoryRequestRepo::new());
    let clients = Arc::new(MemoryClientStore::new());
    clients.insert(Client {
        id: "demo-app".into(),
        name: "Demo".into(),
        ..Default::default()
    });
    let users = Arc::new(MemoryUserStore::new(Arc::new(Argon2PasswordHasher)));

    let requests = RequestManager::new(
        Arc::new(RequestStore::new(repo.clone(), clock.clone())),
        clients,
        users,
        Arc::new(MemoryTxManager::new(repo)),
    );
    let scope = OpScope::new().with_timeout(std::time::Duration::from_secs(1));

    // region authorization code
    let mut grant = GrantRequest::new(
        Client {
            id: "demo-app".into(),
            ..Default::default()
        },
        DemoSession {
            subject: "alice".into(),
            nonce: "n-0S6_WzA2Mj".into(),
        },
    );
    grant.granted_scope = vec!["openid".into(), "offline".into()];

    requests
        .create_authorize_code_session(&scope, "code-123", &grant)
        .await?;
    let first = requests
        .get_authorize_code_session::<DemoSession>(&scope, "code-123")
        .await?;
    println!("first lookup invalidated: {}", first.is_invalidated());

    requests
        .invalidate_authorize_code_session(&scope, "code-123")
        .await?;
    let replay = requests
        .get_authorize_code_session::<DemoSession>(&scope, "code-123")
        .await?;
    println!(
        "replayed lookup invalidated: {}, request {} can be revoked",
        replay.is_invalidated(),
        replay.request().id
    );
    // endregion

    // region client assertion
    let jtis = DeniedJtiManager::new(Arc::new(MemoryDeniedJtiRepo::new()), clock);
    let exp = Utc::now() + Duration::seconds(60);
    jtis.set_client_assertion_jwt(&scope, "jti-1", exp).await?;
    match jtis.set_client_assertion_jwt(&scope, "jti-1", exp).await {
        Err(StoreError::JtiKnown) => println!("replayed jti rejected"),
        other => println!("unexpected: {other:?}"),
    }
    // endregion

    Ok(())
}
