#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use grantkeeper::application_impl::*;
use grantkeeper::application_port::*;
use grantkeeper::domain_model::*;
use grantkeeper::domain_port::*;
use grantkeeper::infra_memory::*;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .single()
            .unwrap();
        ManualClock {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSession {
    pub subject: String,
    pub expires_at: i64,
}

impl GrantSession for TokenSession {
    fn subject(&self) -> &str {
        &self.subject
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdTokenSession {
    pub subject: String,
    pub nonce: String,
    pub acr: Vec<String>,
}

impl GrantSession for IdTokenSession {
    fn subject(&self) -> &str {
        &self.subject
    }
}

pub const CLIENT_ID: &str = "web-app";

pub struct Harness {
    pub requests: RequestManager,
    pub jtis: DeniedJtiManager,
    pub jti_repo: Arc<MemoryDeniedJtiRepo>,
    pub clients: Arc<MemoryClientStore>,
    pub users: Arc<MemoryUserStore>,
    pub clock: Arc<ManualClock>,
}

pub fn harness() -> Harness {
    let clock = Arc::new(ManualClock::new());
    let repo = Arc::new(MemoryRequestRepo::with_clock(clock.clone()));
    let clients = Arc::new(MemoryClientStore::new());
    clients.insert(client());
    let users = Arc::new(MemoryUserStore::new(Arc::new(Argon2PasswordHasher)));
    let jti_repo = Arc::new(MemoryDeniedJtiRepo::new());

    let requests = RequestManager::new(
        Arc::new(RequestStore::new(repo.clone(), clock.clone())),
        clients.clone(),
        users.clone(),
        Arc::new(MemoryTxManager::new(repo)),
    );
    let jtis = DeniedJtiManager::new(jti_repo.clone(), clock.clone());

    Harness {
        requests,
        jtis,
        jti_repo,
        clients,
        users,
        clock,
    }
}

pub fn client() -> Client {
    Client {
        id: CLIENT_ID.into(),
        name: "Web App".into(),
        grant_types: vec!["authorization_code".into(), "refresh_token".into()],
        scopes: vec!["openid".into(), "read".into(), "write".into()],
        ..Default::default()
    }
}

pub fn token_grant(subject: &str) -> GrantRequest<TokenSession> {
    let mut grant = GrantRequest::new(
        client(),
        TokenSession {
            subject: subject.into(),
            expires_at: 1_704_114_000,
        },
    );
    grant.requested_scope = vec!["read".into(), "write".into()];
    grant.granted_scope = vec!["read".into()];
    grant.granted_audience = vec!["api1".into()];
    grant
}

pub fn record(signature: &str, scopes: &[&str]) -> Request {
    Request {
        signature: signature.into(),
        client_id: CLIENT_ID.into(),
        user_id: "alice".into(),
        requested_scope: scopes.iter().map(|s| s.to_string()).collect(),
        ..Request::new()
    }
}
