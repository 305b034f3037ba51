use super::hydration::hydrate;
use super::request_store::{RequestStore, log_failure};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;

/// Grant-type storage built on one shared [`RequestStore`].
pub struct RequestManager {
    requests: Arc<RequestStore>,
    clients: Arc<dyn ClientStore>,
    users: Arc<dyn UserStore>,
    tx_manager: Arc<dyn TxManager>,
}

impl RequestManager {
    pub fn new(
        requests: Arc<RequestStore>,
        clients: Arc<dyn ClientStore>,
        users: Arc<dyn UserStore>,
        tx_manager: Arc<dyn TxManager>,
    ) -> Self {
        Self {
            requests,
            clients,
            users,
            tx_manager,
        }
    }

    pub fn requests(&self) -> &RequestStore {
        &self.requests
    }

    pub(crate) fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    pub(crate) fn tx_manager(&self) -> &dyn TxManager {
        self.tx_manager.as_ref()
    }

    pub(crate) async fn create_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        kind: GrantKind,
        signature: &str,
        grant: &GrantRequest<S>,
    ) -> StoreResult<()> {
        let record = Request::from_grant(signature, grant)?;
        self.requests.create(scope, kind, record).await?;
        Ok(())
    }

    /// Fetches by signature and hydrates, returning the raw record's active
    /// flag alongside.
    pub(crate) async fn load_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        kind: GrantKind,
        signature: &str,
    ) -> StoreResult<(GrantRequest<S>, bool)> {
        let record = self.requests.get_by_signature(scope, kind, signature).await?;
        let active = record.active;
        let grant = scope
            .run(hydrate::<S>(record, self.clients.as_ref()))
            .await
            .inspect_err(|e| log_failure(kind, "hydrate", e))?;
        Ok((grant, active))
    }

    pub(crate) async fn get_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        kind: GrantKind,
        signature: &str,
    ) -> StoreResult<GrantRequest<S>> {
        let (grant, _) = self.load_session(scope, kind, signature).await?;
        Ok(grant)
    }
}

#[async_trait::async_trait]
impl AccessTokenStorage for RequestManager {
    async fn create_access_token_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        signature: &str,
        request: &GrantRequest<S>,
    ) -> StoreResult<()> {
        self.create_session(scope, GrantKind::AccessToken, signature, request)
            .await
    }

    async fn get_access_token_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        signature: &str,
    ) -> StoreResult<GrantRequest<S>> {
        self.get_session(scope, GrantKind::AccessToken, signature)
            .await
    }

    async fn delete_access_token_session(
        &self,
        scope: &OpScope,
        signature: &str,
    ) -> StoreResult<()> {
        self.requests
            .delete_by_signature(scope, GrantKind::AccessToken, signature)
            .await
    }
}

#[async_trait::async_trait]
impl RefreshTokenStorage for RequestManager {
    async fn create_refresh_token_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        signature: &str,
        request: &GrantRequest<S>,
    ) -> StoreResult<()> {
        self.create_session(scope, GrantKind::RefreshToken, signature, request)
            .await
    }

    async fn get_refresh_token_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        signature: &str,
    ) -> StoreResult<GrantRequest<S>> {
        self.get_session(scope, GrantKind::RefreshToken, signature)
            .await
    }

    async fn delete_refresh_token_session(
        &self,
        scope: &OpScope,
        signature: &str,
    ) -> StoreResult<()> {
        self.requests
            .delete_by_signature(scope, GrantKind::RefreshToken, signature)
            .await
    }
}

#[async_trait::async_trait]
impl PkceRequestStorage for RequestManager {
    async fn create_pkce_request_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        signature: &str,
        request: &GrantRequest<S>,
    ) -> StoreResult<()> {
        self.create_session(scope, GrantKind::Pkce, signature, request)
            .await
    }

    async fn get_pkce_request_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        signature: &str,
    ) -> StoreResult<GrantRequest<S>> {
        self.get_session(scope, GrantKind::Pkce, signature).await
    }

    async fn delete_pkce_request_session(
        &self,
        scope: &OpScope,
        signature: &str,
    ) -> StoreResult<()> {
        self.requests
            .delete_by_signature(scope, GrantKind::Pkce, signature)
            .await
    }
}

#[async_trait::async_trait]
impl OpenIdConnectRequestStorage for RequestManager {
    async fn create_open_id_connect_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        authorize_code: &str,
        request: &GrantRequest<S>,
    ) -> StoreResult<()> {
        self.create_session(scope, GrantKind::OidcSession, authorize_code, request)
            .await
    }

    async fn get_open_id_connect_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        authorize_code: &str,
    ) -> StoreResult<GrantRequest<S>> {
        self.get_session(scope, GrantKind::OidcSession, authorize_code)
            .await
    }

    async fn delete_open_id_connect_session(
        &self,
        scope: &OpScope,
        authorize_code: &str,
    ) -> StoreResult<()> {
        self.requests
            .delete_by_signature(scope, GrantKind::OidcSession, authorize_code)
            .await
    }
}
