use super::*;
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait AccessTokenStorage: Send + Sync {
    async fn create_access_token_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        signature: &str,
        request: &GrantRequest<S>,
    ) -> StoreResult<()>;

    async fn get_access_token_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        signature: &str,
    ) -> StoreResult<GrantRequest<S>>;

    async fn delete_access_token_session(&self, scope: &OpScope, signature: &str)
    -> StoreResult<()>;
}

#[async_trait::async_trait]
pub trait RefreshTokenStorage: Send + Sync {
    async fn create_refresh_token_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        signature: &str,
        request: &GrantRequest<S>,
    ) -> StoreResult<()>;

    async fn get_refresh_token_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        signature: &str,
    ) -> StoreResult<GrantRequest<S>>;

    async fn delete_refresh_token_session(
        &self,
        scope: &OpScope,
        signature: &str,
    ) -> StoreResult<()>;
}

#[async_trait::async_trait]
pub trait AuthorizeCodeStorage: Send + Sync {
    async fn create_authorize_code_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        code: &str,
        request: &GrantRequest<S>,
    ) -> StoreResult<()>;

    /// Returns [`CodeLookup::Invalidated`] once the code has been used.
    async fn get_authorize_code_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        code: &str,
    ) -> StoreResult<CodeLookup<S>>;

    /// Marks the code as used. Later lookups report it as invalidated.
    async fn invalidate_authorize_code_session(&self, scope: &OpScope, code: &str)
    -> StoreResult<()>;
}

#[async_trait::async_trait]
pub trait PkceRequestStorage: Send + Sync {
    async fn create_pkce_request_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        signature: &str,
        request: &GrantRequest<S>,
    ) -> StoreResult<()>;

    async fn get_pkce_request_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        signature: &str,
    ) -> StoreResult<GrantRequest<S>>;

    async fn delete_pkce_request_session(&self, scope: &OpScope, signature: &str)
    -> StoreResult<()>;
}

#[async_trait::async_trait]
pub trait OpenIdConnectRequestStorage: Send + Sync {
    async fn create_open_id_connect_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        authorize_code: &str,
        request: &GrantRequest<S>,
    ) -> StoreResult<()>;

    async fn get_open_id_connect_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        authorize_code: &str,
    ) -> StoreResult<GrantRequest<S>>;

    async fn delete_open_id_connect_session(
        &self,
        scope: &OpScope,
        authorize_code: &str,
    ) -> StoreResult<()>;
}

/// Revocation is idempotent: revoking a missing token succeeds.
#[async_trait::async_trait]
pub trait TokenRevocationStorage: Send + Sync {
    async fn revoke_access_token(&self, scope: &OpScope, request_id: &str) -> StoreResult<()>;

    async fn revoke_refresh_token(&self, scope: &OpScope, request_id: &str) -> StoreResult<()>;

    async fn revoke_refresh_token_maybe_grace_period(
        &self,
        scope: &OpScope,
        request_id: &str,
        signature: &str,
    ) -> StoreResult<()>;
}

#[async_trait::async_trait]
pub trait ResourceOwnerPasswordStorage: Send + Sync {
    /// Returns the subject of the authenticated user.
    async fn authenticate(&self, scope: &OpScope, username: &str, secret: &str)
    -> StoreResult<String>;
}

#[async_trait::async_trait]
pub trait ClientAssertionJwtStorage: Send + Sync {
    /// Fails with [`StoreError::JtiKnown`] while `jti` is denied.
    async fn client_assertion_jwt_valid(&self, scope: &OpScope, jti: &str) -> StoreResult<()>;

    /// Denies `jti` until `exp`.
    async fn set_client_assertion_jwt(
        &self,
        scope: &OpScope,
        jti: &str,
        exp: DateTime<Utc>,
    ) -> StoreResult<()>;

    async fn is_jwt_used(&self, scope: &OpScope, jti: &str) -> StoreResult<bool> {
        match self.client_assertion_jwt_valid(scope, jti).await {
            Ok(()) => Ok(false),
            Err(StoreError::JtiKnown) => Ok(true),
            Err(e) => Err(e),
        }
    }

    async fn mark_jwt_used_for_time(
        &self,
        scope: &OpScope,
        jti: &str,
        exp: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.set_client_assertion_jwt(scope, jti, exp).await
    }
}
