use super::request_manager::RequestManager;
use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;

impl RequestManager {
    async fn revoke(&self, scope: &OpScope, kind: GrantKind, request_id: &str) -> StoreResult<()> {
        match self.requests().delete(scope, kind, request_id).await {
            // A token that does not exist is already revoked.
            Ok(()) | Err(StoreError::NotFound) => {
                debug!(collection = %kind, request_id, "token revoked");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait::async_trait]
impl TokenRevocationStorage for RequestManager {
    async fn revoke_access_token(&self, scope: &OpScope, request_id: &str) -> StoreResult<()> {
        self.revoke(scope, GrantKind::AccessToken, request_id).await
    }

    async fn revoke_refresh_token(&self, scope: &OpScope, request_id: &str) -> StoreResult<()> {
        self.revoke(scope, GrantKind::RefreshToken, request_id).await
    }

    /// No grace period is kept; the refresh token is revoked outright.
    async fn revoke_refresh_token_maybe_grace_period(
        &self,
        scope: &OpScope,
        request_id: &str,
        _signature: &str,
    ) -> StoreResult<()> {
        self.revoke_refresh_token(scope, request_id).await
    }
}
