use super::request_manager::RequestManager;
use super::request_store::log_failure;
use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;

const KIND: GrantKind = GrantKind::AuthorizationCode;

#[async_trait::async_trait]
impl AuthorizeCodeStorage for RequestManager {
    async fn create_authorize_code_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        code: &str,
        request: &GrantRequest<S>,
    ) -> StoreResult<()> {
        self.create_session(scope, KIND, code, request).await
    }

    async fn get_authorize_code_session<S: GrantSession>(
        &self,
        scope: &OpScope,
        code: &str,
    ) -> StoreResult<CodeLookup<S>> {
        let (grant, active) = self.load_session(scope, KIND, code).await?;
        if active {
            Ok(CodeLookup::Active(grant))
        } else {
            debug!(request_id = %grant.id, "authorization code reuse detected");
            Ok(CodeLookup::Invalidated(grant))
        }
    }

    async fn invalidate_authorize_code_session(
        &self,
        scope: &OpScope,
        code: &str,
    ) -> StoreResult<()> {
        scope
            .run(async {
                let mut tx = self
                    .tx_manager()
                    .begin()
                    .await
                    .map_err(StoreError::from_tx)?;

                let mut record = self
                    .requests()
                    .repo()
                    .find_by_signature_in_tx(tx.as_mut(), KIND, code)
                    .await
                    .inspect_err(|e| log_failure(KIND, "invalidate", e))?;

                record.active = false;
                let id = record.id.clone();
                self.requests()
                    .update_in_tx(tx.as_mut(), KIND, &id, record)
                    .await?;

                tx.commit().await.map_err(StoreError::from_tx)?;

                debug!(request_id = %id, "authorization code invalidated");
                Ok(())
            })
            .await
    }
}
