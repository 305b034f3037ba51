use super::request_manager::RequestManager;
use crate::application_port::*;

#[async_trait::async_trait]
impl ResourceOwnerPasswordStorage for RequestManager {
    async fn authenticate(
        &self,
        scope: &OpScope,
        username: &str,
        secret: &str,
    ) -> StoreResult<String> {
        scope.run(self.users().authenticate(username, secret)).await
    }
}
