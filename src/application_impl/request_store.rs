use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;

/// Collection-agnostic CRUD over [`Request`] records.
///
/// One instance serves every [`GrantKind`]; the grant wrappers in
/// `RequestManager` differ only in the kind they pass.
pub struct RequestStore {
    repo: Arc<dyn RequestRepo>,
    clock: Arc<dyn Clock>,
}

impl RequestStore {
    pub fn new(repo: Arc<dyn RequestRepo>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub(crate) fn repo(&self) -> &dyn RequestRepo {
        self.repo.as_ref()
    }

    pub async fn list(
        &self,
        scope: &OpScope,
        kind: GrantKind,
        filter: &ListRequestsFilter,
    ) -> StoreResult<Vec<Request>> {
        let query = RequestQuery::from(filter);
        scope
            .run(self.repo.find(kind, &query))
            .await
            .inspect_err(|e| log_failure(kind, "list", e))
    }

    /// Stores a new record, filling in `id`, `create_time` and
    /// `requested_at` when the caller left them unset.
    pub async fn create(
        &self,
        scope: &OpScope,
        kind: GrantKind,
        mut request: Request,
    ) -> StoreResult<Request> {
        let now = self.clock.now();
        if request.id.is_empty() {
            request.id = uuid::Uuid::new_v4().to_string();
        }
        if request.create_time == 0 {
            request.create_time = now.timestamp();
        }
        if request.requested_at.is_none() {
            request.requested_at = Some(now);
        }

        scope
            .run(self.repo.insert(kind, &request))
            .await
            .inspect_err(|e| log_failure(kind, "create", e))?;

        debug!(collection = %kind, id = %request.id, "request created");
        Ok(request)
    }

    pub async fn get(&self, scope: &OpScope, kind: GrantKind, id: &str) -> StoreResult<Request> {
        scope
            .run(self.repo.find_by_id(kind, id))
            .await
            .inspect_err(|e| log_failure(kind, "get", e))
    }

    pub async fn get_by_signature(
        &self,
        scope: &OpScope,
        kind: GrantKind,
        signature: &str,
    ) -> StoreResult<Request> {
        scope
            .run(self.repo.find_by_signature(kind, signature))
            .await
            .inspect_err(|e| log_failure(kind, "get_by_signature", e))
    }

    /// Full replace. The stored id always comes from `id`, whatever the
    /// payload says.
    pub async fn update(
        &self,
        scope: &OpScope,
        kind: GrantKind,
        id: &str,
        request: Request,
    ) -> StoreResult<Request> {
        let request = self.prepare_update(id, request);
        scope
            .run(self.repo.replace(kind, &request))
            .await
            .inspect_err(|e| log_failure(kind, "update", e))?;
        Ok(request)
    }

    pub(crate) async fn update_in_tx(
        &self,
        tx: &mut dyn StorageTx,
        kind: GrantKind,
        id: &str,
        request: Request,
    ) -> StoreResult<Request> {
        let request = self.prepare_update(id, request);
        self.repo
            .replace_in_tx(tx, kind, &request)
            .await
            .inspect_err(|e| log_failure(kind, "update", e))?;
        Ok(request)
    }

    pub async fn delete(&self, scope: &OpScope, kind: GrantKind, id: &str) -> StoreResult<()> {
        scope
            .run(self.repo.delete_by_id(kind, id))
            .await
            .inspect_err(|e| log_failure(kind, "delete", e))
    }

    pub async fn delete_by_signature(
        &self,
        scope: &OpScope,
        kind: GrantKind,
        signature: &str,
    ) -> StoreResult<()> {
        scope
            .run(self.repo.delete_by_signature(kind, signature))
            .await
            .inspect_err(|e| log_failure(kind, "delete_by_signature", e))
    }

    fn prepare_update(&self, id: &str, mut request: Request) -> Request {
        request.id = id.to_string();
        request.update_time = self.clock.now().timestamp();
        request
    }
}

pub(crate) fn log_failure(kind: GrantKind, method: &str, err: &StoreError) {
    match err {
        StoreError::NotFound => debug!(collection = %kind, method, "request not found"),
        StoreError::Conflict => debug!(collection = %kind, method, "request conflict"),
        StoreError::Cancelled | StoreError::Timeout => {
            warn!(collection = %kind, method, error = %err, "request aborted")
        }
        _ => error!(collection = %kind, method, error = %err, "request store failure"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::MemoryRequestRepo;

    fn store() -> RequestStore {
        RequestStore::new(Arc::new(MemoryRequestRepo::new()), Arc::new(SystemClock))
    }

    fn request(signature: &str) -> Request {
        Request {
            signature: signature.to_string(),
            client_id: "client".into(),
            ..Request::new()
        }
    }

    #[tokio::test]
    async fn create_fills_missing_identity_and_times() {
        let store = store();
        let scope = OpScope::new();
        let created = store
            .create(&scope, GrantKind::AccessToken, request("sig"))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert!(created.create_time > 0);
        assert!(created.requested_at.is_some());
    }

    #[tokio::test]
    async fn create_keeps_caller_supplied_id() {
        let store = store();
        let scope = OpScope::new();
        let mut req = request("sig");
        req.id = "fixed".into();
        let created = store.create(&scope, GrantKind::Pkce, req).await.unwrap();
        assert_eq!(created.id, "fixed");
    }

    #[tokio::test]
    async fn update_forces_path_id_and_stamps_update_time() {
        let store = store();
        let scope = OpScope::new();
        let created = store
            .create(&scope, GrantKind::RefreshToken, request("sig"))
            .await
            .unwrap();

        let mut changed = created.clone();
        changed.id = "someone-else".into();
        changed.granted_scope = vec!["offline".into()];
        let updated = store
            .update(&scope, GrantKind::RefreshToken, &created.id, changed)
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert!(updated.update_time > 0);
        let fetched = store
            .get(&scope, GrantKind::RefreshToken, &created.id)
            .await
            .unwrap();
        assert_eq!(fetched.granted_scope, vec!["offline".to_string()]);
        assert!(matches!(
            store.get(&scope, GrantKind::RefreshToken, "someone-else").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let store = store();
        let res = store
            .update(&OpScope::new(), GrantKind::AccessToken, "nope", request("sig"))
            .await;
        assert!(matches!(res, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn update_cannot_steal_another_signature() {
        let store = store();
        let scope = OpScope::new();
        let first = store
            .create(&scope, GrantKind::AccessToken, request("one"))
            .await
            .unwrap();
        store
            .create(&scope, GrantKind::AccessToken, request("two"))
            .await
            .unwrap();

        let res = store
            .update(&scope, GrantKind::AccessToken, &first.id, request("two"))
            .await;
        assert!(matches!(res, Err(StoreError::Conflict)));
    }

    #[tokio::test]
    async fn delete_reports_missing_records() {
        let store = store();
        let scope = OpScope::new();
        let created = store
            .create(&scope, GrantKind::OidcSession, request("sig"))
            .await
            .unwrap();

        store
            .delete(&scope, GrantKind::OidcSession, &created.id)
            .await
            .unwrap();
        assert!(matches!(
            store.delete(&scope, GrantKind::OidcSession, &created.id).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store
                .delete_by_signature(&scope, GrantKind::OidcSession, "sig")
                .await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = store();
        let scope = OpScope::new();
        store
            .create(&scope, GrantKind::AccessToken, request("shared"))
            .await
            .unwrap();
        store
            .create(&scope, GrantKind::RefreshToken, request("shared"))
            .await
            .unwrap();
        assert!(matches!(
            store
                .get_by_signature(&scope, GrantKind::Pkce, "shared")
                .await,
            Err(StoreError::NotFound)
        ));
    }
}
