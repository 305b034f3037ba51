use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};

/// Rebuilds a [`GrantRequest`] from a stored record.
///
/// The stored session bytes must decode into `S`; a mismatch is a
/// [`StoreError::Deserialization`], never a partially filled session. The
/// client is resolved live, so a grant whose client was deleted is
/// [`StoreError::NotFound`].
pub async fn hydrate<S: GrantSession>(
    record: Request,
    clients: &dyn ClientStore,
) -> StoreResult<GrantRequest<S>> {
    let session: S = serde_json::from_slice(&record.session)
        .map_err(|e| StoreError::Deserialization(e.to_string()))?;

    let client = clients.get_client(&record.client_id).await?;

    // records written without requested_at fall back to their creation time
    let requested_at = record
        .requested_at
        .or_else(|| DateTime::<Utc>::from_timestamp(record.create_time, 0))
        .ok_or_else(|| {
            StoreError::InternalError(format!(
                "request {} has no usable requested_at (create_time {})",
                record.id, record.create_time
            ))
        })?;

    Ok(GrantRequest {
        id: record.id,
        requested_at,
        client,
        session,
        requested_scope: record.requested_scope,
        granted_scope: record.granted_scope,
        requested_audience: record.requested_audience,
        granted_audience: record.granted_audience,
        form: record.form,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::MemoryClientStore;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TokenSession {
        subject: String,
        expires_in: u64,
    }

    impl GrantSession for TokenSession {
        fn subject(&self) -> &str {
            &self.subject
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct IdTokenSession {
        subject: String,
        nonce: String,
        auth_time: i64,
    }

    impl GrantSession for IdTokenSession {
        fn subject(&self) -> &str {
            &self.subject
        }
    }

    fn clients() -> MemoryClientStore {
        let clients = MemoryClientStore::new();
        clients.insert(Client {
            id: "app".into(),
            ..Default::default()
        });
        clients
    }

    fn stored(session: &impl Serialize) -> Request {
        Request {
            id: "req-1".into(),
            signature: "sig".into(),
            client_id: "app".into(),
            requested_scope: vec!["read".into(), "write".into()],
            granted_audience: vec!["api1".into()],
            session: serde_json::to_vec(session).unwrap(),
            ..Request::new()
        }
    }

    #[tokio::test]
    async fn restores_lists_session_and_client() {
        let session = TokenSession {
            subject: "alice".into(),
            expires_in: 3600,
        };
        let grant: GrantRequest<TokenSession> =
            hydrate(stored(&session), &clients()).await.unwrap();

        assert_eq!(grant.id, "req-1");
        assert_eq!(grant.client.id, "app");
        assert_eq!(grant.session, session);
        assert_eq!(grant.requested_scope, vec!["read", "write"]);
        assert_eq!(grant.granted_audience, vec!["api1"]);
    }

    #[tokio::test]
    async fn shape_mismatch_is_a_deserialization_error() {
        let session = TokenSession {
            subject: "alice".into(),
            expires_in: 3600,
        };
        let res = hydrate::<IdTokenSession>(stored(&session), &clients()).await;
        assert!(matches!(res, Err(StoreError::Deserialization(_))));
    }

    #[tokio::test]
    async fn missing_client_is_not_found() {
        let session = TokenSession {
            subject: "alice".into(),
            expires_in: 1,
        };
        let res = hydrate::<TokenSession>(stored(&session), &MemoryClientStore::new()).await;
        assert!(matches!(res, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn missing_requested_at_falls_back_to_create_time() {
        let session = TokenSession {
            subject: "alice".into(),
            expires_in: 1,
        };
        let mut record = stored(&session);
        record.requested_at = None;
        record.create_time = 1_700_000_000;

        let grant: GrantRequest<TokenSession> = hydrate(record, &clients()).await.unwrap();
        assert_eq!(grant.requested_at.timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn unrepresentable_create_time_is_an_internal_error() {
        let session = TokenSession {
            subject: "alice".into(),
            expires_in: 1,
        };
        let mut record = stored(&session);
        record.requested_at = None;
        record.create_time = i64::MAX;

        let res = hydrate::<TokenSession>(record, &clients()).await;
        assert!(matches!(res, Err(StoreError::InternalError(_))));
    }
}
