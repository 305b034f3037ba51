use super::{StoreError, StoreResult};
use crate::domain_model::*;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Framework-defined session payload carried by every grant.
///
/// The store never looks inside it beyond the subject; the type parameter on
/// the `get_*_session` calls is the shape the stored bytes are decoded into.
pub trait GrantSession: Serialize + DeserializeOwned + Send + Sync {
    fn subject(&self) -> &str;
}

/// A fully reconstructed grant request.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantRequest<S> {
    pub id: String,
    pub requested_at: DateTime<Utc>,
    pub client: Client,
    pub session: S,
    pub requested_scope: Vec<String>,
    pub granted_scope: Vec<String>,
    pub requested_audience: Vec<String>,
    pub granted_audience: Vec<String>,
    pub form: Form,
}

impl<S: GrantSession> GrantRequest<S> {
    pub fn new(client: Client, session: S) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            requested_at: Utc::now(),
            client,
            session,
            requested_scope: Vec::new(),
            granted_scope: Vec::new(),
            requested_audience: Vec::new(),
            granted_audience: Vec::new(),
            form: Form::new(),
        }
    }
}

impl Request {
    /// Flattens a grant into a storable record keyed by `signature`.
    ///
    /// For authorization codes the signature is the code itself.
    pub fn from_grant<S: GrantSession>(
        signature: &str,
        grant: &GrantRequest<S>,
    ) -> StoreResult<Request> {
        let session = serde_json::to_vec(&grant.session)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        Ok(Request {
            id: grant.id.clone(),
            requested_at: Some(grant.requested_at),
            signature: signature.to_string(),
            client_id: grant.client.id.clone(),
            user_id: grant.session.subject().to_string(),
            requested_scope: grant.requested_scope.clone(),
            granted_scope: grant.granted_scope.clone(),
            requested_audience: grant.requested_audience.clone(),
            granted_audience: grant.granted_audience.clone(),
            form: grant.form.clone(),
            active: true,
            session,
            ..Request::new()
        })
    }
}

/// Outcome of an authorization code lookup.
///
/// An invalidated code still yields the hydrated request so the caller can
/// revoke whatever was issued from it.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeLookup<S> {
    Active(GrantRequest<S>),
    Invalidated(GrantRequest<S>),
}

impl<S> CodeLookup<S> {
    pub fn is_invalidated(&self) -> bool {
        matches!(self, CodeLookup::Invalidated(_))
    }

    pub fn request(&self) -> &GrantRequest<S> {
        match self {
            CodeLookup::Active(r) | CodeLookup::Invalidated(r) => r,
        }
    }

    pub fn into_request(self) -> GrantRequest<S> {
        match self {
            CodeLookup::Active(r) | CodeLookup::Invalidated(r) => r,
        }
    }

    /// Collapses to a plain result, losing the request on the error path.
    pub fn into_result(self) -> StoreResult<GrantRequest<S>> {
        match self {
            CodeLookup::Active(r) => Ok(r),
            CodeLookup::Invalidated(_) => Err(StoreError::InvalidatedCode),
        }
    }
}
