use super::{StoreError, StoreResult};
use crate::domain_model::User;

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, StoreError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, StoreError>;
}

/// Resolves a password grant against a fetched user record.
///
/// A disabled account is [`StoreError::AccessDenied`] before the secret is
/// looked at; a wrong secret is [`StoreError::NotFound`].
pub async fn authenticate_user(
    hasher: &dyn CredentialHasher,
    user: &User,
    secret: &str,
) -> StoreResult<String> {
    if user.disabled {
        return Err(StoreError::AccessDenied);
    }
    if !hasher.verify_password(secret, &user.password_hash).await? {
        return Err(StoreError::NotFound);
    }
    Ok(user.id.clone())
}
