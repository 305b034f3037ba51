use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use std::sync::Arc;

/// Users keyed by username.
pub struct MemoryUserStore {
    users: DashMap<String, User>,
    hasher: Arc<dyn CredentialHasher>,
}

impl MemoryUserStore {
    pub fn new(hasher: Arc<dyn CredentialHasher>) -> Self {
        MemoryUserStore {
            users: DashMap::new(),
            hasher,
        }
    }

    /// Stores `user` with `password` hashed into it.
    pub async fn insert(&self, mut user: User, password: &str) -> StoreResult<()> {
        user.password_hash = self.hasher.hash_password(password).await?;
        self.users.insert(user.username.clone(), user);
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn authenticate(&self, username: &str, secret: &str) -> StoreResult<String> {
        let user = self
            .users
            .get(username)
            .map(|u| u.value().clone())
            .ok_or(StoreError::NotFound)?;
        authenticate_user(self.hasher.as_ref(), &user, secret).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::Argon2PasswordHasher;

    #[tokio::test]
    async fn password_outcomes() {
        let store = MemoryUserStore::new(Arc::new(Argon2PasswordHasher));
        store
            .insert(
                User {
                    id: "u-1".into(),
                    username: "alice".into(),
                    ..Default::default()
                },
                "secret",
            )
            .await
            .unwrap();
        store
            .insert(
                User {
                    id: "u-2".into(),
                    username: "bob".into(),
                    disabled: true,
                    ..Default::default()
                },
                "secret",
            )
            .await
            .unwrap();

        assert_eq!(store.authenticate("alice", "secret").await.unwrap(), "u-1");
        assert!(matches!(
            store.authenticate("alice", "wrong").await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.authenticate("carol", "secret").await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.authenticate("bob", "secret").await,
            Err(StoreError::AccessDenied)
        ));
    }
}
