use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct MemoryClientStore {
    clients: DashMap<String, Client>,
}

impl MemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, client: Client) {
        self.clients.insert(client.id.clone(), client);
    }

    pub fn remove(&self, id: &str) -> Option<Client> {
        self.clients.remove(id).map(|(_, c)| c)
    }
}

#[async_trait::async_trait]
impl ClientStore for MemoryClientStore {
    async fn get_client(&self, id: &str) -> StoreResult<Client> {
        self.clients
            .get(id)
            .map(|c| c.value().clone())
            .ok_or(StoreError::NotFound)
    }
}
