use serde::{Deserialize, Serialize};

/// An OAuth 2.0 client as seen by session hydration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    /// Hashed secret; empty for public clients.
    pub secret: String,
    pub redirect_uris: Vec<String>,
    pub grant_types: Vec<String>,
    pub response_types: Vec<String>,
    pub scopes: Vec<String>,
    pub audience: Vec<String>,
    pub public: bool,
    pub disabled: bool,
    pub create_time: i64,
    pub update_time: i64,
}
