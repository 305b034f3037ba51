use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    pub scopes: Vec<String>,
    pub disabled: bool,
    pub create_time: i64,
    pub update_time: i64,
}
