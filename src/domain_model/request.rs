use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Original request parameters, one key to many values.
pub type Form = BTreeMap<String, Vec<String>>;

/// One stored grant or session record.
///
/// `signature` is the lookup key used by the grant wrappers; `id` is the
/// storage identity. Both are unique within a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    /// Seconds since the epoch.
    pub create_time: i64,
    /// Seconds since the epoch, refreshed on every update.
    pub update_time: i64,
    pub requested_at: Option<DateTime<Utc>>,
    pub signature: String,
    pub client_id: String,
    pub user_id: String,
    pub requested_scope: Vec<String>,
    pub granted_scope: Vec<String>,
    pub requested_audience: Vec<String>,
    pub granted_audience: Vec<String>,
    pub form: Form,
    /// Only meaningful for authorization codes; never flips back to true.
    pub active: bool,
    /// Serialized framework session, stored and returned untouched.
    pub session: Vec<u8>,
}

impl Request {
    pub fn new() -> Self {
        Self {
            id: String::new(),
            create_time: 0,
            update_time: 0,
            requested_at: None,
            signature: String::new(),
            client_id: String::new(),
            user_id: String::new(),
            requested_scope: Vec::new(),
            granted_scope: Vec::new(),
            requested_audience: Vec::new(),
            granted_audience: Vec::new(),
            form: Form::new(),
            active: true,
            session: Vec::new(),
        }
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}
