use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A client-assertion JWT ID that has already been accepted once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeniedJti {
    pub signature: String,
    /// Seconds since the epoch after which the entry is dead.
    pub expiry: i64,
}

impl DeniedJti {
    pub fn new(jti: &str, expiry: DateTime<Utc>) -> Self {
        Self {
            signature: signature_from_jti(jti),
            expiry: expiry.timestamp(),
        }
    }

    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry > now.timestamp()
    }
}

/// Hex-encoded SHA-256 of the raw JTI; raw values never reach storage.
pub fn signature_from_jti(jti: &str) -> String {
    hex::encode(Sha256::digest(jti.as_bytes()))
}
