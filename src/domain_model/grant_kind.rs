use serde::{Deserialize, Serialize};
use std::fmt;

/// The five grant collections backed by the generic request store.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantKind {
    AccessToken,
    RefreshToken,
    AuthorizationCode,
    Pkce,
    OidcSession,
}

impl GrantKind {
    pub const ALL: [GrantKind; 5] = [
        GrantKind::AccessToken,
        GrantKind::RefreshToken,
        GrantKind::AuthorizationCode,
        GrantKind::Pkce,
        GrantKind::OidcSession,
    ];

    /// Storage namespace for this grant kind.
    pub fn collection(&self) -> &'static str {
        match self {
            GrantKind::AccessToken => "access_token",
            GrantKind::RefreshToken => "refresh_token",
            GrantKind::AuthorizationCode => "authorization_code",
            GrantKind::Pkce => "pkce_session",
            GrantKind::OidcSession => "openid_connect_session",
        }
    }
}

impl fmt::Display for GrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}
