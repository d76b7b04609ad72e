use serde::{Deserialize, Serialize};

/// One accepted session: the SHA-256 hex of the bearer/cookie token and the user it maps to.
///
/// Plaintext tokens are never written to the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub user_id: String,
    pub token_sha256: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub sessions: Vec<SessionEntry>,
}
