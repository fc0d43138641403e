//! Request and response bodies of the `/auth/*` endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

// No Debug: holds the password.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RawTokenPair {
    access_token: Option<String>,
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair").field("token_type", &self.token_type).finish_non_exhaustive()
    }
}

impl TokenPair {
    /// Both tokens must be present and non-empty; anything else is a contract violation.
    pub fn from_value(endpoint: &str, body: Value) -> ClientResult<Self> {
        let raw: RawTokenPair = serde_json::from_value(body).map_err(|e| ClientError::malformed(endpoint, e.to_string()))?;
        let access_token = raw
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::malformed(endpoint, "missing access_token"))?;
        let refresh_token = raw
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::malformed(endpoint, "missing refresh_token"))?;
        Ok(Self { access_token, refresh_token, token_type: raw.token_type.unwrap_or_else(|| "bearer".to_string()) })
    }
}

/// The caller's identity as reported by `/auth/me`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub permissions: Vec<String>,
}
