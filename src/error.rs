//! Error model for the API client.
//! Every failure is scoped to the request that produced it and handed back to the caller;
//! nothing here is fatal to the process.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// A refresh was needed but the session holds no refresh credential.
    #[error("no refresh credential in session")]
    NoRefreshCredential,

    /// The backend refused the refresh credential (expired or revoked).
    #[error("refresh rejected (HTTP {status}): {message}")]
    RefreshRejected { status: u16, message: String },

    /// Any non-success response after the single refresh-and-retry cycle.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// A success response that broke the auth contract (e.g. a token pair with a missing field).
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("invalid JSON body: {0}")]
    Decode(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid header value: {0}")]
    InvalidHeader(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn code_str(&self) -> &'static str {
        match self {
            ClientError::NoRefreshCredential => "no_refresh_credential",
            ClientError::RefreshRejected { .. } => "refresh_rejected",
            ClientError::RequestFailed { .. } => "request_failed",
            ClientError::MalformedResponse { .. } => "malformed_response",
            ClientError::Decode(_) => "decode_error",
            ClientError::Transport(_) => "transport_error",
            ClientError::InvalidUrl(_) => "invalid_url",
            ClientError::InvalidHeader(_) => "invalid_header",
            ClientError::Config(_) => "config_error",
        }
    }

    /// HTTP status carried by the failure, if the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RefreshRejected { status, .. } | ClientError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the session can no longer be renewed and the caller should clear it and route to login.
    pub fn requires_login(&self) -> bool {
        matches!(self, ClientError::NoRefreshCredential | ClientError::RefreshRejected { .. })
    }

    pub(crate) fn request_failed(status: u16, body: String) -> Self {
        let message = if body.is_empty() { format!("HTTP {}", status) } else { body };
        ClientError::RequestFailed { status, message }
    }

    pub(crate) fn malformed<E: Into<String>, R: Into<String>>(endpoint: E, reason: R) -> Self {
        ClientError::MalformedResponse { endpoint: endpoint.into(), reason: reason.into() }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
