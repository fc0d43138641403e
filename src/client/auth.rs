use tracing::{info, warn};

use super::executor::{ApiClient, RequestOptions};
use super::wire::{Identity, LoginRequest, TokenPair};
use crate::error::{ClientError, ClientResult};

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const ME_ENDPOINT: &str = "/auth/me";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout";

impl ApiClient {
    /// `POST /auth/login` and store the returned credential pair. Permissions are not touched.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<()> {
        let opts = RequestOptions::new(reqwest::Method::POST).json(&LoginRequest { username, password })?;
        let body = self
            .fetch(LOGIN_ENDPOINT, opts)
            .await?
            .into_json()
            .ok_or_else(|| ClientError::malformed(LOGIN_ENDPOINT, "empty body"))?;
        let pair = TokenPair::from_value(LOGIN_ENDPOINT, body)?;
        self.session().set_credentials(pair.access_token, pair.refresh_token);
        info!(target: "client", user = username, "logged in");
        Ok(())
    }

    /// `GET /auth/me` and replace the session's permission set with the result.
    pub async fn load_identity(&self) -> ClientResult<Identity> {
        let me: Identity = self.fetch_json(ME_ENDPOINT, RequestOptions::get()).await?;
        self.session().set_permissions(me.permissions.iter().cloned());
        info!(target: "client", user = ?me.username, permissions = me.permissions.len(), "identity loaded");
        Ok(me)
    }

    /// Login followed by the identity lookup.
    pub async fn sign_in(&self, username: &str, password: &str) -> ClientResult<Identity> {
        self.login(username, password).await?;
        self.load_identity().await
    }

    /// Notify the backend (best effort) and reset the session to anonymous.
    pub async fn logout(&self) {
        if self.session().is_authenticated() {
            if let Err(e) = self.fetch(LOGOUT_ENDPOINT, RequestOptions::new(reqwest::Method::POST)).await {
                warn!(target: "client", code = e.code_str(), "logout request failed: {}", e);
            }
        }
        self.session().clear();
        info!(target: "client", "logged out");
    }

    /// Clear the session when `err` means it can no longer be renewed. Returns the error unchanged.
    pub fn end_session_if_expired(&self, err: ClientError) -> ClientError {
        if err.requires_login() {
            warn!(target: "client", code = err.code_str(), "session expired");
            self.session().clear();
        }
        err
    }
}
