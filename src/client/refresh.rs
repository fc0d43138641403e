//! Token refresh with single-flight semantics.
//!
//! Concurrent callers that hit an expired access credential share one `POST /auth/refresh`
//! instead of each racing to overwrite the session. The in-flight slot is a plain
//! check-and-set under a mutex that is never held across an `.await`.

use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};

use super::config::ClientConfig;
use super::wire::{RefreshRequest, TokenPair};
use crate::error::{ClientError, ClientResult};
use crate::identity::SessionStore;

pub const REFRESH_ENDPOINT: &str = "/auth/refresh";

type Flight = Shared<BoxFuture<'static, ClientResult<()>>>;

#[derive(Default)]
struct Slot {
    generation: u64,
    flight: Option<(u64, Flight)>,
}

#[derive(Clone)]
pub struct TokenRefresher {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    session: SessionStore,
    slot: Arc<Mutex<Slot>>,
}

impl TokenRefresher {
    pub fn new(http: reqwest::Client, config: Arc<ClientConfig>, session: SessionStore) -> Self {
        Self { http, config, session, slot: Arc::new(Mutex::new(Slot::default())) }
    }

    /// Exchanges the session's refresh credential for a new pair and stores it.
    ///
    /// Joins the refresh already in flight if there is one. On failure the session is left untouched.
    pub async fn refresh(&self) -> ClientResult<()> {
        let (id, flight) = {
            let mut slot = self.slot.lock();
            if let Some((id, flight)) = slot.flight.clone() {
                debug!(target: "client", flight = id, "joining in-flight refresh");
                (id, flight)
            } else {
                slot.generation += 1;
                let id = slot.generation;
                let flight = refresh_once(self.http.clone(), self.config.clone(), self.session.clone())
                    .boxed()
                    .shared();
                slot.flight = Some((id, flight.clone()));
                (id, flight)
            }
        };

        let result = flight.await;

        let mut slot = self.slot.lock();
        if matches!(&slot.flight, Some((current, _)) if *current == id) {
            slot.flight = None;
        }
        result
    }

    /// True while a refresh is in progress. Exposed for diagnostics and tests.
    pub fn in_flight(&self) -> bool {
        self.slot.lock().flight.is_some()
    }
}

async fn refresh_once(http: reqwest::Client, config: Arc<ClientConfig>, session: SessionStore) -> ClientResult<()> {
    let Some(refresh_token) = session.refresh_token() else {
        return Err(ClientError::NoRefreshCredential);
    };
    let url = config.endpoint(REFRESH_ENDPOINT)?;
    debug!(target: "client", "requesting new credential pair");

    let res = http
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .json(&RefreshRequest { refresh_token: &refresh_token })
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        warn!(target: "client", status = status.as_u16(), "refresh credential rejected");
        let message = if body.is_empty() { "refresh failed".to_string() } else { body };
        return Err(ClientError::RefreshRejected { status: status.as_u16(), message });
    }

    let body: serde_json::Value = res
        .json()
        .await
        .map_err(|e| ClientError::malformed(REFRESH_ENDPOINT, e.to_string()))?;
    let pair = TokenPair::from_value(REFRESH_ENDPOINT, body)?;

    if !session.replace_credentials_if(&refresh_token, pair.access_token, pair.refresh_token) {
        // Session was cleared or replaced by a new login while the refresh was in flight.
        debug!(target: "client", "session changed during refresh; discarding new pair");
        return if session.is_authenticated() { Ok(()) } else { Err(ClientError::NoRefreshCredential) };
    }
    info!(target: "client", "access credential refreshed");
    Ok(())
}
