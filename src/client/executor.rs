//! Authenticated request executor.
//!
//! Every outbound API call goes through [`ApiClient::fetch`]: it attaches the current access
//! credential, recognises `401` as the only refresh trigger, performs at most one
//! refresh-and-retry cycle, and normalises the response into a [`Payload`] or [`ClientError`].

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::config::ClientConfig;
use super::refresh::TokenRefresher;
use crate::error::{ClientError, ClientResult};
use crate::identity::SessionStore;

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `204 No Content`.
    NoContent,
    Json(Value),
}

impl Payload {
    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::NoContent => None,
            Payload::Json(v) => Some(v),
        }
    }

    pub fn is_no_content(&self) -> bool {
        matches!(self, Payload::NoContent)
    }
}

/// Method, JSON body and extra headers for one call. Bodies are always sent as JSON.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { method: Method::GET, body: None, headers: HeaderMap::new() }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post(body: Value) -> Self {
        Self::new(Method::POST).body(body)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn json<T: Serialize>(self, body: &T) -> ClientResult<Self> {
        let v = serde_json::to_value(body).map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(self.body(v))
    }

    pub fn header(mut self, name: &str, value: &str) -> ClientResult<Self> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
        let value = HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
        self.headers.insert(name, value);
        Ok(self)
    }
}

/// Cheap to clone; clones share the session, the HTTP connection pool and the refresh slot.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    session: SessionStore,
    refresher: TokenRefresher,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: SessionStore) -> ClientResult<Self> {
        config.validate()?;
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(t) = config.request_timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build().map_err(|e| ClientError::Config(e.to_string()))?;
        let config = Arc::new(config);
        let refresher = TokenRefresher::new(http.clone(), config.clone(), session.clone());
        Ok(Self { http, config, session, refresher })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn refresher(&self) -> &TokenRefresher {
        &self.refresher
    }

    pub async fn fetch(&self, path: &str, opts: RequestOptions) -> ClientResult<Payload> {
        let url = self.config.endpoint(path)?;
        let body = match &opts.body {
            Some(v) => Some(serde_json::to_vec(v).map_err(|e| ClientError::Decode(e.to_string()))?),
            None => None,
        };

        let sent_token = self.session.access_token();
        let mut res = self.send(&url, &opts, body.clone(), sent_token.as_deref()).await?;

        if res.status() == StatusCode::UNAUTHORIZED {
            // Re-read: another call may have refreshed or a logout may have cleared the session.
            let current = self.session.get();
            if current.refresh_token.is_some() {
                if current.access_token.is_some() && current.access_token != sent_token {
                    debug!(target: "client", path, "credential already renewed by a concurrent call");
                } else {
                    debug!(target: "client", path, "401 received, refreshing credential");
                    self.refresher.refresh().await?;
                }
                let fresh = self.session.access_token();
                res = self.send(&url, &opts, body, fresh.as_deref()).await?;
            }
        }

        decode(res).await
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str, opts: RequestOptions) -> ClientResult<T> {
        let value = self.fetch(path, opts).await?.into_json().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn get(&self, path: &str) -> ClientResult<Payload> {
        self.fetch(path, RequestOptions::get()).await
    }

    pub async fn post(&self, path: &str, body: Value) -> ClientResult<Payload> {
        self.fetch(path, RequestOptions::post(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> ClientResult<Payload> {
        self.fetch(path, RequestOptions::new(Method::PUT).body(body)).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<Payload> {
        self.fetch(path, RequestOptions::new(Method::DELETE)).await
    }

    async fn send(
        &self,
        url: &reqwest::Url,
        opts: &RequestOptions,
        body: Option<Vec<u8>>,
        access_token: Option<&str>,
    ) -> ClientResult<Response> {
        let headers = build_headers(&opts.headers, access_token)?;
        let mut req = self.http.request(opts.method.clone(), url.clone()).headers(headers);
        if let Some(b) = body {
            req = req.body(b);
        }
        debug!(target: "client", method = %opts.method, url = %url, "sending request");
        Ok(req.send().await?)
    }
}

/// Caller headers, then a forced JSON content type and the bearer credential.
pub(crate) fn build_headers(extra: &HeaderMap, access_token: Option<&str>) -> ClientResult<HeaderMap> {
    let mut headers = extra.clone();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(token) = access_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

async fn decode(res: Response) -> ClientResult<Payload> {
    let status = res.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(Payload::NoContent);
    }
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(ClientError::request_failed(status.as_u16(), text));
    }
    let bytes = res.bytes().await?;
    let value = serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))?;
    Ok(Payload::Json(value))
}
