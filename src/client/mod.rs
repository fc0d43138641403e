//! HTTP client for the orchestrator API: configuration, the authenticated request
//! executor, single-flight token refresh and the `/auth/*` endpoints.

mod auth;
mod config;
mod executor;
mod refresh;
mod wire;

pub use auth::{LOGIN_ENDPOINT, LOGOUT_ENDPOINT, ME_ENDPOINT};
pub use config::{ClientConfig, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_TIMEOUT_SECS};
pub use executor::{ApiClient, Payload, RequestOptions};
pub use refresh::{TokenRefresher, REFRESH_ENDPOINT};
pub use wire::{Identity, LoginRequest, RefreshRequest, TokenPair};
