pub mod client;
pub mod error;
pub mod identity;

pub use client::{ApiClient, ClientConfig, Payload, RequestOptions};
pub use error::{ClientError, ClientResult};
pub use identity::{AccessGuard, Navigation, Navigator, RouteGate, SessionStore};
