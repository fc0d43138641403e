use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

/// Credentials and permissions for the current identity. Held in memory only.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub permissions: BTreeSet<String>,
}

/// Lifecycle phase as observed by the navigation gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Anonymous,
    /// Credentials present, identity lookup not completed (or granted nothing).
    Authenticated,
    Authorized,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.access_token, self.permissions.is_empty()) {
            (None, _) => SessionPhase::Anonymous,
            (Some(_), true) => SessionPhase::Authenticated,
            (Some(_), false) => SessionPhase::Authorized,
        }
    }
}

// Tokens are redacted so a traced session never leaks a credential.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |t: &Option<String>| if t.is_some() { "<redacted>" } else { "<none>" };
        f.debug_struct("Session")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("permissions", &self.permissions)
            .finish()
    }
}

/// Shared handle to the session. Clones observe the same state.
///
/// Readers should call [`SessionStore::get`] again after every `.await`; a concurrent
/// refresh may have replaced the credentials in the meantime.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Session {
        self.inner.read().clone()
    }

    /// Replaces both credentials. Permissions are left as they are.
    pub fn set_credentials<A: Into<String>, R: Into<String>>(&self, access: A, refresh: R) {
        let mut s = self.inner.write();
        s.access_token = Some(access.into());
        s.refresh_token = Some(refresh.into());
        debug!(target: "session", "credentials replaced");
    }

    /// Replaces both credentials only if the session still holds `expected_refresh`.
    /// Used by refresh so a logout that lands mid-flight is not undone.
    pub fn replace_credentials_if<A: Into<String>, R: Into<String>>(&self, expected_refresh: &str, access: A, refresh: R) -> bool {
        let mut s = self.inner.write();
        if s.refresh_token.as_deref() != Some(expected_refresh) {
            return false;
        }
        s.access_token = Some(access.into());
        s.refresh_token = Some(refresh.into());
        debug!(target: "session", "credentials rotated");
        true
    }

    pub fn set_permissions<I, P>(&self, permissions: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let set: BTreeSet<String> = permissions.into_iter().map(Into::into).collect();
        debug!(target: "session", count = set.len(), "permissions replaced");
        self.inner.write().permissions = set;
    }

    pub fn clear(&self) {
        *self.inner.write() = Session::default();
        debug!(target: "session", "session cleared");
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.read().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner.read().refresh_token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_authenticated()
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.read().phase()
    }
}
