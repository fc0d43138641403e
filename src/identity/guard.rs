//! View gates. Both are pure decisions over a session snapshot and are re-evaluated on every call.

use super::permissions::has_permission;
use super::session::{Session, SessionStore};

pub const LOGIN_PATH: &str = "/login";
pub const ROOT_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Redirect(&'static str),
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }
}

/// Result of rendering through a gate. `view` only runs on `Rendered`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<V> {
    Rendered(V),
    Redirected(&'static str),
}

impl<V> Guarded<V> {
    fn from_access<F: FnOnce() -> V>(access: Access, view: F) -> Self {
        match access {
            Access::Granted => Guarded::Rendered(view()),
            Access::Redirect(to) => Guarded::Redirected(to),
        }
    }
}

/// Coarse gate for the authenticated section: any identity with an access credential passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGate;

impl RouteGate {
    pub fn check(&self, session: &Session) -> Access {
        if session.is_authenticated() {
            Access::Granted
        } else {
            Access::Redirect(LOGIN_PATH)
        }
    }

    pub fn render<V, F: FnOnce() -> V>(&self, store: &SessionStore, view: F) -> Guarded<V> {
        Guarded::from_access(self.check(&store.get()), view)
    }
}

/// Per-view gate on a single permission identifier (or the `admin.all` wildcard).
#[derive(Debug, Clone)]
pub struct AccessGuard {
    required: String,
}

impl AccessGuard {
    pub fn new<S: Into<String>>(required: S) -> Self {
        Self { required: required.into() }
    }

    pub fn required(&self) -> &str {
        &self.required
    }

    pub fn check(&self, session: &Session) -> Access {
        if has_permission(&session.permissions, &self.required) {
            Access::Granted
        } else {
            Access::Redirect(ROOT_PATH)
        }
    }

    pub fn render<V, F: FnOnce() -> V>(&self, store: &SessionStore, view: F) -> Guarded<V> {
        Guarded::from_access(self.check(&store.get()), view)
    }
}
