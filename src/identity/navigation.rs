//! Route table for the console and the navigator that applies the gates in order:
//! the route gate first, then the per-view permission guard.

use tracing::debug;

use super::guard::{Access, AccessGuard, RouteGate, LOGIN_PATH};
use super::permissions::{ADMIN_RBAC_READ, AI_USE, ALERTS_MANAGE, KAFKA_DEPLOY, SPARK_DEPLOY};
use super::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    ClusterOverview,
    Namespaces,
    Workloads,
    Spark,
    Kafka,
    Alerts,
    AiInsights,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRoute {
    pub path: &'static str,
    pub title: &'static str,
    pub view: View,
    /// Reachable without credentials.
    pub public: bool,
    pub required: Option<&'static str>,
}

const fn protected(path: &'static str, title: &'static str, view: View, required: Option<&'static str>) -> ViewRoute {
    ViewRoute { path, title, view, public: false, required }
}

pub static ROUTES: &[ViewRoute] = &[
    ViewRoute { path: LOGIN_PATH, title: "Login", view: View::Login, public: true, required: None },
    protected("/", "Cluster", View::ClusterOverview, None),
    protected("/namespaces", "Namespaces", View::Namespaces, None),
    protected("/workloads", "Workloads", View::Workloads, None),
    protected("/spark", "Spark", View::Spark, Some(SPARK_DEPLOY)),
    protected("/kafka", "Kafka", View::Kafka, Some(KAFKA_DEPLOY)),
    protected("/alerts", "Alerts", View::Alerts, Some(ALERTS_MANAGE)),
    protected("/ai", "AI Insights", View::AiInsights, Some(AI_USE)),
    protected("/admin", "Admin", View::Admin, Some(ADMIN_RBAC_READ)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(&'static ViewRoute),
    Redirect(&'static str),
    NotFound,
}

pub fn find_route(path: &str) -> Option<&'static ViewRoute> {
    let trimmed = path.trim_end_matches('/');
    let key = if trimmed.is_empty() { "/" } else { trimmed };
    ROUTES.iter().find(|r| r.path == key)
}

#[derive(Clone)]
pub struct Navigator {
    session: SessionStore,
}

impl Navigator {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    pub fn navigate(&self, path: &str) -> Navigation {
        let Some(route) = find_route(path) else {
            return Navigation::NotFound;
        };
        if route.public {
            return Navigation::Render(route);
        }
        let session = self.session.get();
        if let Access::Redirect(to) = RouteGate.check(&session) {
            debug!(target: "session", path = route.path, to, "unauthenticated navigation redirected");
            return Navigation::Redirect(to);
        }
        if let Some(required) = route.required {
            if let Access::Redirect(to) = AccessGuard::new(required).check(&session) {
                debug!(target: "session", path = route.path, required, "permission missing, redirected");
                return Navigation::Redirect(to);
            }
        }
        Navigation::Render(route)
    }

    /// Protected routes the current session may open, in sidebar order.
    pub fn visible_routes(&self) -> Vec<&'static ViewRoute> {
        ROUTES
            .iter()
            .filter(|r| !r.public)
            .filter(|r| matches!(self.navigate(r.path), Navigation::Render(_)))
            .collect()
    }
}
