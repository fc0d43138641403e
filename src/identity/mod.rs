//! Session state and access control for the console.
//! Keep the public surface thin and split implementation across sub-modules.

mod session;
mod guard;
mod navigation;
pub mod permissions;

pub use session::{Session, SessionPhase, SessionStore};
pub use guard::{Access, AccessGuard, Guarded, RouteGate, LOGIN_PATH, ROOT_PATH};
pub use navigation::{find_route, Navigation, Navigator, View, ViewRoute, ROUTES};
pub use permissions::{has_permission, ADMIN_ALL};
