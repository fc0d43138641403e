//! Permission identifiers granted by the backend and the wildcard check.

use std::collections::BTreeSet;

/// Wildcard: satisfies any permission check.
pub const ADMIN_ALL: &str = "admin.all";

pub const ADMIN_USERS_WRITE: &str = "admin.users.write";
pub const ADMIN_RBAC_READ: &str = "admin.rbac.read";
pub const ADMIN_RBAC_WRITE: &str = "admin.rbac.write";
pub const ADMIN_AUDIT_READ: &str = "admin.audit.read";
pub const K8S_READ: &str = "k8s.read";
pub const K8S_WRITE: &str = "k8s.write";
pub const SPARK_DEPLOY: &str = "spark.deploy";
pub const KAFKA_DEPLOY: &str = "kafka.deploy";
pub const ALERTS_MANAGE: &str = "alerts.manage";
pub const AI_USE: &str = "ai.use";

pub fn has_permission(granted: &BTreeSet<String>, required: &str) -> bool {
    granted.contains(required) || granted.contains(ADMIN_ALL)
}
