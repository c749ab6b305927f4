//! Pure authorization policy: role → permissions mapping and the check itself.

use std::collections::HashSet;

use thiserror::Error;

use stockdesk_core::UserId;

use crate::{Permission, Role};

/// A fully resolved principal for authorization decisions.
///
/// Construction of this object is intentionally decoupled from storage and
/// transport: the API derives it from verified token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
    pub permissions: Vec<Permission>,
}

impl Principal {
    /// Resolve a principal from claims, applying the role policy.
    pub fn resolve(user_id: UserId, role: Role) -> Self {
        let permissions = role_permissions(&role);
        Self {
            user_id,
            role,
            permissions,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Role→permission mapping.
///
/// Convention: `admin` is granted the wildcard; `manager` may manage the
/// category taxonomy. Every other role is ordinary staff with read/product
/// access only (which requires no permission beyond authentication).
pub fn role_permissions(role: &Role) -> Vec<Permission> {
    if role.is_admin() {
        return vec![Permission::new("*")];
    }
    if role.is_manager() {
        return vec![Permission::new("categories.manage")];
    }
    Vec::new()
}

/// Authorize a principal for a required permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let perms: HashSet<&str> = principal.permissions.iter().map(|p| p.as_str()).collect();

    if perms.contains("*") || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}
