use stockdesk_auth::{Principal, Role};
use stockdesk_core::UserId;

/// Principal context for a request (authenticated identity + role).
///
/// This is immutable and must be present for all domain routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
    role: Role,
}

impl PrincipalContext {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Resolve the authorization principal (applies the role policy).
    pub fn principal(&self) -> Principal {
        Principal::resolve(self.user_id, self.role.clone())
    }
}
