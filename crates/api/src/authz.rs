//! Route-level permission guard.

use axum::response::Response;

use stockdesk_auth::{authorize, Permission};

use crate::app::errors::forbidden;
use crate::context::PrincipalContext;

/// Check a permission for the request principal; the error side is the
/// ready-made 403 response.
pub fn require_permission(ctx: &PrincipalContext, permission: &str) -> Result<(), Response> {
    let required = Permission::new(permission.to_string());
    authorize(&ctx.principal(), &required).map_err(|e| forbidden(e.to_string()))
}
