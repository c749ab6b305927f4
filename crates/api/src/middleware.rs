//! Bearer-token authentication middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use stockdesk_auth::Hs256TokenCodec;

use crate::app::errors::json_error;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<Hs256TokenCodec>,
}

fn unauthorized() -> Response {
    json_error(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        "missing or invalid bearer token",
    )
}

/// Verify the `Authorization: Bearer <token>` header and attach a
/// [`PrincipalContext`] to the request. Any failure is an opaque 401 with
/// the standard error body; the reason is not disclosed.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(&request).ok_or_else(unauthorized)?;

    let claims = state
        .jwt
        .validate(&token, Utc::now())
        .map_err(|_| unauthorized())?;

    request
        .extensions_mut()
        .insert(PrincipalContext::new(claims.sub, claims.role));

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
