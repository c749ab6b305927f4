//! Application assembly: stores, auth state, and the router.

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Extension, Router};

use stockdesk_auth::Hs256TokenCodec;
use stockdesk_infra::AppConfig;

use crate::middleware::{auth_middleware, AuthState};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full application router.
///
/// `/health` is open; everything else sits behind bearer-token auth.
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config).await?);

    let auth_state = AuthState {
        jwt: Arc::new(Hs256TokenCodec::new(config.jwt_secret.as_bytes())),
    };

    let protected = routes::router().layer(from_fn_with_state(auth_state, auth_middleware));

    let app = Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(Extension(services));

    Ok(app)
}
