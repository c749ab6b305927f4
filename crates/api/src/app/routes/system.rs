use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use chrono::Utc;
use serde_json::json;

use crate::app::AppServices;
use crate::context::PrincipalContext;

pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> Response {
    Json(json!({
        "status": "OK",
        "store": services.store_kind,
        "timestamp": Utc::now(),
    }))
    .into_response()
}

pub async fn whoami(Extension(ctx): Extension<PrincipalContext>) -> Response {
    Json(json!({
        "userId": ctx.user_id(),
        "role": ctx.role(),
    }))
    .into_response()
}
