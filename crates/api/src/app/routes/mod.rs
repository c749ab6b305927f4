use axum::routing::get;
use axum::Router;

pub mod categories;
pub mod products;
pub mod system;

/// Routes behind the auth middleware.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/api/products", products::router())
        .nest("/api/categories", categories::router())
}
