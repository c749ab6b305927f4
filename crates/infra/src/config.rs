//! Environment-driven configuration.

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address, e.g. "0.0.0.0:8080".
    pub bind_addr: String,

    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,

    /// When set, the Postgres stores are used instead of the in-memory ones.
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());

        Self {
            bind_addr,
            jwt_secret,
            database_url,
        }
    }
}
