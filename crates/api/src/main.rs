use stockdesk_infra::AppConfig;

#[tokio::main]
async fn main() {
    stockdesk_observability::init();

    let config = AppConfig::from_env();

    let app = match stockdesk_api::app::build_app(&config).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("failed to build application: {e}");
            std::process::exit(1);
        }
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind listen address");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
