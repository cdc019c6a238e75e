use std::sync::Arc;

use auth::Authenticator;
use chirpy::config::Config;
use chirpy::domain::chirp::service::ChirpService;
use chirpy::domain::user::service::UserService;
use chirpy::inbound::http::router::create_router;
use chirpy::outbound::repositories::JsonFileDatabase;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirpy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "chirpy",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_path = %config.database.path,
        http_port = config.server.http_port,
        static_dir = %config.server.static_dir,
        token_ttl_seconds = config.jwt.expiration_seconds,
        "Configuration loaded"
    );

    let database = Arc::new(JsonFileDatabase::open(&config.database.path).await?);
    tracing::info!(
        path = %database.path().display(),
        database = "json-file",
        "Database opened"
    );

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        chrono::Duration::seconds(config.jwt.expiration_seconds),
    ));
    let user_service = Arc::new(UserService::new(Arc::clone(&database)));
    let chirp_service = Arc::new(ChirpService::new(Arc::clone(&database)));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        user_service,
        chirp_service,
        authenticator,
        &config.server.static_dir,
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
