use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, Method};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use auth_api::{router, AppState};
use auth_core::{AuthPolicy, AuthService, SystemClock};
use auth_infrastructure::{spawn_sweeper, SqlAuthRepository};
use auth_security::SnowflakeGenerator;
use auth_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    auth_shared::telemetry::init_telemetry();

    info!("Auth server starting...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Connect to database and create the schema
    info!("Connecting to database...");
    let repo = SqlAuthRepository::connect(&config.database.url, config.database.max_connections)
        .await
        .context("database unavailable")?;
    info!("Database connection established.");

    let ids = SnowflakeGenerator::new(config.auth.node_id).context("invalid auth.node_id")?;
    let policy = AuthPolicy {
        initial_ttl: config.auth.token_lifespan(),
        renew_ttl: config.auth.renew_lifespan(),
    };
    let service = Arc::new(AuthService::new(
        Arc::new(repo),
        ids,
        Arc::new(SystemClock),
        policy,
    ));

    if let Some(interval) = config.auth.sweep_interval() {
        info!(interval_secs = interval.as_secs(), "Starting session sweeper");
        spawn_sweeper(service.clone(), interval);
    }

    let state = AppState {
        auth: service,
        cookie_secure: config.auth.cookie_secure,
    };

    // Build router
    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        );

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
