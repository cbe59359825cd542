//! Deconfliction Server - checks drone missions for spatio-temporal conflicts

use anyhow::{Context, Result};
use deconflict_server::{api, config::Config, state::AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("deconflict_server=debug".parse()?)
            .add_directive("deconflict_core=info".parse()?))
        .init();

    tracing::info!("Starting Deconfliction Server...");

    let config = Config::from_env();
    config
        .rules()
        .validate()
        .context("invalid DECONFLICT_SAFE_DISTANCE_M / DECONFLICT_TIME_WINDOW_S")?;
    tracing::info!(
        safe_distance = config.safe_distance,
        time_window = config.time_window,
        strategy = %config.strategy,
        "Default separation rules"
    );

    let port = config.server_port;
    let state = Arc::new(AppState::new(&config));

    let app = api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
