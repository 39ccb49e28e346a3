use std::net::SocketAddr;

use godzexmd::{
    AppState, build_router,
    config::Config,
    error::Result,
    utils::server::{init_tracing, shutdown_signal},
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.logging)?;

    config.validate()?;
    tracing::info!(format = ?config.logging.format, "Configuration loaded");

    let server_addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::initialize(config).await?;
    let app = build_router(state);

    let listener = TcpListener::bind(server_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    tracing::info!("Server shutdown complete");

    Ok(())
}
