use lead_board::{load_ledger, router, AppState, ServerConfig};
use std::net::SocketAddr;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = ServerConfig::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    if config.account.is_none() {
        warn!("LEAD_BOARD_EMAIL/LEAD_BOARD_PASSWORD not set; login is disabled");
    }

    let ledger = load_ledger(&config.data_path).await;
    info!(
        target_leads = ledger.total_target,
        achieved = ledger.achieved_leads,
        path = %config.data_path.display(),
        "ledger loaded"
    );
    let state = AppState::new(config.data_path, ledger, config.account);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
