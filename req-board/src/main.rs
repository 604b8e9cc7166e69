use anyhow::Result;
use clap::Parser;
use req_board::{api, config::ServerConfig};
use req_board_core::storage::json::JsonStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();
    let store = JsonStore::load(&config.db);
    info!("Using store {}", store.path().display());
    let app = api::router(Arc::new(RwLock::new(store)));

    let listener = TcpListener::bind(config.addr).await?;
    info!("Server is running on {}", config.addr);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        })
        .await?;
    info!("Server stopped");
    Ok(())
}
