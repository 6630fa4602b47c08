use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

mod board;
mod config;
mod dashboard;
mod slate;

use board::{BoardController, BoardState};
use config::Config;
use dashboard::AppState;
use slate::{HttpSlateSource, MockSlateSource, SlateSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let source: Arc<dyn SlateSource> = if config.mock {
        info!("Using the built-in demo slate");
        Arc::new(MockSlateSource)
    } else {
        info!("Slate source: {}", config.games_api_url);
        Arc::new(HttpSlateSource::new(
            &config.games_api_url,
            config.request_timeout(),
        )?)
    };

    let initial = BoardState::new(config.sort(), config.filter(), config.theme());
    let board = BoardController::new(source, initial);
    info!(
        "Board ready (source={}, sort={}, filter={}, theme={})",
        board.source_name(),
        config.sort(),
        config.filter(),
        config.theme().as_str()
    );

    // First load happens in the background; the page shows a loading state until it lands.
    board.spawn_refresh().await;

    let app = dashboard::router(AppState {
        board: board.clone(),
    });
    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard on {}", addr))?;
    info!("Dashboard listening on http://{}", addr);

    // Run dashboard server (blocks until shutdown)
    axum::serve(listener, app).await?;

    Ok(())
}
