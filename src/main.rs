use std::sync::Arc;

use augur::config::Config;
use augur::sources::YahooFinanceClient;
use augur::AppState;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!("Starting Augur server on {}:{}", config.host, config.port);
    info!(
        "Forecast: window {}, horizon {}, layers {:?}, {} epochs; cache TTL {:?}",
        config.forecast.window_size,
        config.forecast.horizon,
        config.forecast.hidden_units,
        config.forecast.epochs,
        config.cache_ttl
    );

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, Arc::new(YahooFinanceClient::new()));
    let app = augur::app(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Augur server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
