//! Answerbook Server binary.
//!
//! Loads configuration from the environment, picks the document store and
//! serves the answer endpoint.

use answerbook_server::config::Config;
use answerbook_server::routes::ANSWERS_PATH;
use answerbook_server::{build_router, build_store, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "answerbook_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Answerbook Server on {}:{}", config.host, config.port);
    tracing::debug!(?config, "loaded configuration");

    let store = build_store(&config)?;
    tracing::info!("Using {} document store", store.name());

    let app = build_router(AppState::new(store));

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}{}", addr, ANSWERS_PATH);

    axum::serve(listener, app).await?;

    Ok(())
}
