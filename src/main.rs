use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelmatch_api::{
    config::Config,
    db::Catalog,
    routes::{create_router, AppState, StateOptions},
    services::providers::TmdbProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelmatch_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // A missing or inconsistent catalog is fatal
    let catalog = Arc::new(
        Catalog::load(&config.model_dir).context("Failed to load movie catalog")?,
    );

    let provider = Arc::new(TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));

    let state = Arc::new(AppState::new(
        catalog,
        provider,
        StateOptions::from_config(&config),
    ));

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;

    // Requests are served while the cache warms; /ready flips once it is done
    state.warmer().spawn(config.popular_count);

    let app = create_router(state);

    tracing::info!(address = %config.bind_address(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
