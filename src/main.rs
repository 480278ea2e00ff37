use std::sync::Arc;

use anyhow::Context as _;
use tracing::info;

use pokeview::routes::router;
use pokeview::state::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokeview=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env();
    info!(
        "Using backend at {} ({} spin steps, {:?} base interval)",
        config.api_url, config.spin.steps, config.spin.base_interval
    );

    let state = AppState::from_config(&config).context("Cannot initialise application")?;
    let app = router(Arc::new(state), &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Cannot bind {}", config.bind_address))?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
