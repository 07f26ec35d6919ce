use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use server_core::{build_app, Config, Store};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let port = config.port;

    let store = Store::new(&config.database_url)
        .await
        .context("Failed to open the database")?;

    let app = build_app(config, store);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    tracing::info!(port, "server listening");

    axum::serve(listener, app)
        .await
        .context("Server exited with error")?;

    Ok(())
}
