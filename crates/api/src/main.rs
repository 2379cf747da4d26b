use std::sync::Arc;

use anyhow::Context;

use workwear_api::app::{build_app, AppServices};
use workwear_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    workwear_observability::init();

    let config = AppConfig::from_env()?;
    let services = Arc::new(AppServices::from_config(&config).await?);
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
