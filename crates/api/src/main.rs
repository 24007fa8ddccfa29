use anyhow::Context;
use storefront_infra::{AppConfig, LogFormat};
use storefront_observability::OutputFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;

    storefront_observability::init_with(match config.log_format {
        LogFormat::Json => OutputFormat::Json,
        LogFormat::Pretty => OutputFormat::Pretty,
    });

    let services = storefront_api::app::services::build_services(&config).await?;
    let app = storefront_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
