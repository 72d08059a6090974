/*
 * Yield Lens - APR aggregation service
 * Main entry point for the application
 */

use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yield_lens::{
    api,
    config::{Config, LogFormat},
    metrics::Metrics,
    service::YieldService,
};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    init_tracing(&config.server.log_level, config.server.log_format);

    info!("Starting Yield Lens APR aggregation service");

    let metrics = Arc::new(Metrics::new().context("failed to register metrics")?);
    let service = YieldService::new(&config, metrics).map_err(|e| {
        error!("Failed to initialize yield service: {}", e);
        e
    })?;

    let api_state = api::ApiState {
        service: Arc::new(service),
    };

    info!("Starting API server on {}:{}", config.server.host, config.server.port);

    let figment = rocket::Config::figment()
        .merge(("address", config.server.host.clone()))
        .merge(("port", config.server.port));

    if let Err(e) = api::create_rocket(api_state).configure(figment).launch().await {
        error!("API server terminated: {}", e);
        anyhow::bail!("API server terminated");
    }

    Ok(())
}

fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("yield_lens={log_level}").into());

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}
