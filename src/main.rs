use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use geocoding::{CachedGeocoder, NominatimClient, RateLimited};
use tokio::net::TcpListener;
use tracing::{error, info};
use web::AppState;

mod config;
mod geocoding;
mod map;
mod model;
mod registry;
mod telemetry;
mod utils;
mod web;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    _ = dotenvy::dotenv();
    let config = Config::parse();

    let telemetry = telemetry::init(&config)?;
    info!(?config, "starting");

    let nominatim = NominatimClient::new(
        &config.nominatim_url,
        &config.user_agent,
        config.http_timeout(),
    )?;
    let geocoder = CachedGeocoder::new(
        RateLimited::new(nominatim, config.min_delay()),
        config.cache_ttl(),
        usize::try_from(config.cache_capacity).unwrap_or(usize::MAX),
    );

    let app = web::router(AppState::new(geocoder));

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("couldn't bind {}", config.bind))?;
    info!("listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("web server failed")?;

    info!("stopped");
    telemetry.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("couldn't listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
