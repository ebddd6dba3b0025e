use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use funding_data::exchange::registry::AdapterRegistry;
use funding_scanner::{
    aggregator::Aggregator,
    config::ScannerConfig,
    server::{routes, AppState},
    trade::{HttpExecutionClient, TradeEmitter},
};
use tracing::{error, info};

/*----- */
// Main
/*----- */
#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Env first so RUST_LOG and the config path can come from .env
    let _ = dotenvy::dotenv();
    init_logging();

    // Config
    let config = ScannerConfig::load().map_err(|error| {
        error!(%error, "failed to load scanner config");
        std::io::Error::other(error)
    })?;

    // Adapters & aggregator
    let registry = Arc::new(AdapterRegistry::new(&config.adapter_settings()));
    let aggregator = Arc::new(Aggregator::new(
        registry,
        config.aggregator.max_in_flight_per_venue,
    ));

    // Trade emitter
    let emitter = TradeEmitter::new(Arc::new(HttpExecutionClient::new(
        config.execution.endpoints.clone(),
        config.http_settings().request_timeout,
    )));

    let address = (config.server.host.clone(), config.server.port);
    let state = web::Data::new(AppState::new(aggregator, emitter, config));

    info!(host = %address.0, port = address.1, "starting funding scanner");

    // Http server
    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
        .bind(address)?
        .run()
        .await
}

/*----- */
// Logging config
/*----- */
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        // Disable colours on release builds
        .with_ansi(cfg!(debug_assertions))
        // Enable Json formatting
        .json()
        // Install this Tracing subscriber as global default
        .init()
}
