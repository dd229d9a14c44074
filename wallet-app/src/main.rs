//! # Wallet Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the preference store adapter
//! - Create the exchange rate client and the currency service
//! - Load the display context and start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallet_client::ExchangeRateClient;
use wallet_hex::{CurrencyService, DisplayCurrency, RateCacheConfig, inbound::HttpServer};
use wallet_repo::build_store;

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // gRPC exporter with batch processing (non-blocking); endpoint from OTEL_EXPORTER_OTLP_ENDPOINT
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("wallet-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::from_env()?;

    // OpenTelemetry export only when a collector is configured
    let (telemetry, otel_provider) = match &config.otel_endpoint {
        Some(_) => {
            let (tracer, provider) = init_tracer()?;
            (
                Some(tracing_opentelemetry::layer().with_tracer(tracer)),
                Some(provider),
            )
        }
        None => (None, None),
    };

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wallet_app=debug,wallet_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    tracing::info!("Starting wallet server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);

    // Build preference store (handles connection and migration)
    let store = build_store(&config.database_url).await?;

    // Exchange rate client and conversion service
    let client = if config.rate_api_urls.is_empty() {
        ExchangeRateClient::new()
    } else {
        ExchangeRateClient::with_endpoints(config.rate_api_urls.clone())
    }
    .with_timeout(config.rate_timeout);
    tracing::info!(endpoints = ?client.endpoints(), "Rate API mirrors");

    let service = Arc::new(CurrencyService::with_cache_config(
        client,
        RateCacheConfig {
            ttl: config.rate_cache_ttl,
        },
    ));

    // Display context loads the persisted currency once
    let display = DisplayCurrency::load(service, store, config.base_currency).await;

    // Create and run the HTTP server
    let server = HttpServer::new(display);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}
