//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use wallet_types::{ExchangeRateSource, PreferenceStore};

use super::handlers::{self, AppState};
use crate::DisplayCurrency;
use crate::openapi::ApiDoc;

/// HTTP Server for the wallet currency API.
pub struct HttpServer<S: PreferenceStore, P: ExchangeRateSource> {
    state: Arc<AppState<S, P>>,
}

impl<S: PreferenceStore, P: ExchangeRateSource> HttpServer<S, P> {
    /// Creates a new HTTP server around a loaded display context.
    pub fn new(display: DisplayCurrency<S, P>) -> Self {
        Self {
            state: Arc::new(AppState { display }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/currencies", get(handlers::list_currencies))
            .route("/api/rates/{base}", get(handlers::get_rate_table::<S, P>))
            .route("/api/rates/{from}/{to}", get(handlers::get_rate::<S, P>))
            .route(
                "/api/cache",
                get(handlers::cache_stats::<S, P>).delete(handlers::clear_cache::<S, P>),
            )
            .route("/api/convert", post(handlers::convert::<S, P>))
            .route("/api/format", get(handlers::format_amount::<S, P>))
            .route(
                "/api/preferences/currency",
                get(handlers::get_currency::<S, P>).put(handlers::set_currency::<S, P>),
            )
            .route(
                "/api/preferences/language",
                get(handlers::get_language::<S, P>).put(handlers::set_language::<S, P>),
            )
            .route("/api/display/format", post(handlers::display_format::<S, P>))
            .route("/api/display/to-base", post(handlers::display_to_base::<S, P>))
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .layer(metrics)
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
