//! HTTP request handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;

use wallet_types::{
    AmountBody, AppError, ConversionRequest, CurrencyCode, CurrencyError, CurrencyInfo,
    CurrencyPreference, ExchangeRateSource, FormatQuery, FormattedAmount, LanguagePreference,
    PreferenceStore, RateTableResponse, SetCurrencyRequest, StoreError,
};

use crate::DisplayCurrency;

/// Application state shared across handlers.
pub struct AppState<S: PreferenceStore, P: ExchangeRateSource> {
    pub display: DisplayCurrency<S, P>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<CurrencyError> for ApiError {
    fn from(err: CurrencyError) -> Self {
        ApiError(err.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        }

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

fn parse_currency(code: &str) -> Result<CurrencyCode, ApiError> {
    code.parse::<CurrencyCode>()
        .map_err(|e| CurrencyError::from(e).into())
}

/// Cancelled when the handler future is dropped (client went away).
fn request_token() -> (CancellationToken, tokio_util::sync::DropGuard) {
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    (token, guard)
}

fn cancelled() -> ApiError {
    ApiError(AppError::ServiceUnavailable("Request cancelled".into()))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalogue & Rates
// ─────────────────────────────────────────────────────────────────────────────

/// List supported currencies.
pub async fn list_currencies() -> impl IntoResponse {
    let currencies: Vec<CurrencyInfo> = CurrencyCode::all()
        .iter()
        .copied()
        .map(CurrencyInfo::from)
        .collect();
    Json(currencies)
}

/// Every rate quoted against one base currency.
#[tracing::instrument(skip(state))]
pub async fn get_rate_table<S: PreferenceStore, P: ExchangeRateSource>(
    State(state): State<Arc<AppState<S, P>>>,
    Path(base): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let base = parse_currency(&base)?;
    let table = state.display.service().get_rate_table(base).await?;
    let rates: BTreeMap<String, f64> = table
        .into_iter()
        .map(|(code, rate)| (code.code().to_string(), rate))
        .collect();
    Ok(Json(RateTableResponse { base, rates }))
}

/// Single pair rate, served from the cache when fresh.
#[tracing::instrument(skip(state))]
pub async fn get_rate<S: PreferenceStore, P: ExchangeRateSource>(
    State(state): State<Arc<AppState<S, P>>>,
    Path((from, to)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let from = parse_currency(&from)?;
    let to = parse_currency(&to)?;
    let rate = state.display.service().get_rate_details(from, to).await?;
    Ok(Json(rate))
}

/// Convert an amount between two currencies.
#[tracing::instrument(skip(state))]
pub async fn convert<S: PreferenceStore, P: ExchangeRateSource>(
    State(state): State<Arc<AppState<S, P>>>,
    Json(req): Json<ConversionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let conversion = state.display.service().convert_currency(req).await?;
    Ok(Json(conversion))
}

/// Format an amount in a currency.
pub async fn format_amount<S: PreferenceStore, P: ExchangeRateSource>(
    State(state): State<Arc<AppState<S, P>>>,
    Query(query): Query<FormatQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let currency = parse_currency(&query.currency)?;
    let formatted = state.display.service().format_currency(query.amount, currency);
    Ok(Json(FormattedAmount { formatted }))
}

/// Rate cache statistics.
pub async fn cache_stats<S: PreferenceStore, P: ExchangeRateSource>(
    State(state): State<Arc<AppState<S, P>>>,
) -> impl IntoResponse {
    Json(state.display.service().cache_stats())
}

/// Drop every cached rate.
pub async fn clear_cache<S: PreferenceStore, P: ExchangeRateSource>(
    State(state): State<Arc<AppState<S, P>>>,
) -> impl IntoResponse {
    state.display.service().clear_cache();
    StatusCode::NO_CONTENT
}

// ─────────────────────────────────────────────────────────────────────────────
// Preferences
// ─────────────────────────────────────────────────────────────────────────────

pub async fn get_currency<S: PreferenceStore, P: ExchangeRateSource>(
    State(state): State<Arc<AppState<S, P>>>,
) -> impl IntoResponse {
    Json(CurrencyPreference {
        currency: state.display.currency().await,
    })
}

#[tracing::instrument(skip(state))]
pub async fn set_currency<S: PreferenceStore, P: ExchangeRateSource>(
    State(state): State<Arc<AppState<S, P>>>,
    Json(req): Json<SetCurrencyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let currency = parse_currency(&req.currency)?;
    state.display.set_currency(currency).await?;
    Ok(Json(CurrencyPreference { currency }))
}

pub async fn get_language<S: PreferenceStore, P: ExchangeRateSource>(
    State(state): State<Arc<AppState<S, P>>>,
) -> impl IntoResponse {
    Json(LanguagePreference {
        language: state.display.language().await,
    })
}

#[tracing::instrument(skip(state))]
pub async fn set_language<S: PreferenceStore, P: ExchangeRateSource>(
    State(state): State<Arc<AppState<S, P>>>,
    Json(req): Json<LanguagePreference>,
) -> Result<impl IntoResponse, ApiError> {
    state.display.set_language(req.language).await?;
    Ok(Json(req))
}

// ─────────────────────────────────────────────────────────────────────────────
// Display Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Format a base-currency amount in the display currency.
#[tracing::instrument(skip(state))]
pub async fn display_format<S: PreferenceStore, P: ExchangeRateSource>(
    State(state): State<Arc<AppState<S, P>>>,
    Json(body): Json<AmountBody>,
) -> Result<impl IntoResponse, ApiError> {
    let (token, _guard) = request_token();
    let formatted = state
        .display
        .convert_and_format(body.amount, &token)
        .await
        .ok_or_else(cancelled)?;
    Ok(Json(FormattedAmount { formatted }))
}

/// Convert a display-currency amount back into the base currency.
#[tracing::instrument(skip(state))]
pub async fn display_to_base<S: PreferenceStore, P: ExchangeRateSource>(
    State(state): State<Arc<AppState<S, P>>>,
    Json(body): Json<AmountBody>,
) -> Result<impl IntoResponse, ApiError> {
    let (token, _guard) = request_token();
    let amount = state
        .display
        .convert_from_display(body.amount, &token)
        .await
        .ok_or_else(cancelled)?;
    Ok(Json(AmountBody { amount }))
}
