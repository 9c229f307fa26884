use crate::errors::{SimError, SimResult};
use crate::feeds::{normalize_ticker, Quote};
use crate::payoff::summary::summarize_legs;
use crate::payoff::{OptionLegInput, PayoffResult};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use std::sync::Arc;

#[derive(Debug, serde::Deserialize)]
pub struct StockDataQuery {
    pub ticker: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct SimulateRequest {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<OptionLegInput>>,
    /// Echoed back as sent (any JSON number); it does not enter the payoff arithmetic.
    #[serde(default)]
    pub expiration_days: Option<serde_json::Number>,
}

#[derive(Debug, serde::Serialize)]
pub struct SimulateResponse {
    pub ticker: String,
    pub current_price: f64,
    pub expiration_days: serde_json::Number,
    pub results: Vec<PayoffResult>,
}

/// GET /api/stock-data -- latest quote for one ticker
pub async fn get_stock_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StockDataQuery>,
) -> SimResult<Json<Quote>> {
    let ticker = normalize_ticker(params.ticker.as_deref().unwrap_or(&state.config.default_ticker))?;
    tracing::info!(ticker = %ticker, "fetching stock data");

    let quote = state
        .provider
        .fetch_quote(&ticker)
        .await
        .map_err(|e| log_failure(&ticker, e))?;

    tracing::info!(ticker = %ticker, price = quote.current_price, "stock data fetched");
    Ok(Json(quote))
}

/// POST /api/simulate -- expiration summary for each submitted put leg
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> SimResult<Json<SimulateResponse>> {
    let Json(req) = payload.map_err(|e| {
        tracing::warn!(error = %e, "rejected simulate body");
        SimError::Validation("Invalid JSON body".into())
    })?;

    let ticker = normalize_ticker(req.ticker.as_deref().unwrap_or(&state.config.default_ticker))?;
    let expiration_days = req
        .expiration_days
        .unwrap_or_else(|| state.config.default_expiration_days.into());
    let options = req.options.unwrap_or_default();

    tracing::info!(ticker = %ticker, legs = options.len(), "simulating options");

    if options.is_empty() {
        tracing::warn!(ticker = %ticker, "no options provided");
        return Err(SimError::Validation("No options provided".into()));
    }

    let current_price = state
        .provider
        .latest_price(&ticker)
        .await
        .map_err(|e| log_failure(&ticker, e))?;

    tracing::info!(ticker = %ticker, price = current_price, "current price resolved");

    let results = summarize_legs(current_price, &options);
    if results.len() < options.len() {
        tracing::debug!(
            ticker = %ticker,
            skipped = options.len() - results.len(),
            "skipped incomplete legs"
        );
    }

    Ok(Json(SimulateResponse {
        ticker,
        current_price,
        expiration_days,
        results,
    }))
}

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "provider": state.provider.id(),
    }))
}

fn log_failure(ticker: &str, e: SimError) -> SimError {
    match &e {
        SimError::NotFound(_) => tracing::warn!(ticker = %ticker, "no data for ticker"),
        _ => tracing::error!(ticker = %ticker, error = %e, transient = e.is_transient(), "price fetch failed"),
    }
    e
}
