//! HTTP route handlers for the mock market API.
//!
//! Handlers translate store lookups and predictor calls into JSON, and
//! translate the three failure kinds into HTTP statuses at this boundary:
//! bad timeframe -> 400, unknown symbol -> 404, anything else -> 500 with a
//! generic body.

use crate::api::state::AppState;
use crate::market;
use crate::types::{Asset, AssetKind, ChartPoint, Horizon, Prediction};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// API failure kinds. Exactly three, each mapped to one status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid timeframe")]
    InvalidTimeframe,

    #[error("Asset not found")]
    AssetNotFound,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidTimeframe => StatusCode::BAD_REQUEST,
            ApiError::AssetNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(err) => {
                error!("internal error: {err:#}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ============================================================================
// RESPONSE TYPES
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataResponse {
    pub stocks: Vec<Asset>,
    pub currencies: Vec<Asset>,
    pub last_updated: DateTime<Utc>,
}

/// Prediction for one symbol, with the asset's friendly name echoed back.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolPrediction {
    #[serde(flatten)]
    pub prediction: Prediction,
    pub friendly_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetailResponse {
    pub asset: Asset,
    pub chart_data: Vec<ChartPoint>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Current snapshot of all assets, split by kind.
pub async fn market_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let assets = state.store.snapshot().await;
    let (stocks, currencies): (Vec<_>, Vec<_>) = assets
        .into_iter()
        .partition(|a| a.kind == AssetKind::Stock);

    Json(MarketDataResponse {
        stocks,
        currencies,
        last_updated: Utc::now(),
    })
}

/// Fresh predictions for every asset over one horizon.
pub async fn predictions_for_timeframe(
    State(state): State<Arc<AppState>>,
    Path(timeframe): Path<String>,
) -> Result<Json<BTreeMap<String, SymbolPrediction>>, ApiError> {
    let horizon: Horizon = timeframe.parse().map_err(|_| ApiError::InvalidTimeframe)?;
    let assets = state.store.snapshot().await;

    let predictions = assets
        .iter()
        .map(|asset| {
            (
                asset.symbol.clone(),
                SymbolPrediction {
                    prediction: state.predictor.predict(asset, horizon),
                    friendly_name: asset.friendly_name.clone(),
                },
            )
        })
        .collect();

    Ok(Json(predictions))
}

/// One asset plus a synthetic daily chart series.
pub async fn asset_detail(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<AssetDetailResponse>, ApiError> {
    let asset = state.store.get(&symbol).await.ok_or(ApiError::AssetNotFound)?;
    let chart_data = market::chart_series(asset.price);

    Ok(Json(AssetDetailResponse { asset, chart_data }))
}

/// Predictions for one asset over all four horizons. All-or-nothing: an
/// unknown symbol fails the whole request.
pub async fn asset_predictions(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<BTreeMap<&'static str, Prediction>>, ApiError> {
    let asset = state.store.get(&symbol).await.ok_or(ApiError::AssetNotFound)?;

    let predictions = Horizon::ALL
        .iter()
        .map(|&horizon| (horizon.as_str(), state.predictor.predict(&asset, horizon)))
        .collect();

    Ok(Json(predictions))
}

/// Health check. Always `{"status":"OK"}` regardless of prior calls.
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
    })
}
