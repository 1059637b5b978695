//! Axum server setup and configuration.
//!
//! Assembles the router with CORS and request tracing, binds the listener,
//! and runs until a shutdown signal arrives.

use crate::api::handlers::{
    asset_detail, asset_predictions, health_check, market_data, predictions_for_timeframe,
};
use crate::api::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port to listen on
    pub port: u16,
    /// Host to bind to
    pub host: String,
    /// Enable permissive CORS for the separately-served front end
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            host: "0.0.0.0".to_string(),
            enable_cors: true,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            enable_cors: std::env::var("ENABLE_CORS")
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(true),
        }
    }
}

/// The API server.
pub struct ApiServer {
    state: Arc<AppState>,
    config: ApiConfig,
}

impl ApiServer {
    /// Create a server with default configuration.
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            config: ApiConfig::default(),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(state: Arc<AppState>, config: ApiConfig) -> Self {
        Self { state, config }
    }

    /// Build the router with all routes.
    fn build_router(&self) -> Router {
        let cors = if self.config.enable_cors {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        } else {
            CorsLayer::new()
        };

        Router::new()
            .route("/api/market-data", get(market_data))
            .route("/api/predictions/:timeframe", get(predictions_for_timeframe))
            .route("/api/assets/:symbol", get(asset_detail))
            .route("/api/assets/:symbol/predictions", get(asset_predictions))
            .route("/api/health", get(health_check))
            .with_state(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until shutdown.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("API ready at http://{}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server shut down");
        Ok(())
    }
}

/// Shutdown signal handler for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_router() -> Router {
        ApiServer::new(AppState::new()).build_router()
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.enable_cors);
    }

    #[tokio::test]
    async fn test_health_is_idempotent() {
        let router = test_router();
        for _ in 0..3 {
            let (status, json) = get_json(router.clone(), "/api/health").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["status"], "OK");
            assert!(json.get("timestamp").is_some());
        }
    }

    #[tokio::test]
    async fn test_market_data_shape() {
        let (status, json) = get_json(test_router(), "/api/market-data").await;
        assert_eq!(status, StatusCode::OK);

        let stocks = json["stocks"].as_array().unwrap();
        let currencies = json["currencies"].as_array().unwrap();
        assert_eq!(stocks.len(), 4);
        assert_eq!(currencies.len(), 3);
        assert!(json.get("lastUpdated").is_some());

        for asset in stocks {
            assert_eq!(asset["type"], "stock");
            assert!(asset["price"].as_f64().unwrap() > 0.0);
        }
        for asset in currencies {
            assert_eq!(asset["type"], "currency");
        }
    }

    #[tokio::test]
    async fn test_predictions_cover_all_symbols() {
        let (status, json) = get_json(test_router(), "/api/predictions/1d").await;
        assert_eq!(status, StatusCode::OK);

        let map = json.as_object().unwrap();
        let mut keys: Vec<_> = map.keys().cloned().collect();
        keys.sort();
        let mut expected: Vec<String> = crate::types::default_assets()
            .iter()
            .map(|a| a.symbol.clone())
            .collect();
        expected.sort();
        assert_eq!(keys, expected);

        for prediction in map.values() {
            let confidence = prediction["confidence"].as_u64().unwrap();
            assert!((60..=100).contains(&confidence));

            let direction = prediction["direction"].as_str().unwrap();
            let change = prediction["expectedChange"].as_f64().unwrap();
            match direction {
                "up" => assert!(change >= 0.0),
                "down" => assert!(change <= 0.0),
                other => panic!("unexpected direction {other}"),
            }
            assert!(prediction.get("friendlyName").is_some());
            assert_eq!(prediction["timeframe"], "1d");
        }
    }

    #[tokio::test]
    async fn test_invalid_timeframe_is_400() {
        let (status, json) = get_json(test_router(), "/api/predictions/2d").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid timeframe");
    }

    #[tokio::test]
    async fn test_asset_detail_with_chart() {
        let (status, json) = get_json(test_router(), "/api/assets/AAPL").await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(json["asset"]["symbol"], "AAPL");
        let chart = json["chartData"].as_array().unwrap();
        assert_eq!(chart.len(), 31);
        for point in chart {
            assert!(point["price"].as_f64().unwrap() > 0.0);
            assert!(point.get("time").is_some());
        }
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_404() {
        let (status, json) = get_json(test_router(), "/api/assets/DOESNOTEXIST").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Asset not found");

        let (status, json) =
            get_json(test_router(), "/api/assets/DOESNOTEXIST/predictions").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Asset not found");
    }

    #[tokio::test]
    async fn test_asset_predictions_keyed_by_horizon() {
        let (status, json) = get_json(test_router(), "/api/assets/TSLA/predictions").await;
        assert_eq!(status, StatusCode::OK);

        let map = json.as_object().unwrap();
        let mut keys: Vec<_> = map.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["1d", "1h", "1w", "4h"]);

        for (label, prediction) in map {
            assert_eq!(&prediction["timeframe"], label);
            assert!(prediction.get("targetPrice").is_some());
        }
    }

    #[tokio::test]
    async fn test_url_encoded_currency_symbol() {
        let (status, json) = get_json(test_router(), "/api/assets/EUR%2FUSD").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["asset"]["symbol"], "EUR/USD");
    }
}
