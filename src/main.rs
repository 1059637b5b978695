//! Mock Trading Dashboard Backend
//!
//! A demo HTTP/JSON service backing a trading dashboard front end. Market
//! prices random-walk on a fixed timer and "AI" predictions are random
//! draws behind a swappable [`trading_dashboard::predictor::PredictionSource`].
//!
//! ## Architecture
//!
//! - **Market store**: owned asset table, mutated only by the ticker task
//! - **Random predictor**: stateless placeholder behind a named trait
//! - **API server**: Axum routes with CORS and request tracing

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use trading_dashboard::api::{ApiConfig, ApiServer, AppState};
use trading_dashboard::market::{run_market_ticker, MarketConfig, MarketStore};
use trading_dashboard::predictor::RandomPredictor;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trading_dashboard=info".parse().unwrap()),
        )
        .init();

    let market_config = MarketConfig::from_env();
    let api_config = ApiConfig::from_env();

    let store = Arc::new(MarketStore::new());
    info!(
        "Market store seeded with {} assets, ticking every {:?}",
        store.snapshot().await.len(),
        market_config.tick_interval
    );

    let ticker_handle = tokio::spawn(run_market_ticker(
        store.clone(),
        market_config.tick_interval,
    ));

    let state = AppState::with_components(store, Arc::new(RandomPredictor::new()));
    let server = ApiServer::with_config(state, api_config);

    tokio::select! {
        result = server.run() => {
            result?;
        }
        _ = ticker_handle => {
            error!("Market ticker exited unexpectedly");
        }
    }

    Ok(())
}
