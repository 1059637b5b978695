//! Shared application state for the API.
//!
//! The market store and prediction source are injected here rather than
//! living in globals: the ticker task holds the store's write side, the
//! handlers only ever read or snapshot.

use crate::market::MarketStore;
use crate::predictor::{PredictionSource, RandomPredictor};
use std::sync::Arc;

/// State shared across all API handlers.
pub struct AppState {
    /// Current market state. Written by the ticker task, read by handlers.
    pub store: Arc<MarketStore>,

    /// Prediction policy. The placeholder is random; swapping in a real
    /// model does not change the HTTP contract.
    pub predictor: Arc<dyn PredictionSource>,
}

impl AppState {
    /// Create state with the default store and the random predictor.
    pub fn new() -> Arc<Self> {
        Self::with_components(Arc::new(MarketStore::new()), Arc::new(RandomPredictor::new()))
    }

    /// Create state with explicit components.
    pub fn with_components(
        store: Arc<MarketStore>,
        predictor: Arc<dyn PredictionSource>,
    ) -> Arc<Self> {
        Arc::new(Self { store, predictor })
    }
}
