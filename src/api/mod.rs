//! HTTP/JSON API for the mock trading dashboard.
//!
//! Built with Axum. Handlers read market snapshots and draw predictions
//! through the injected [`crate::predictor::PredictionSource`]; errors are
//! translated to HTTP statuses at this boundary and nowhere else.

pub mod handlers;
pub mod server;
pub mod state;

pub use server::{ApiConfig, ApiServer};
pub use state::AppState;
