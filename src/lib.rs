//! Mock trading dashboard backend.
//!
//! Serves randomly generated market prices and placeholder "AI" predictions
//! over HTTP/JSON for a separately-served dashboard front end.

pub mod api;
pub mod market;
pub mod predictor;
pub mod types;
