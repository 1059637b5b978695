//! Mock "AI" prediction generation.
//!
//! There is no model behind this: predictions are uniform random draws
//! dressed up with thresholds and canned explanation text. The generation
//! policy sits behind the [`PredictionSource`] trait so a real model could
//! be substituted later without touching the HTTP contract.

use crate::types::{round_dp, Asset, Direction, Horizon, Prediction};
use chrono::Utc;
use rand::Rng;

/// Inclusive confidence range reported with every prediction.
const CONFIDENCE_MIN: u8 = 60;
const CONFIDENCE_MAX: u8 = 100;

/// Maximum unscaled expected-change magnitude, in percent.
const MAX_BASE_CHANGE_PCT: f64 = 5.0;

/// Explanation pools, keyed by direction.
const UP_EXPLANATIONS: [&str; 4] = [
    "The computer thinks more people will want to buy this!",
    "Good news might make the price go higher!",
    "The trend looks like it's going up!",
    "Smart money seems to be buying this!",
];

const DOWN_EXPLANATIONS: [&str; 4] = [
    "The computer thinks people might sell this.",
    "Some news might make the price go lower.",
    "The trend looks like it might go down.",
    "Smart money seems to be selling this.",
];

/// Source of predictions for an asset over a horizon.
///
/// Stateless per call; two calls with identical inputs may return different
/// outputs.
pub trait PredictionSource: Send + Sync {
    fn predict(&self, asset: &Asset, horizon: Horizon) -> Prediction;
}

/// The placeholder implementation: pure random draws.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPredictor;

impl RandomPredictor {
    pub fn new() -> Self {
        Self
    }
}

impl PredictionSource for RandomPredictor {
    fn predict(&self, asset: &Asset, horizon: Horizon) -> Prediction {
        predict_with_rng(asset, horizon, &mut rand::thread_rng())
    }
}

/// Prediction draw against an explicit RNG, for seeded tests.
pub fn predict_with_rng(asset: &Asset, horizon: Horizon, rng: &mut impl Rng) -> Prediction {
    let confidence = rng.gen_range(CONFIDENCE_MIN..=CONFIDENCE_MAX);
    let direction = if rng.gen_bool(0.5) {
        Direction::Up
    } else {
        Direction::Down
    };

    let magnitude = rng.gen_range(0.0..MAX_BASE_CHANGE_PCT) * horizon.multiplier();
    let expected_change = round_dp(magnitude * direction.sign(), 2);
    let target_price = round_dp(asset.price * (1.0 + expected_change / 100.0), 2);

    let pool = match direction {
        Direction::Up => &UP_EXPLANATIONS,
        Direction::Down => &DOWN_EXPLANATIONS,
    };
    let child_explanation = pool[rng.gen_range(0..pool.len())].to_string();

    Prediction {
        direction,
        confidence,
        target_price,
        expected_change,
        child_explanation,
        generated_at: Utc::now(),
        timeframe: horizon,
    }
}
