//! In-memory market state and the background tick that advances it.
//!
//! The store owns the asset table behind a `tokio::sync::RwLock`: the ticker
//! task takes the write lock for the duration of a tick, request handlers
//! take read locks or clone a snapshot, so a reader can never observe a torn
//! (price, change, change_percent) triple.

use crate::types::{default_assets, round_dp, Asset, ChartPoint};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Default seconds between market ticks.
const DEFAULT_TICK_SECS: u64 = 30;

/// Post-tick price floor as a fraction of the pre-tick price.
const TICK_FLOOR_RATIO: f64 = 0.5;

/// Number of daily steps in a synthetic chart series (31 points total).
const CHART_DAYS: usize = 30;

/// Per-step volatility of the chart series, as a fraction of the base price.
const CHART_VOLATILITY: f64 = 0.03;

/// Chart series price floor as a fraction of the base price.
const CHART_FLOOR_RATIO: f64 = 0.7;

/// Market simulation configuration.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Period between ticks.
    pub tick_interval: Duration,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(DEFAULT_TICK_SECS),
        }
    }
}

impl MarketConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            tick_interval: std::env::var("MARKET_TICK_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(DEFAULT_TICK_SECS)),
        }
    }
}

/// Owned market state: the current asset table.
///
/// Created once at startup from the fixed seed catalog; assets are mutated
/// in place by [`MarketStore::tick`] and never added or removed.
pub struct MarketStore {
    assets: RwLock<Vec<Asset>>,
}

impl MarketStore {
    /// Create a store seeded with the default asset catalog.
    pub fn new() -> Self {
        Self::with_assets(default_assets())
    }

    /// Create a store with an explicit asset table.
    pub fn with_assets(assets: Vec<Asset>) -> Self {
        Self {
            assets: RwLock::new(assets),
        }
    }

    /// Advance every asset by one random-walk step.
    ///
    /// For each asset a uniform delta in `[-v, +v)` is drawn, where
    /// `v = price * volatility` (2% for stocks, 0.5% for currencies). The
    /// new price is floored at 50% of the pre-tick price and rounded to the
    /// kind's decimal places.
    pub async fn tick(&self) {
        let mut assets = self.assets.write().await;
        let mut rng = rand::thread_rng();
        for asset in assets.iter_mut() {
            step_asset(asset, &mut rng);
        }
    }

    /// Look up an asset by symbol. Returns `None` for unknown symbols.
    pub async fn get(&self, symbol: &str) -> Option<Asset> {
        let assets = self.assets.read().await;
        assets.iter().find(|a| a.symbol == symbol).cloned()
    }

    /// Owned copy of the full asset table. Callers never alias live state.
    pub async fn snapshot(&self) -> Vec<Asset> {
        self.assets.read().await.clone()
    }
}

impl Default for MarketStore {
    fn default() -> Self {
        Self::new()
    }
}

/// One random-walk step for a single asset.
fn step_asset(asset: &mut Asset, rng: &mut impl Rng) {
    let bound = asset.price * asset.kind.volatility();
    let delta = rng.gen_range(-bound..bound);
    let new_price = (asset.price + delta).max(asset.price * TICK_FLOOR_RATIO);

    // change fields are derived from the unrounded price
    asset.change = new_price - asset.price;
    asset.change_percent = asset.change / asset.price * 100.0;
    asset.price = round_dp(new_price, asset.kind.decimals());
}

/// Generate a 31-point synthetic daily price series for an asset.
///
/// Random walk from the asset's current price with a floor at 70% of the
/// base, one point per calendar day ending today.
pub fn chart_series(base_price: f64) -> Vec<ChartPoint> {
    chart_series_with_rng(base_price, &mut rand::thread_rng())
}

pub fn chart_series_with_rng(base_price: f64, rng: &mut impl Rng) -> Vec<ChartPoint> {
    let today = chrono::Utc::now().date_naive();
    let mut price = base_price;
    let mut points = Vec::with_capacity(CHART_DAYS + 1);

    for offset in (0..=CHART_DAYS as u64).rev() {
        let date = today - chrono::Days::new(offset);
        let delta = rng.gen_range(-0.5..0.5) * base_price * CHART_VOLATILITY;
        price = (price + delta).max(base_price * CHART_FLOOR_RATIO);
        points.push(ChartPoint {
            time: date.format("%Y-%m-%d").to_string(),
            price: round_dp(price, 2),
        });
    }

    points
}

/// Background task that ticks the store at a fixed period for the lifetime
/// of the process.
pub async fn run_market_ticker(store: Arc<MarketStore>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    // the first interval tick fires immediately; consume it so the seed
    // prices survive a full period
    interval.tick().await;

    loop {
        interval.tick().await;
        store.tick().await;
        debug!("market tick applied");
    }
}
