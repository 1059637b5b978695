//! Core domain types shared across the market store, predictor, and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset category. Drives per-tick volatility and price rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Stock,
    Currency,
}

impl AssetKind {
    /// Per-tick volatility as a fraction of the current price.
    #[inline]
    pub fn volatility(self) -> f64 {
        match self {
            AssetKind::Stock => 0.02,
            AssetKind::Currency => 0.005,
        }
    }

    /// Decimal places prices are rounded to after a tick.
    #[inline]
    pub fn decimals(self) -> u32 {
        match self {
            AssetKind::Stock => 2,
            AssetKind::Currency => 4,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Stock => write!(f, "stock"),
            AssetKind::Currency => write!(f, "currency"),
        }
    }
}

/// A tradeable asset tracked by the market store.
///
/// `price` stays strictly positive: each tick floors the new price at 50%
/// of the pre-tick value. `change` and `change_percent` describe the move
/// made by the most recent tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub symbol: String,
    pub name: String,
    pub friendly_name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub child_description: String,
}

impl Asset {
    pub fn new(
        symbol: &str,
        name: &str,
        friendly_name: &str,
        kind: AssetKind,
        price: f64,
        child_description: &str,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            friendly_name: friendly_name.to_string(),
            kind,
            price,
            change: 0.0,
            change_percent: 0.0,
            child_description: child_description.to_string(),
        }
    }
}

/// The fixed asset catalog the store is seeded with at startup.
pub fn default_assets() -> Vec<Asset> {
    vec![
        Asset::new(
            "AAPL",
            "Apple Inc.",
            "Apple (the iPhone company)",
            AssetKind::Stock,
            185.25,
            "Apple makes iPhones, iPads, and Mac computers!",
        ),
        Asset::new(
            "GOOGL",
            "Alphabet Inc.",
            "Google",
            AssetKind::Stock,
            142.80,
            "Google helps you search for things on the internet!",
        ),
        Asset::new(
            "TSLA",
            "Tesla Inc.",
            "Tesla (electric cars)",
            AssetKind::Stock,
            248.50,
            "Tesla makes electric cars that don't need gas!",
        ),
        Asset::new(
            "MSFT",
            "Microsoft Corporation",
            "Microsoft (Windows & Xbox)",
            AssetKind::Stock,
            378.85,
            "Microsoft makes Windows computers and Xbox games!",
        ),
        Asset::new(
            "EUR/USD",
            "Euro to US Dollar",
            "European Money vs American Money",
            AssetKind::Currency,
            1.0875,
            "This shows how much European money is worth compared to American money!",
        ),
        Asset::new(
            "GBP/USD",
            "British Pound to US Dollar",
            "British Money vs American Money",
            AssetKind::Currency,
            1.2650,
            "This shows how much British money is worth compared to American money!",
        ),
        Asset::new(
            "JPY/USD",
            "Japanese Yen to US Dollar",
            "Japanese Money vs American Money",
            AssetKind::Currency,
            0.0067,
            "This shows how much Japanese money is worth compared to American money!",
        ),
    ]
}

/// Predicted direction of the next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// +1 for up, -1 for down. Applied to the expected-change magnitude.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Prediction time window. Parsing happens at the HTTP boundary; the
/// generator only ever sees a valid horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
}

impl Horizon {
    pub const ALL: [Horizon; 4] = [
        Horizon::OneHour,
        Horizon::FourHours,
        Horizon::OneDay,
        Horizon::OneWeek,
    ];

    /// Scales the expected-change magnitude: longer horizons allow larger
    /// predicted moves.
    #[inline]
    pub fn multiplier(self) -> f64 {
        match self {
            Horizon::OneHour => 0.5,
            Horizon::FourHours => 1.0,
            Horizon::OneDay => 2.0,
            Horizon::OneWeek => 4.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Horizon::OneHour => "1h",
            Horizon::FourHours => "4h",
            Horizon::OneDay => "1d",
            Horizon::OneWeek => "1w",
        }
    }
}

impl FromStr for Horizon {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1h" => Ok(Horizon::OneHour),
            "4h" => Ok(Horizon::FourHours),
            "1d" => Ok(Horizon::OneDay),
            "1w" => Ok(Horizon::OneWeek),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated prediction. Derived fresh on every request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub direction: Direction,
    pub confidence: u8,
    pub target_price: f64,
    pub expected_change: f64,
    pub child_explanation: String,
    pub generated_at: DateTime<Utc>,
    pub timeframe: Horizon,
}

/// One point of a synthetic daily price series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: String,
    pub price: f64,
}

/// Round to `decimals` decimal places.
#[inline]
pub fn round_dp(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_assets_catalog() {
        let assets = default_assets();
        assert_eq!(assets.len(), 7);

        let stocks = assets
            .iter()
            .filter(|a| a.kind == AssetKind::Stock)
            .count();
        let currencies = assets
            .iter()
            .filter(|a| a.kind == AssetKind::Currency)
            .count();
        assert_eq!(stocks, 4);
        assert_eq!(currencies, 3);

        for asset in &assets {
            assert!(asset.price > 0.0);
            assert_eq!(asset.change, 0.0);
            assert_eq!(asset.change_percent, 0.0);
        }
    }

    #[test]
    fn test_horizon_parsing() {
        assert_eq!("1h".parse::<Horizon>(), Ok(Horizon::OneHour));
        assert_eq!("4h".parse::<Horizon>(), Ok(Horizon::FourHours));
        assert_eq!("1d".parse::<Horizon>(), Ok(Horizon::OneDay));
        assert_eq!("1w".parse::<Horizon>(), Ok(Horizon::OneWeek));
        assert!("2d".parse::<Horizon>().is_err());
        assert!("1H".parse::<Horizon>().is_err());
        assert!("".parse::<Horizon>().is_err());
    }

    #[test]
    fn test_horizon_multipliers() {
        assert!((Horizon::OneHour.multiplier() - 0.5).abs() < f64::EPSILON);
        assert!((Horizon::FourHours.multiplier() - 1.0).abs() < f64::EPSILON);
        assert!((Horizon::OneDay.multiplier() - 2.0).abs() < f64::EPSILON);
        assert!((Horizon::OneWeek.multiplier() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_asset_serializes_with_wire_keys() {
        let asset = default_assets().remove(0);
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["type"], "stock");
        assert!(json.get("friendlyName").is_some());
        assert!(json.get("changePercent").is_some());
        assert!(json.get("childDescription").is_some());
    }

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(1.23456, 2), 1.23);
        assert_eq!(round_dp(1.236, 2), 1.24);
        assert_eq!(round_dp(0.00674999, 4), 0.0067);
    }
}
