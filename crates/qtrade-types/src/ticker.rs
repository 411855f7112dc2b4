//! Market ticker snapshots

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market_key::MarketKey;

/// Ticker for a single market
///
/// Quotes are `None` when the book side is empty; the exchange sends `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// Numeric market id
    pub id: u64,
    /// `MARKET_BASE` name
    pub id_hr: String,
    /// Best ask
    pub ask: Option<Decimal>,
    /// Best bid
    pub bid: Option<Decimal>,
    /// Last trade price
    pub last: Option<Decimal>,
    #[serde(default)]
    pub day_avg_price: Option<Decimal>,
    #[serde(default)]
    pub day_change: Option<Decimal>,
    #[serde(default)]
    pub day_high: Option<Decimal>,
    #[serde(default)]
    pub day_low: Option<Decimal>,
    #[serde(default)]
    pub day_open: Option<Decimal>,
    #[serde(default)]
    pub day_volume_base: Option<Decimal>,
    #[serde(default)]
    pub day_volume_market: Option<Decimal>,
}

impl Ticker {
    /// Both keys this ticker is indexed under
    pub fn keys(&self) -> [MarketKey; 2] {
        [MarketKey::Id(self.id), MarketKey::Name(self.id_hr.clone())]
    }

    /// Spread between best ask and best bid
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.ask? - self.bid?)
    }
}

/// Payload of `/v1/tickers`
#[derive(Debug, Clone, Deserialize)]
pub struct TickersData {
    pub markets: Vec<Ticker>,
}
