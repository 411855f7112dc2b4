//! Currency and market reference data

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::market_key::MarketKey;

/// A currency listed on the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    /// Ticker code, e.g. "BTC"
    pub code: String,
    /// Human readable name, e.g. "Bitcoin"
    pub long_name: String,
    /// Number of fractional digits the currency supports
    pub precision: u32,
    /// Whether withdrawals are enabled
    pub can_withdraw: bool,
    /// Listing status ("ok", "delisted", ...)
    pub status: String,
    /// Currency family ("bitcoin_like", "grin", ...)
    #[serde(rename = "type", default)]
    pub currency_type: Option<String>,
    /// Chain specific configuration
    #[serde(default)]
    pub config: serde_json::Value,
    /// Notices and other listing metadata
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// A market as returned by `/v1/common`, with currencies given by code
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMarket {
    pub id: u64,
    pub base_currency: String,
    pub market_currency: String,
    pub maker_fee: Decimal,
    pub taker_fee: Decimal,
    pub can_trade: bool,
    pub can_cancel: bool,
    pub can_view: bool,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// A market with its currency references resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Market {
    /// Numeric market id
    pub id: u64,
    /// `MARKET_BASE` name, e.g. "LTC_BTC"
    pub string_key: String,
    /// Currency prices are quoted in
    pub base_currency: Currency,
    /// Currency being traded
    pub market_currency: Currency,
    /// Fee rate for orders that add liquidity
    pub maker_fee: Decimal,
    /// Fee rate for orders that take liquidity
    pub taker_fee: Decimal,
    pub can_trade: bool,
    pub can_cancel: bool,
    pub can_view: bool,
    pub metadata: serde_json::Value,
}

impl Market {
    /// Resolve the currency codes of a raw market against a currency table
    pub fn resolve(
        raw: RawMarket,
        currencies: &HashMap<String, Currency>,
    ) -> Result<Self, ResolveError> {
        let lookup = |code: &str| {
            currencies
                .get(code)
                .cloned()
                .ok_or_else(|| ResolveError::UnknownCurrency {
                    market_id: raw.id,
                    code: code.to_string(),
                })
        };
        let base_currency = lookup(&raw.base_currency)?;
        let market_currency = lookup(&raw.market_currency)?;

        Ok(Self {
            id: raw.id,
            string_key: format!("{}_{}", market_currency.code, base_currency.code),
            base_currency,
            market_currency,
            maker_fee: raw.maker_fee,
            taker_fee: raw.taker_fee,
            can_trade: raw.can_trade,
            can_cancel: raw.can_cancel,
            can_view: raw.can_view,
            metadata: raw.metadata,
        })
    }

    /// Both keys this market is indexed under
    pub fn keys(&self) -> [MarketKey; 2] {
        [MarketKey::Id(self.id), MarketKey::Name(self.string_key.clone())]
    }

    /// The higher of the maker and taker fee rates
    pub fn max_fee(&self) -> Decimal {
        self.maker_fee.max(self.taker_fee)
    }
}

/// Payload of `/v1/common`
#[derive(Debug, Clone, Deserialize)]
pub struct CommonData {
    pub currencies: Vec<Currency>,
    pub markets: Vec<RawMarket>,
}

/// Failure to resolve a raw market
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("market {market_id} references unknown currency {code}")]
    UnknownCurrency { market_id: u64, code: String },
}
