//! Dual market key (numeric id or `MARKET_BASE` string)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key into the market and ticker tables
///
/// qTrade identifies a market either by its numeric id (`1`) or by its
/// human readable name (`"LTC_BTC"`). Both forms index the same table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarketKey {
    /// Numeric market id
    Id(u64),
    /// `MARKET_BASE` string, e.g. `"LTC_BTC"`
    Name(String),
}

impl MarketKey {
    /// Build the string key from the market and base currency codes
    pub fn from_codes(market_currency: &str, base_currency: &str) -> Self {
        Self::Name(format!("{}_{}", market_currency, base_currency))
    }

    /// Get the numeric id, if this is an id key
    pub fn as_id(&self) -> Option<u64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Name(_) => None,
        }
    }

    /// Get the string name, if this is a name key
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Name(name) => Some(name),
        }
    }
}

impl fmt::Display for MarketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<u64> for MarketKey {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for MarketKey {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

impl From<String> for MarketKey {
    fn from(s: String) -> Self {
        Self::Name(s)
    }
}
