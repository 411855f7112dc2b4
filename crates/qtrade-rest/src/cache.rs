//! Lazily refreshed reference data
//!
//! Markets (with their currencies) and tickers are cached in memory for a
//! fixed interval. Each table is keyed by [`MarketKey`], holding every entry
//! under both its numeric id and its string name. The two keys share one
//! `Arc`, so both lookups return the very same record.

use qtrade_types::{CommonData, Currency, Market, MarketKey, Ticker, TickersData};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// A table that is replaced wholesale on refresh
#[derive(Debug)]
pub struct CachedTable<T> {
    entries: HashMap<MarketKey, Arc<T>>,
    refreshed_at: Option<f64>,
    interval: Duration,
}

impl<T> CachedTable<T> {
    /// Create an empty table
    pub fn new(interval: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            refreshed_at: None,
            interval,
        }
    }

    /// True if the table is populated and younger than the interval
    pub fn is_fresh(&self, now: f64) -> bool {
        match self.refreshed_at {
            Some(at) => !self.entries.is_empty() && now - at < self.interval.as_secs_f64(),
            None => false,
        }
    }

    /// Swap in a new table
    pub fn replace(&mut self, entries: HashMap<MarketKey, Arc<T>>, now: f64) {
        self.entries = entries;
        self.refreshed_at = Some(now);
    }

    /// Look up an entry
    pub fn get(&self, key: &MarketKey) -> Option<Arc<T>> {
        self.entries.get(key).cloned()
    }

    /// All entries, each present under both keys
    pub fn entries(&self) -> &HashMap<MarketKey, Arc<T>> {
        &self.entries
    }

    /// Unix time of the last refresh
    pub fn refreshed_at(&self) -> Option<f64> {
        self.refreshed_at
    }
}

/// Per-session reference data
#[derive(Debug)]
pub struct MetadataCache {
    pub markets: CachedTable<Market>,
    pub currencies: HashMap<String, Arc<Currency>>,
    pub tickers: CachedTable<Ticker>,
}

impl MetadataCache {
    /// Create empty caches with the given refresh intervals
    pub fn new(market_interval: Duration, ticker_interval: Duration) -> Self {
        Self {
            markets: CachedTable::new(market_interval),
            currencies: HashMap::new(),
            tickers: CachedTable::new(ticker_interval),
        }
    }

    /// Rebuild the market and currency tables from `/v1/common`
    pub fn store_common(&mut self, data: CommonData, now: f64) {
        let (markets, currencies) = index_common(data);
        self.markets.replace(markets, now);
        self.currencies = currencies;
    }

    /// Rebuild the ticker table from `/v1/tickers`
    pub fn store_tickers(&mut self, data: TickersData, now: f64) {
        self.tickers.replace(index_tickers(data), now);
    }
}

/// Currency table by code
pub type CurrencyTable = HashMap<String, Arc<Currency>>;

/// Resolve markets against currencies and index both
///
/// Markets naming an unknown currency are dropped with a warning.
pub fn index_common(data: CommonData) -> (HashMap<MarketKey, Arc<Market>>, CurrencyTable) {
    let by_code: HashMap<String, Currency> = data
        .currencies
        .into_iter()
        .map(|c| (c.code.clone(), c))
        .collect();

    let mut markets = HashMap::with_capacity(data.markets.len() * 2);
    for raw in data.markets {
        match Market::resolve(raw, &by_code) {
            Ok(market) => insert_dual(&mut markets, market.keys(), Arc::new(market)),
            Err(e) => warn!("Skipping market: {}", e),
        }
    }

    let currencies = by_code
        .into_iter()
        .map(|(code, c)| (code, Arc::new(c)))
        .collect();

    (markets, currencies)
}

/// Index tickers by id and name
pub fn index_tickers(data: TickersData) -> HashMap<MarketKey, Arc<Ticker>> {
    let mut tickers = HashMap::with_capacity(data.markets.len() * 2);
    for ticker in data.markets {
        insert_dual(&mut tickers, ticker.keys(), Arc::new(ticker));
    }
    tickers
}

fn insert_dual<T>(table: &mut HashMap<MarketKey, Arc<T>>, keys: [MarketKey; 2], entry: Arc<T>) {
    for key in keys {
        table.insert(key, Arc::clone(&entry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{common_json, tickers_json};
    use rust_decimal_macros::dec;

    fn common() -> CommonData {
        serde_json::from_value(common_json()).unwrap()
    }

    #[test]
    fn test_markets_indexed_under_both_keys() {
        let (markets, currencies) = index_common(common());

        // 3 markets, each under two keys
        assert_eq!(markets.len(), 6);
        assert_eq!(currencies.len(), 4);

        let by_id = &markets[&MarketKey::Id(1)];
        let by_name = &markets[&MarketKey::from("LTC_BTC")];
        assert!(Arc::ptr_eq(by_id, by_name));

        assert_eq!(by_id.string_key, "LTC_BTC");
        assert_eq!(by_id.market_currency.long_name, "Litecoin");
        assert_eq!(by_id.base_currency.precision, 8);
        assert_eq!(by_id.taker_fee, dec!(0.005));

        let grin = &markets[&MarketKey::from("GRIN_BTC")];
        assert_eq!(grin.id, 23);
        assert_eq!(grin.market_currency.precision, 9);
        assert_eq!(grin.market_currency.status, "delisted");
        assert!(!grin.can_trade);
    }

    #[test]
    fn test_market_with_unknown_currency_is_skipped() {
        let mut data = common();
        data.currencies.retain(|c| c.code != "BIS");

        let (markets, _) = index_common(data);
        assert!(!markets.contains_key(&MarketKey::from("BIS_BTC")));
        assert!(!markets.contains_key(&MarketKey::Id(20)));
        assert!(markets.contains_key(&MarketKey::Id(1)));
    }

    #[test]
    fn test_tickers_indexed_under_both_keys() {
        let data: TickersData = serde_json::from_value(tickers_json()).unwrap();
        let tickers = index_tickers(data);

        assert!(Arc::ptr_eq(
            &tickers[&MarketKey::Id(1)],
            &tickers[&MarketKey::from("LTC_BTC")]
        ));
        let mmo = &tickers[&MarketKey::from("MMO_BTC")];
        assert_eq!(mmo.id, 8);
        assert_eq!(mmo.bid, None);
    }

    #[test]
    fn test_table_freshness() {
        let mut table: CachedTable<Ticker> = CachedTable::new(Duration::from_secs(180));
        assert!(!table.is_fresh(0.0));

        // An empty refresh is never fresh
        table.replace(HashMap::new(), 100.0);
        assert!(!table.is_fresh(100.0));

        let data: TickersData = serde_json::from_value(tickers_json()).unwrap();
        table.replace(index_tickers(data), 100.0);
        assert!(table.is_fresh(279.9));
        assert!(!table.is_fresh(280.0));
        assert_eq!(table.refreshed_at(), Some(100.0));
    }
}
