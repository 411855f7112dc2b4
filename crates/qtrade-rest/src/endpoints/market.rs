//! Public reference data: markets, currencies and tickers
//!
//! These endpoints don't require authentication. Results are served from the
//! client's [`MetadataCache`] and fetched again only once the cached table is
//! empty or older than its configured interval.

use crate::cache::MetadataCache;
use crate::client::QtradeClient;
use crate::error::{RestError, RestResult};
use crate::request::ApiRequest;
use qtrade_types::{CommonData, Currency, Market, MarketKey, Ticker, TickersData};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::MutexGuard;
use tracing::{debug, instrument};

/// Markets, currencies and tickers
pub struct MarketEndpoints<'a> {
    client: &'a QtradeClient,
}

impl<'a> MarketEndpoints<'a> {
    pub fn new(client: &'a QtradeClient) -> Self {
        Self { client }
    }

    /// Refetch `/v1/common` unless the market table is fresh
    #[instrument(skip(self))]
    pub async fn refresh_common(&self) -> RestResult<()> {
        self.common().await.map(drop)
    }

    /// Refetch `/v1/tickers` unless the ticker table is fresh
    #[instrument(skip(self))]
    pub async fn refresh_tickers(&self) -> RestResult<()> {
        self.ticker_table().await.map(drop)
    }

    /// All markets, each present under its id and its name
    #[instrument(skip(self))]
    pub async fn markets(&self) -> RestResult<HashMap<MarketKey, Arc<Market>>> {
        Ok(self.common().await?.markets.entries().clone())
    }

    /// Look up a market by id or name
    #[instrument(skip(self, key))]
    pub async fn market(&self, key: impl Into<MarketKey>) -> RestResult<Arc<Market>> {
        let key = key.into();
        self.common()
            .await?
            .markets
            .get(&key)
            .ok_or(RestError::MarketNotFound(key))
    }

    /// All currencies by code
    #[instrument(skip(self))]
    pub async fn currencies(&self) -> RestResult<HashMap<String, Arc<Currency>>> {
        Ok(self.common().await?.currencies.clone())
    }

    /// Look up a currency by code
    #[instrument(skip(self))]
    pub async fn currency(&self, code: &str) -> RestResult<Option<Arc<Currency>>> {
        Ok(self.common().await?.currencies.get(code).cloned())
    }

    /// All tickers, each present under its id and its name
    #[instrument(skip(self))]
    pub async fn tickers(&self) -> RestResult<HashMap<MarketKey, Arc<Ticker>>> {
        Ok(self.ticker_table().await?.tickers.entries().clone())
    }

    /// Look up a ticker by market id or name
    #[instrument(skip(self, key))]
    pub async fn ticker(&self, key: impl Into<MarketKey>) -> RestResult<Arc<Ticker>> {
        let key = key.into();
        self.ticker_table()
            .await?
            .tickers
            .get(&key)
            .ok_or(RestError::MarketNotFound(key))
    }

    // The cache lock is held across the fetch so concurrent callers wait for
    // one refresh instead of each issuing their own.
    async fn common(&self) -> RestResult<MutexGuard<'a, MetadataCache>> {
        let mut cache = self.client.cache.lock().await;
        if !cache.markets.is_fresh(self.client.clock().unix_time()) {
            debug!("Refreshing markets and currencies");
            let data: CommonData = self.client.fetch(ApiRequest::get("/v1/common")).await?;
            cache.store_common(data, self.client.clock().unix_time());
        }
        Ok(cache)
    }

    async fn ticker_table(&self) -> RestResult<MutexGuard<'a, MetadataCache>> {
        let mut cache = self.client.cache.lock().await;
        if !cache.tickers.is_fresh(self.client.clock().unix_time()) {
            debug!("Refreshing tickers");
            let data: TickersData = self.client.fetch(ApiRequest::get("/v1/tickers")).await?;
            cache.store_tickers(data, self.client.clock().unix_time());
        }
        Ok(cache)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_fixtures::client_with_markets;
    use qtrade_types::MarketKey;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_markets_fetched_once_while_fresh() {
        let (client, transport, clock) = client_with_markets();

        let ltc = client.market().market(1u64).await.unwrap();
        assert_eq!(ltc.string_key, "LTC_BTC");

        clock.advance(Duration::from_secs(60));
        let by_name = client.market().market("LTC_BTC").await.unwrap();
        assert!(Arc::ptr_eq(&ltc, &by_name));
        assert_eq!(transport.requests_to("/v1/common").len(), 1);

        clock.advance(Duration::from_secs(120));
        client.market().refresh_common().await.unwrap();
        assert_eq!(transport.requests_to("/v1/common").len(), 2);
    }

    #[tokio::test]
    async fn test_currencies_refreshed_with_markets() {
        let (client, _transport, _clock) = client_with_markets();

        let grin = client.market().currency("GRIN").await.unwrap().unwrap();
        assert_eq!(grin.precision, 9);
        assert_eq!(grin.long_name, "Grin");
        assert!(client.market().currency("DOGE").await.unwrap().is_none());
        assert_eq!(client.market().currencies().await.unwrap().len(), 4);
        assert_eq!(client.market().markets().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_unknown_market() {
        let (client, _transport, _clock) = client_with_markets();

        let err = client.market().market("DOGE_BTC").await.unwrap_err();
        assert!(matches!(err, crate::RestError::MarketNotFound(MarketKey::Name(_))));
    }

    #[tokio::test]
    async fn test_ticker_lookup() {
        let (client, transport, _clock) = client_with_markets();

        let ticker = client.market().ticker("LTC_BTC").await.unwrap();
        assert_eq!(ticker.id, 1);
        assert_eq!(ticker.ask, Some(dec!(0.00707017)));
        assert_eq!(ticker.bid, Some(dec!(0.00664751)));

        let mmo = client.market().ticker(8u64).await.unwrap();
        assert_eq!(mmo.ask, None);

        assert_eq!(client.market().tickers().await.unwrap().len(), 6);
        assert_eq!(transport.requests_to("/v1/tickers").len(), 1);
        assert!(transport.requests_to("/v1/common").is_empty());
    }
}
