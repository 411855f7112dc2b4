//! Trading endpoints for order management
//!
//! These endpoints require authentication.

use crate::client::QtradeClient;
use crate::error::RestResult;
use crate::request::ApiRequest;
use crate::types::{select_market, OrderOutcome, OrderRequest, OrdersFilter};
use qtrade_types::PlacedOrderData;
use serde_json::json;
use tracing::{debug, info, instrument};

/// Order placement and cancellation
pub struct TradingEndpoints<'a> {
    client: &'a QtradeClient,
}

impl<'a> TradingEndpoints<'a> {
    pub fn new(client: &'a QtradeClient) -> Self {
        Self { client }
    }

    /// Place a limit order
    ///
    /// Arguments are validated before anything is sent. With
    /// `prevent_taker` set, an order priced through the opposing quote is
    /// not sent and [`OrderOutcome::NotPlaced`] is returned.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use qtrade_rest::{OrderRequest, QtradeClient, RestResult};
    /// # use rust_decimal::Decimal;
    /// # async fn place(client: &QtradeClient) -> RestResult<()> {
    /// let order = OrderRequest::buy(Decimal::new(5, 3))
    ///     .with_market_string("LTC_BTC")
    ///     .with_value(Decimal::new(1, 2))
    ///     .prevent_taker();
    ///
    /// let outcome = client.trading().order(&order).await?;
    /// println!("placed: {}", outcome.is_placed());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, order), fields(order_type = %order.order_type, price = %order.price))]
    pub async fn order(&self, order: &OrderRequest) -> RestResult<OrderOutcome> {
        let order = order.validate()?;
        let market = self.client.market().market(order.market.clone()).await?;

        if order.prevent_taker {
            let ticker = self.client.market().ticker(market.id).await?;
            if order.crosses(ticker.ask, ticker.bid) {
                info!(
                    market = %market.string_key,
                    ask = ?ticker.ask,
                    bid = ?ticker.bid,
                    "Order would execute as taker, not placing"
                );
                return Ok(OrderOutcome::NotPlaced);
            }
        }

        let amount = order.amount(market.max_fee())?;
        debug!(
            "Placing {} {} {} @ {}",
            order.order_type, amount, market.string_key, order.price
        );

        let body = json!({
            "amount": amount.to_string(),
            "price": order.price.to_string(),
            "market_id": market.id,
        });
        let path = format!("/v1/user/{}", order.order_type);
        let data: PlacedOrderData = self.client.post(&path, body).await?;

        Ok(OrderOutcome::Placed(data.order))
    }

    /// Cancel one order
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: u64) -> RestResult<()> {
        self.client
            .request(ApiRequest::post("/v1/user/cancel_order").with_body(json!({ "id": id })))
            .await?;
        Ok(())
    }

    /// Cancel every open order
    ///
    /// Stops at the first failed cancellation. Returns the cancelled ids.
    #[instrument(skip(self))]
    pub async fn cancel_all_orders(&self) -> RestResult<Vec<u64>> {
        self.cancel_where(None).await
    }

    /// Cancel every open order in one market
    ///
    /// Exactly one of `market_id`/`market_string` must be given. Stops at the
    /// first failed cancellation. Returns the cancelled ids.
    #[instrument(skip(self))]
    pub async fn cancel_market_orders(
        &self,
        market_id: Option<u64>,
        market_string: Option<&str>,
    ) -> RestResult<Vec<u64>> {
        let key = select_market(market_id, market_string)?;
        let market = self.client.market().market(key).await?;
        self.cancel_where(Some(market.id)).await
    }

    async fn cancel_where(&self, market_id: Option<u64>) -> RestResult<Vec<u64>> {
        let orders = self.client.account().orders(&OrdersFilter::open()).await?;

        let mut cancelled = Vec::new();
        for order in orders
            .into_iter()
            .filter(|o| market_id.map_or(true, |id| o.market_id == id))
        {
            self.cancel_order(order.id).await?;
            cancelled.push(order.id);
        }

        info!(count = cancelled.len(), "Cancelled orders");
        Ok(cancelled)
    }
}
