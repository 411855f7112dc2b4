//! Request and response types for the trading operations

use crate::error::{RestError, RestResult};
use qtrade_types::{quantize_coin, MarketKey, Order, OrderType};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Pick exactly one market selector
///
/// Fails with [`RestError::InvalidArgument`] when both or neither are given.
pub fn select_market(market_id: Option<u64>, market_string: Option<&str>) -> RestResult<MarketKey> {
    match (market_id, market_string) {
        (Some(id), None) => Ok(MarketKey::Id(id)),
        (None, Some(name)) => Ok(MarketKey::Name(name.to_string())),
        (Some(_), Some(_)) => Err(RestError::InvalidArgument(
            "give either market_id or market_string, not both".to_string(),
        )),
        (None, None) => Err(RestError::InvalidArgument(
            "one of market_id or market_string is required".to_string(),
        )),
    }
}

/// How much to trade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSize {
    /// Notional in the base currency, converted to an amount before submission
    Value(Decimal),
    /// Quantity of the market currency, sent as given
    Amount(Decimal),
}

/// Limit order to place
///
/// Exactly one market selector and exactly one of `value`/`amount` must be
/// set; [`validate`](Self::validate) enforces this before anything is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Buy or sell
    pub order_type: OrderType,
    /// Limit price, quantized to 8 decimals on submission
    pub price: Decimal,
    /// Numeric market id
    pub market_id: Option<u64>,
    /// `MARKET_BASE` market name
    pub market_string: Option<String>,
    /// Notional in the base currency
    pub value: Option<Decimal>,
    /// Quantity of the market currency
    pub amount: Option<Decimal>,
    /// Refuse to cross the spread
    pub prevent_taker: bool,
}

impl OrderRequest {
    /// Create an order with no market or size yet
    pub fn new(order_type: OrderType, price: Decimal) -> Self {
        Self {
            order_type,
            price,
            market_id: None,
            market_string: None,
            value: None,
            amount: None,
            prevent_taker: false,
        }
    }

    /// Create a buy limit order
    pub fn buy(price: Decimal) -> Self {
        Self::new(OrderType::BuyLimit, price)
    }

    /// Create a sell limit order
    pub fn sell(price: Decimal) -> Self {
        Self::new(OrderType::SellLimit, price)
    }

    /// Select the market by id
    pub fn with_market_id(mut self, market_id: u64) -> Self {
        self.market_id = Some(market_id);
        self
    }

    /// Select the market by name
    pub fn with_market_string(mut self, market_string: impl Into<String>) -> Self {
        self.market_string = Some(market_string.into());
        self
    }

    /// Size the order by notional value
    pub fn with_value(mut self, value: Decimal) -> Self {
        self.value = Some(value);
        self
    }

    /// Size the order by amount
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Only place the order if it would rest on the book
    pub fn prevent_taker(mut self) -> Self {
        self.prevent_taker = true;
        self
    }

    /// Check argument consistency without touching the network
    pub fn validate(&self) -> RestResult<ValidatedOrder> {
        let market = select_market(self.market_id, self.market_string.as_deref())?;

        let size = match (self.value, self.amount) {
            (Some(value), None) => OrderSize::Value(value),
            (None, Some(amount)) => OrderSize::Amount(amount),
            (Some(_), Some(_)) => {
                return Err(RestError::InvalidArgument(
                    "give either value or amount, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(RestError::InvalidArgument(
                    "one of value or amount is required".to_string(),
                ))
            }
        };

        let price = quantize_coin(self.price);
        if price <= Decimal::ZERO {
            return Err(RestError::InvalidArgument(format!(
                "price {} is not positive at 8 decimals",
                self.price
            )));
        }

        Ok(ValidatedOrder {
            order_type: self.order_type,
            price,
            market,
            size,
            prevent_taker: self.prevent_taker,
        })
    }
}

/// An order whose arguments passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
    pub order_type: OrderType,
    /// Quantized price
    pub price: Decimal,
    pub market: MarketKey,
    pub size: OrderSize,
    pub prevent_taker: bool,
}

impl ValidatedOrder {
    /// Amount to submit
    ///
    /// A buy by value reserves room for the larger of the market's fees.
    /// Sizes that do not fit in a `Decimal` are rejected.
    pub fn amount(&self, max_fee: Decimal) -> RestResult<Decimal> {
        let value = match self.size {
            OrderSize::Amount(amount) => return Ok(amount),
            OrderSize::Value(value) => value,
        };

        let unit_cost = if self.order_type.is_buy() {
            Decimal::ONE
                .checked_add(max_fee)
                .and_then(|rate| self.price.checked_mul(rate))
        } else {
            Some(self.price)
        };

        unit_cost
            .and_then(|cost| value.checked_div(cost))
            .map(quantize_coin)
            .ok_or_else(|| {
                RestError::InvalidArgument(format!(
                    "order value {} at price {} is out of range",
                    value, self.price
                ))
            })
    }

    /// True if the order would execute against the opposing quote
    ///
    /// A missing quote never counts as crossing.
    pub fn crosses(&self, ask: Option<Decimal>, bid: Option<Decimal>) -> bool {
        if self.order_type.is_buy() {
            ask.is_some_and(|ask| self.price > ask)
        } else {
            bid.is_some_and(|bid| self.price < bid)
        }
    }
}

/// Result of [`order`](crate::endpoints::TradingEndpoints::order)
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    /// The exchange accepted the order
    Placed(Order),
    /// The taker guard held the order back; nothing was sent
    NotPlaced,
}

impl OrderOutcome {
    /// The placed order, if any
    pub fn order(&self) -> Option<&Order> {
        match self {
            Self::Placed(order) => Some(order),
            Self::NotPlaced => None,
        }
    }

    /// Check if the order was submitted
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed(_))
    }
}

/// Filters for `/v1/user/orders`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrdersFilter {
    /// Only open (`true`) or only closed (`false`) orders
    pub open: Option<bool>,
    /// Only orders with an id below this
    pub older_than: Option<u64>,
    /// Only orders with an id above this
    pub newer_than: Option<u64>,
}

impl OrdersFilter {
    /// Open orders only
    pub fn open() -> Self {
        Self {
            open: Some(true),
            ..Self::default()
        }
    }

    /// Closed orders only
    pub fn closed() -> Self {
        Self {
            open: Some(false),
            ..Self::default()
        }
    }

    /// Orders older than the given id
    pub fn older_than(mut self, id: u64) -> Self {
        self.older_than = Some(id);
        self
    }

    /// Orders newer than the given id
    pub fn newer_than(mut self, id: u64) -> Self {
        self.newer_than = Some(id);
        self
    }
}

/// Payload of `/v1/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub user_id: u64,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_both_market_selectors_rejected() {
        let err = OrderRequest::sell(dec!(0.001))
            .with_value(dec!(0.01))
            .with_market_id(1)
            .with_market_string("LTC_BTC")
            .validate()
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_market_selector_rejected() {
        let err = OrderRequest::sell(dec!(0.001))
            .with_value(dec!(0.01))
            .validate()
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidArgument(_)));
    }

    #[test]
    fn test_both_sizes_rejected() {
        let err = OrderRequest::sell(dec!(0.001))
            .with_value(dec!(0.01))
            .with_amount(dec!(0.01))
            .with_market_id(1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_size_rejected() {
        let err = OrderRequest::sell(dec!(0.001))
            .with_market_id(1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidArgument(_)));
    }

    #[test]
    fn test_price_rounding_to_zero_rejected() {
        let err = OrderRequest::buy(dec!(0.000000001))
            .with_amount(dec!(1))
            .with_market_id(1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidArgument(_)));
    }

    #[test]
    fn test_buy_value_sizing_includes_fee() {
        let order = OrderRequest::buy(dec!(0.005))
            .with_value(dec!(0.01))
            .with_market_id(1)
            .validate()
            .unwrap();

        assert_eq!(order.price.to_string(), "0.00500000");
        assert_eq!(order.amount(dec!(0.005)).unwrap(), dec!(1.99004975));
    }

    #[test]
    fn test_sell_value_sizing() {
        let order = OrderRequest::sell(dec!(1))
            .with_value(dec!(0.01))
            .with_market_id(1)
            .validate()
            .unwrap();

        assert_eq!(order.amount(dec!(0.005)).unwrap().to_string(), "0.01000000");
    }

    #[test]
    fn test_amount_passes_through() {
        let order = OrderRequest::sell(dec!(1))
            .with_amount(dec!(0.01))
            .with_market_string("LTC_BTC")
            .validate()
            .unwrap();

        assert_eq!(order.market, MarketKey::from("LTC_BTC"));
        assert_eq!(order.amount(dec!(0.005)).unwrap().to_string(), "0.01");
    }

    #[test]
    fn test_oversized_value_is_rejected() {
        let buy = OrderRequest::buy(dec!(0.5))
            .with_value(Decimal::MAX)
            .with_market_id(1)
            .validate()
            .unwrap();
        assert!(matches!(
            buy.amount(dec!(0.005)),
            Err(RestError::InvalidArgument(_))
        ));

        let sell = OrderRequest::sell(dec!(0.5))
            .with_value(Decimal::MAX)
            .with_market_id(1)
            .validate()
            .unwrap();
        assert!(matches!(
            sell.amount(dec!(0.005)),
            Err(RestError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_crossing_rules() {
        let buy = OrderRequest::buy(dec!(0.1))
            .with_value(dec!(0.01))
            .with_market_id(1)
            .validate()
            .unwrap();
        assert!(buy.crosses(Some(dec!(0.00707017)), Some(dec!(0.00664751))));
        assert!(!buy.crosses(None, Some(dec!(0.00664751))));

        let sell = OrderRequest::sell(dec!(0.001))
            .with_value(dec!(0.01))
            .with_market_id(1)
            .validate()
            .unwrap();
        assert!(sell.crosses(Some(dec!(0.00707017)), Some(dec!(0.00664751))));
        assert!(!sell.crosses(Some(dec!(0.00707017)), None));
    }

    #[test]
    fn test_orders_filter_builders() {
        let filter = OrdersFilter::closed().older_than(10);
        assert_eq!(filter.open, Some(false));
        assert_eq!(filter.older_than, Some(10));
        assert_eq!(filter.newer_than, None);
    }
}
