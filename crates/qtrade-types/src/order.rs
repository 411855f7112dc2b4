//! Order types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Limit order direction, as named in the `/v1/user/{order_type}` path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    BuyLimit,
    SellLimit,
}

impl OrderType {
    /// Returns the order type as used in API paths and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuyLimit => "buy_limit",
            Self::SellLimit => "sell_limit",
        }
    }

    /// Returns true for buy orders
    pub fn is_buy(&self) -> bool {
        matches!(self, Self::BuyLimit)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub market_id: u64,
    pub order_type: OrderType,
    pub price: Decimal,
    pub market_amount: Decimal,
    pub market_amount_remaining: Decimal,
    /// Base currency reserved by a buy order
    #[serde(default)]
    pub base_amount: Option<Decimal>,
    pub open: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Fills against this order, `null` when none were requested
    #[serde(default)]
    pub trades: Option<Vec<serde_json::Value>>,
}

/// Payload of `/v1/user/orders`
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersData {
    pub orders: Vec<Order>,
}

/// Payload of `/v1/user/{buy_limit,sell_limit}`
#[derive(Debug, Clone, Deserialize)]
pub struct PlacedOrderData {
    pub order: Order,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_deserialize() {
        let json = r#"{"id": 8980901, "market_amount": "12973.17366652",
            "market_amount_remaining": "12973.17366652",
            "created_at": "2019-11-14T16:34:20.328834Z", "price": "0.00000037",
            "order_type": "sell_limit", "market_id": 36, "open": true, "trades": null}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_type, OrderType::SellLimit);
        assert_eq!(order.price, dec!(0.00000037));
        assert_eq!(order.base_amount, None);
        assert!(order.trades.is_none());
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_order_type_str() {
        assert_eq!(OrderType::BuyLimit.to_string(), "buy_limit");
        assert!(!OrderType::SellLimit.is_buy());
    }
}
