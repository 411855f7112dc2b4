//! Account balances

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Balances keyed by currency code
pub type BalanceMap = HashMap<String, Decimal>;

/// A single currency balance entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub currency: String,
    pub balance: Decimal,
}

/// Payload of `/v1/user/balances`
#[derive(Debug, Clone, Deserialize)]
pub struct BalancesData {
    pub balances: Vec<BalanceEntry>,
}

/// Payload of `/v1/user/balances_all`
#[derive(Debug, Clone, Deserialize)]
pub struct BalancesAllData {
    pub balances: Vec<BalanceEntry>,
    #[serde(default)]
    pub order_balances: Vec<BalanceEntry>,
}

/// Spendable and in-order balances, kept apart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllBalances {
    /// Funds available for new orders and withdrawals
    pub spendable: BalanceMap,
    /// Funds reserved by open orders
    pub in_orders: BalanceMap,
}

impl AllBalances {
    /// Sum spendable and in-order funds per currency
    pub fn merged(&self) -> Result<BalanceMap, BalanceOverflow> {
        let mut merged = self.spendable.clone();
        for (currency, amount) in &self.in_orders {
            let total = merged.entry(currency.clone()).or_insert(Decimal::ZERO);
            *total = total.checked_add(*amount).ok_or_else(|| BalanceOverflow {
                currency: currency.clone(),
            })?;
        }
        Ok(merged)
    }
}

/// A per-currency sum does not fit in a `Decimal`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("balance total for {currency} overflows")]
pub struct BalanceOverflow {
    pub currency: String,
}

/// Collect balance entries into a map
pub fn to_balance_map(entries: Vec<BalanceEntry>) -> BalanceMap {
    entries.into_iter().map(|e| (e.currency, e.balance)).collect()
}

impl From<BalancesAllData> for AllBalances {
    fn from(data: BalancesAllData) -> Self {
        Self {
            spendable: to_balance_map(data.balances),
            in_orders: to_balance_map(data.order_balances),
        }
    }
}
