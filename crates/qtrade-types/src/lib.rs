//! Shared wire types for the qTrade REST API
//!
//! This crate provides the core type definitions used across the qTrade
//! client workspace. It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Currency`], [`Market`] - Reference data from `/v1/common`
//! - [`Ticker`] - Quote snapshot from `/v1/tickers`
//! - [`MarketKey`] - Dual key (numeric id or `"LTC_BTC"` string) for market lookups
//! - [`Order`], [`OrderType`] - User orders
//! - [`quantize_coin`] - Round decimals to the 8 digit coin unit
//! - [`RateState`] - Header driven client-side rate limiting state

pub mod balance;
pub mod decimal;
pub mod market;
pub mod market_key;
pub mod order;
pub mod rate_limit;
pub mod ticker;

// Re-export commonly used types
pub use balance::*;
pub use decimal::*;
pub use market::*;
pub use market_key::*;
pub use order::*;
pub use rate_limit::*;
pub use ticker::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
