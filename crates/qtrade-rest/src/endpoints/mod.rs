//! API endpoint groups borrowed from a [`QtradeClient`](crate::QtradeClient)

pub mod market;
pub mod account;
pub mod trading;

pub use market::MarketEndpoints;
pub use account::AccountEndpoints;
pub use trading::TradingEndpoints;
