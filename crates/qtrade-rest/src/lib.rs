//! REST API client for the qTrade cryptocurrency exchange
//!
//! This crate provides an async client for qTrade's REST API: reference
//! data, balances, order listing, order placement and cancellation.
//!
//! # Features
//!
//! - **Market Data**: markets, currencies and tickers, cached per session
//! - **Account**: login, balances, order listing
//! - **Trading**: limit orders sized by amount or value, with an optional
//!   guard against crossing the spread; bulk cancellation
//!
//! # Authentication
//!
//! Private endpoints accept either HMAC-SHA256 request signatures (an API key
//! in `keyid:secret` form) or a bearer token obtained from
//! [`QtradeClient::login`]. When both are available the signature is used.
//!
//! # Example
//!
//! ```no_run
//! use qtrade_rest::{ClientConfig, OrderRequest, QtradeClient};
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = QtradeClient::new("https://api.qtrade.io/")?;
//!     let ticker = client.market().ticker("LTC_BTC").await?;
//!     println!("LTC/BTC: {:?}", ticker.last);
//!
//!     // Private endpoints (auth required)
//!     let config = ClientConfig::default().with_key("1:1111111111")?;
//!     let auth_client = QtradeClient::with_config(config)?;
//!     let balances = auth_client.balances().await?;
//!     println!("Balances: {:?}", balances);
//!
//!     let order = OrderRequest::sell(Decimal::ONE)
//!         .with_market_string("LTC_BTC")
//!         .with_amount(Decimal::new(1, 2));
//!     auth_client.order(&order).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Rate Limiting
//!
//! Every response advertises the remaining request budget. The client sleeps
//! before a request once the budget is spent, paces requests once half of it
//! is used, and retries a `429` response once. See [`RateLimiter`].

pub mod cache;
pub mod client;
pub mod clock;
pub mod endpoints;
pub mod error;
pub mod rate_limiter;
pub mod request;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_fixtures;

// Re-export main types
pub use client::{ClientConfig, QtradeClient, DEFAULT_ENDPOINT};
pub use error::{RestError, RestResult};
pub use qtrade_auth::Credentials;
pub use rate_limiter::RateLimiter;
pub use request::{ApiPayload, ApiRequest};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use clock::{Clock, SystemClock};

#[cfg(any(test, feature = "test-utils"))]
pub use clock::MockClock;
#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockTransport;

// Re-export endpoint-specific types
pub use types::{
    select_market, LoginData, OrderOutcome, OrderRequest, OrderSize, OrdersFilter,
    ValidatedOrder,
};
