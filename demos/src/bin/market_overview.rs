//! Demo: Market Overview
//!
//! Lists every tradable market with its fees and current quotes. Uses only
//! public endpoints, so no API key is needed.
//!
//! Run: cargo run --bin market_overview

use colored::*;
use qtrade_rest::{QtradeClient, DEFAULT_ENDPOINT};
use qtrade_types::MarketKey;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("{}", "═".repeat(72).cyan());
    println!("{}", "  MARKET OVERVIEW".cyan().bold());
    println!("{}", "═".repeat(72).cyan());
    println!();

    let endpoint = std::env::var("QTRADE_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
    let client = QtradeClient::new(endpoint)?;

    let markets = client.market().markets().await?;
    let tickers = client.market().tickers().await?;

    // Each market is indexed twice; walk the numeric keys only
    let mut ids: Vec<u64> = markets.keys().filter_map(MarketKey::as_id).collect();
    ids.sort_unstable();

    println!(
        "  {:<12} {:>8} {:>8} {:>14} {:>14} {:>14}",
        "MARKET".bold(),
        "MAKER",
        "TAKER",
        "BID",
        "ASK",
        "SPREAD"
    );

    let mut shown = 0;
    for id in ids {
        let market = &markets[&MarketKey::Id(id)];
        if !market.can_view {
            continue;
        }
        shown += 1;

        let ticker = tickers.get(&MarketKey::Id(id));
        let quote = |q: Option<rust_decimal::Decimal>| {
            q.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
        };
        let (bid, ask, spread) = match ticker {
            Some(t) => (quote(t.bid), quote(t.ask), quote(t.spread())),
            None => ("-".to_string(), "-".to_string(), "-".to_string()),
        };

        let name = if market.can_trade {
            market.string_key.yellow()
        } else {
            market.string_key.dimmed()
        };
        println!(
            "  {:<12} {:>8} {:>8} {:>14} {:>14} {:>14}",
            name, market.maker_fee, market.taker_fee, bid.green(), ask.red(), spread
        );
    }

    println!();
    println!("{} {} markets", "✓".green(), shown);
    Ok(())
}
