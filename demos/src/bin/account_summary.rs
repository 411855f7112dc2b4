//! Demo: Account Summary
//!
//! Shows spendable and in-order balances plus open orders for an API key.
//!
//! Run: QTRADE_API_KEY=1:secret cargo run --bin account_summary
//!
//! Set QTRADE_ENDPOINT to target another deployment and RUST_LOG=debug to see
//! every request.

use colored::*;
use qtrade_rest::{ClientConfig, Credentials, OrdersFilter, QtradeClient, DEFAULT_ENDPOINT};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  ACCOUNT SUMMARY".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let endpoint = std::env::var("QTRADE_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
    let config = ClientConfig::new(endpoint).with_credentials(Credentials::from_env()?);
    let client = QtradeClient::with_config(config)?;

    println!("{} Connected to {}", "✓".green(), client.endpoint());
    println!();

    let balances = client.balances_all().await?;
    let merged = balances.merged()?;

    let mut currencies: Vec<&String> = merged.keys().collect();
    currencies.sort();

    println!("  {:<8} {:>20} {:>20} {:>20}", "CURRENCY".bold(), "SPENDABLE", "IN ORDERS", "TOTAL");
    for currency in currencies {
        let spendable = balances.spendable.get(currency).copied().unwrap_or(Decimal::ZERO);
        let in_orders = balances.in_orders.get(currency).copied().unwrap_or(Decimal::ZERO);
        println!(
            "  {:<8} {:>20} {:>20} {:>20}",
            currency.yellow(),
            spendable,
            in_orders,
            merged[currency].to_string().green()
        );
    }
    println!();

    let orders = client.orders(&OrdersFilter::open()).await?;
    println!("{} {} open orders", "✓".green(), orders.len());

    for order in &orders {
        let market = client
            .market()
            .market(order.market_id)
            .await
            .map(|m| m.string_key.clone())
            .unwrap_or_else(|_| format!("#{}", order.market_id));

        let side = if order.order_type.is_buy() {
            "BUY ".green()
        } else {
            "SELL".red()
        };
        println!(
            "  {} {:>10} {:<10} {:>18} @ {}",
            side,
            order.id,
            market,
            order.market_amount_remaining,
            order.price
        );
    }

    println!();
    println!("{}", "═".repeat(60).cyan());
    Ok(())
}
