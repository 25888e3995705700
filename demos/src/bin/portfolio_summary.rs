//! Demo: Portfolio summary
//!
//! Prints the balance, every position with non-zero exposure and the total
//! market exposure.
//!
//! Run: cargo run --bin portfolio_summary

use colored::*;
use kalshi_demos::{client_from_env, dollars, init_tracing};
use kalshi_sdk::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  PORTFOLIO SUMMARY".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = client_from_env()?;
    let portfolio = client.rest().portfolio();

    let balance = portfolio.get_balance().await?;
    println!("  {} {}", "Balance:".yellow(), dollars(balance.balance));
    if let Some(value) = balance.portfolio_value {
        println!("  {} {}", "Portfolio value:".yellow(), dollars(value));
    }
    println!();

    let positions = portfolio
        .get_exposed_positions(GetPositionsParams::default())
        .await?;
    if positions.is_empty() {
        println!("  {}", "No open exposure".dimmed());
    }
    for position in &positions {
        let side = if position.position > 0 { "YES".green() } else { "NO".red() };
        println!(
            "  {:<32} {} {:>6}  {}",
            position.ticker,
            side,
            position.position.abs(),
            dollars(position.market_exposure)
        );
    }

    let total = portfolio.get_total_market_exposure().await?;
    println!();
    println!("  {} {}", "Total exposure:".yellow().bold(), dollars(total));

    Ok(())
}
