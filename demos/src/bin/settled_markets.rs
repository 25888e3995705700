//! Demo: Settled markets of one series
//!
//! Walks every page of settled KXHIGHNY markets on production and groups
//! them by result.
//!
//! Run: cargo run --bin settled_markets

use colored::*;
use kalshi_demos::{client_from_env, init_tracing};
use kalshi_rest::group_by_field;
use kalshi_sdk::prelude::*;

const SERIES: &str = "KXHIGHNY";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", format!("  SETTLED MARKETS: {SERIES}").cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = client_from_env()?;
    println!("{} Using {} environment", "✓".green(), client.environment());

    let params = GetMarketsParams::builder()
        .series_ticker(SERIES)
        .status(MarketStatus::Settled)
        .limit(500)
        .build();
    let markets = client
        .rest()
        .get_all_markets(params, PageCap::unbounded())
        .await?;
    println!("{} Fetched {} settled markets\n", "✓".green(), markets.len());

    for (result, group) in group_by_field(markets, "result") {
        let label = if result.is_empty() { "(none)".to_string() } else { result };
        println!("  {} {}", format!("{label:>8}").yellow(), group.len());
        for market in group.iter().take(3) {
            println!(
                "           {} {}",
                market.ticker.dimmed(),
                market.title.as_deref().unwrap_or("")
            );
        }
    }

    Ok(())
}
