//! Demo: Order lifecycle on the sandbox
//!
//! Places a 1-cent resting limit order, amends its price, then cancels it.
//!
//! Run: KALSHI_ENV=demo cargo run --bin order_lifecycle <MARKET_TICKER>

use colored::*;
use kalshi_demos::{client_from_env, init_tracing};
use kalshi_sdk::prelude::*;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  ORDER LIFECYCLE".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let ticker = std::env::args()
        .nth(1)
        .ok_or("usage: order_lifecycle <MARKET_TICKER>")?;

    let client = client_from_env()?;
    if client.environment() == Environment::Production {
        return Err("refusing to place demo orders on production".into());
    }

    let market = client.rest().get_market(&ticker).await?;
    println!(
        "{} {} ({})",
        "✓".green(),
        market.ticker,
        market.title.as_deref().unwrap_or("untitled")
    );

    let stamp = chrono::Utc::now().timestamp_millis();
    let client_order_id = format!("demo-{stamp}");
    let request =
        CreateOrderRequest::limit_yes(&ticker, Action::Buy, Side::Yes, 1, 1, &client_order_id);
    let order = client.rest().create_order(&request).await?;
    info!(order_id = %order.order_id, %client_order_id, "Demo order placed");
    println!(
        "{} Placed {} ({})",
        "✓".green(),
        order.order_id.yellow(),
        order.status.as_deref().unwrap_or("?")
    );

    let amend = AmendOrderRequest::new(
        &ticker,
        Action::Buy,
        Side::Yes,
        1,
        &client_order_id,
        format!("demo-{stamp}-amended"),
    )
    .with_yes_price(2);
    let amended = client.rest().orders().amend_order(&order.order_id, &amend).await?;
    println!(
        "{} Amended to {}¢ ({})",
        "✓".green(),
        amended.order.yes_price.unwrap_or_default(),
        amended.order.order_id
    );

    let cancelled = client.rest().orders().cancel_order(&amended.order.order_id).await?;
    println!(
        "{} Cancelled ({})",
        "✓".green(),
        cancelled.order.status.as_deref().unwrap_or("?")
    );

    Ok(())
}
