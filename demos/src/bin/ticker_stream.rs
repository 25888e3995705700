//! Demo: Live ticker stream
//!
//! Opens a signed stream session, subscribes to the ticker channel and
//! prints updates for 30 seconds.
//!
//! Run: cargo run --bin ticker_stream [MARKET_TICKER...]

use std::time::{Duration, Instant};

use colored::*;
use kalshi_demos::{client_from_env, init_tracing};
use kalshi_sdk::prelude::*;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  LIVE TICKER STREAM".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let tickers: Vec<String> = std::env::args().skip(1).collect();
    let channels = if tickers.is_empty() {
        vec![Channel::ticker()]
    } else {
        tickers.iter().map(Channel::ticker_for).collect()
    };

    let client = client_from_env()?;
    let (mut session, handle, mut events) = client.stream_events(channels).await?;
    println!("{} Connected ({})", "✓".green(), session.url());

    let start = Instant::now();
    let deadline = tokio::time::sleep(Duration::from_secs(30));
    tokio::pin!(deadline);
    let mut updates = 0u64;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(StreamEvent::Message(msg)) => match msg.kind {
                    StreamMessageKind::Ticker => {
                        updates += 1;
                        let stamp = chrono::Local::now().format("%H:%M:%S%.3f");
                        println!(
                            "  {} {} {} {}  {} {}",
                            stamp.to_string().dimmed(),
                            msg.msg["market_ticker"].as_str().unwrap_or("?").yellow(),
                            "BID:".dimmed(),
                            msg.msg["yes_bid"],
                            "ASK:".dimmed(),
                            msg.msg["yes_ask"],
                        );
                    }
                    StreamMessageKind::Subscribed => {
                        println!("{} Subscription {} active", "✓".green(), msg.id.unwrap_or_default());
                    }
                    StreamMessageKind::Error { code, msg } => {
                        println!("{} Server error {:?}: {}", "✗".red(), code, msg);
                    }
                    _ => {}
                },
                Some(StreamEvent::Error(err)) => {
                    warn!(error = %err, "Stream failed");
                    println!("{} {}", "✗".red(), err);
                    break;
                }
                Some(StreamEvent::Closed { code, reason }) => {
                    println!("{} Closed by server ({code}): {reason}", "!".yellow());
                    break;
                }
                Some(StreamEvent::Opened) => {}
                None => break,
            },
            _ = &mut deadline => break,
        }
    }

    if !handle.state().is_terminal() {
        session.close().await?;
    }

    let elapsed = start.elapsed().as_secs_f64();
    info!(updates, elapsed_secs = elapsed, "Ticker stream finished");
    println!();
    println!(
        "  {} updates in {:.1}s ({:.1}/s)",
        updates.to_string().bold(),
        elapsed,
        updates as f64 / elapsed.max(1.0)
    );

    Ok(())
}
