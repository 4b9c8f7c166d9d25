//! # Graph Session Demo
//!
//! Feeds a small token/pool universe into a live graph session, selects
//! everything, solves a best route and prints the materialized view.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin session_demo -- --start 2 --end 5
//! ```
//!
//! Pass `--simulate` to also quote the solved route against the configured
//! simulation endpoint.

use anyhow::Result;
use clap::Parser;
use pool_graph_sdk::ingestion::{ObservedBatch, PoolObservation, StreamMessage, TokenDescriptor};
use pool_graph_sdk::simulation::{HttpSimulationClient, SimulationClient};
use pool_graph_sdk::{EventOutcome, GraphSession, PoolId, Settings, TokenId, UserEvent};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Live pool-graph session demo")]
struct Args {
    /// Start token id for the route query
    #[arg(long, default_value = "2")]
    start: String,

    /// End token id for the route query
    #[arg(long, default_value = "5")]
    end: String,

    /// Sell amount for the optional simulation call
    #[arg(long, default_value_t = 100.0)]
    amount: f64,

    /// Quote the solved route against the simulation endpoint
    #[arg(long, default_value_t = false)]
    simulate: bool,

    /// Configuration file (TOML, optional)
    #[arg(long, default_value = "config/default")]
    config: String,
}

/// Demo token universe: (id, symbol).
const DEMO_TOKENS: &[(&str, &str)] = &[
    ("1", "USDC"),
    ("2", "WETH"),
    ("3", "WBTC"),
    ("4", "DAI"),
    ("5", "USDT"),
    ("6", "PEPE"),
    ("7", "AAVE"),
    ("8", "1INCH"),
    ("9", "GNO"),
    ("10", "LDO"),
];

/// Demo pools: (pool id, from, to, protocol, spot price, TVL).
const DEMO_POOLS: &[(&str, &str, &str, &str, f64, f64)] = &[
    ("0xp01", "2", "8", "uniswap_v2", 3.0, 1_200_000.0),
    ("0xp02", "2", "9", "uniswap_v3", 3.0, 800_000.0),
    ("0xp03", "2", "10", "uniswap_v3", 4.0, 2_500_000.0),
    ("0xp04", "4", "6", "sushiswap", 6.0, 90_000.0),
    ("0xp05", "5", "7", "balancer", 2.0, 400_000.0),
    ("0xp06", "4", "5", "curve", 3.0, 9_000_000.0),
    ("0xp07", "9", "10", "balancer", 2.0, 150_000.0),
    ("0xp08", "2", "3", "uniswap_v3", 1.0, 14_000_000.0),
    ("0xp09", "3", "9", "uniswap_v2", 2.0, 300_000.0),
    ("0xp10", "5", "3", "curve", 3.0, 5_000_000.0),
    ("0xp11", "2", "7", "sushiswap", 1.0, 700_000.0),
];

fn demo_batch() -> ObservedBatch {
    fn symbol_of(id: &str) -> &str {
        DEMO_TOKENS
            .iter()
            .find(|(token_id, _)| *token_id == id)
            .map(|(_, symbol)| *symbol)
            .unwrap_or(id)
    }

    let mut batch = ObservedBatch::default();
    for &(pool_id, from, to, protocol, price, tvl) in DEMO_POOLS {
        batch.pools.insert(
            PoolId::from(pool_id),
            PoolObservation {
                token0: Some(TokenDescriptor {
                    address: from.to_string(),
                    symbol: symbol_of(from).to_string(),
                }),
                token1: Some(TokenDescriptor {
                    address: to.to_string(),
                    symbol: symbol_of(to).to_string(),
                }),
                protocol: Some(protocol.into()),
                tvl_usd: Some(tvl),
            },
        );
        batch.spot_prices.insert(PoolId::from(pool_id), price);
    }
    batch
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    println!("🚀 Starting pool-graph session demo");

    let settings = Settings::from_file(&args.config)?;
    let mut session = GraphSession::new(settings.clone());

    // Feed the demo universe through the streaming path, one message at a time.
    let (tx, rx) = mpsc::channel(8);
    tx.send(Ok(StreamMessage::Observed(demo_batch()))).await?;
    drop(tx);
    session.drive(rx).await?;
    println!(
        "✅ Ingested {} tokens / {} pools",
        session.store().token_count(),
        session.store().pool_count()
    );

    // Show everything.
    session.handle_event(UserEvent::SelectAllTokens);
    session.handle_event(UserEvent::SelectAllProtocols);
    println!(
        "✅ Materialized view: {} nodes / {} edges",
        session.view().nodes.len(),
        session.view().edges.len()
    );

    let start = TokenId::from(args.start.as_str());
    let end = TokenId::from(args.end.as_str());
    match session.handle_event(UserEvent::RequestBestRoute {
        start: start.clone(),
        end: end.clone(),
    }) {
        EventOutcome::Route(route) => {
            println!(
                "✅ Best route: {} (product {:.4}, {} hops, pools {:?})",
                route.route.join(" → "),
                route.price_product,
                route.hops,
                route.pool_ids
            );
            if args.simulate {
                let request = session
                    .prepare_swap(args.amount)
                    .expect("route was just solved");
                let client = HttpSimulationClient::new(&settings.simulation)?;
                match client.simulate(&request).await {
                    Ok(quote) => println!(
                        "✅ Simulation: in {} → out {} (gas {})",
                        quote.input_amount, quote.output_amount, quote.gas_estimate
                    ),
                    Err(e) => println!("⚠️  Simulation call failed: {e}"),
                }
            }
        }
        EventOutcome::NoRoute(reason) => println!("⚠️  {reason}"),
        EventOutcome::Applied | EventOutcome::Swap(_) => {}
    }

    println!("{}", serde_json::to_string_pretty(session.view())?);
    Ok(())
}
