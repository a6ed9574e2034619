//! Print the current BTC-USD buy, sell and spot prices.
//!
//! Run with `cargo run --example prices`. Set `RUST_LOG=debug` to see the
//! request spans.

use coinbase_api_client::rest::{CoinbaseClient, PriceQuery};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = CoinbaseClient::builder().build()?;
    let query = PriceQuery::new("BTC-USD");

    let buy = client.get_buy_price(Some(&query)).await?;
    let sell = client.get_sell_price(Some(&query)).await?;
    let spot = client.get_spot_price(Some(&query)).await?;

    println!("buy:  {buy}");
    println!("sell: {sell}");
    println!("spot: {spot}");
    Ok(())
}
