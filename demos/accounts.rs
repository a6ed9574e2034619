//! List every account of the key owner, following pagination.
//!
//! Reads `COINBASE_API_KEY` and `COINBASE_API_SECRET` from the environment.

use std::sync::Arc;

use coinbase_api_client::auth::EnvCredentials;
use coinbase_api_client::model::Account;
use coinbase_api_client::rest::{CoinbaseClient, ListParams};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let credentials = EnvCredentials::from_env()?;
    let client = CoinbaseClient::builder()
        .credentials(Arc::new(credentials))
        .build()?;

    let first = client.get_accounts(Some(&ListParams::new().limit(25))).await?;
    let all = client.collect_pages(first).await?;

    for account in all.page_as::<Account>()? {
        let balance = account
            .balance()
            .map(|b| b.to_string())
            .unwrap_or_default();
        println!("{:<30} {}", account.name().unwrap_or("?"), balance);
    }
    Ok(())
}
