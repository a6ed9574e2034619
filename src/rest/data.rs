//! Market data endpoints. These work without authentication.

use crate::error::CoinbaseError;
use crate::model::{ApiObject, Money, ObjectKind};
use crate::rest::endpoints::{V2, path};
use crate::rest::params::{CurrencyQuery, DEFAULT_CURRENCY_PAIR, PriceQuery};
use crate::rest::CoinbaseClient;

impl CoinbaseClient {
    /// List known currencies.
    ///
    /// The answer keeps the list under `data`.
    pub async fn get_currencies(&self) -> Result<ApiObject, CoinbaseError> {
        self.get(&[V2, path::CURRENCIES], ObjectKind::Generic, None)
            .await
    }

    /// Exchange rates against a base currency (USD by default).
    pub async fn get_exchange_rates(
        &self,
        query: Option<&CurrencyQuery>,
    ) -> Result<ApiObject, CoinbaseError> {
        self.get_with_params(&[V2, path::EXCHANGE_RATES], query, ObjectKind::Generic, None)
            .await
    }

    async fn get_price(&self, side: &str, query: Option<&PriceQuery>) -> Result<Money, CoinbaseError> {
        let pair = query.map_or(DEFAULT_CURRENCY_PAIR, PriceQuery::pair);
        let obj = self
            .get_with_params(&[V2, path::PRICES, pair, side], query, ObjectKind::Money, None)
            .await?;
        Money::try_from(obj)
    }

    /// Total price to buy one unit, fees included.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinbase_api_client::rest::{CoinbaseClient, PriceQuery};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = CoinbaseClient::builder().build()?;
    ///     let price = client.get_buy_price(Some(&PriceQuery::new("ETH-EUR"))).await?;
    ///     println!("{price}");
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_buy_price(&self, query: Option<&PriceQuery>) -> Result<Money, CoinbaseError> {
        self.get_price("buy", query).await
    }

    /// Total amount received when selling one unit, fees included.
    pub async fn get_sell_price(&self, query: Option<&PriceQuery>) -> Result<Money, CoinbaseError> {
        self.get_price("sell", query).await
    }

    /// Current or historic (with [`PriceQuery::date`]) spot price.
    pub async fn get_spot_price(&self, query: Option<&PriceQuery>) -> Result<Money, CoinbaseError> {
        self.get_price("spot", query).await
    }

    /// Price history of a pair over a [`PriceQuery::period`].
    pub async fn get_historic_prices(
        &self,
        query: Option<&PriceQuery>,
    ) -> Result<ApiObject, CoinbaseError> {
        let pair = query.map_or(DEFAULT_CURRENCY_PAIR, PriceQuery::pair);
        self.get_with_params(&[V2, path::PRICES, pair, "historic"], query, ObjectKind::Generic, None)
            .await
    }

    /// Server time, as `iso` and `epoch`.
    pub async fn get_time(&self) -> Result<ApiObject, CoinbaseError> {
        self.get(&[V2, path::TIME], ObjectKind::Generic, None).await
    }
}
