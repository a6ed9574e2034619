//! Buys, sells, deposits, withdrawals and the payment methods that fund
//! them.

use crate::error::CoinbaseError;
use crate::model::{
    AccountRef, ApiModel, ApiObject, Buy, Deposit, ObjectKind, PaymentMethod, Sell, Withdrawal,
};
use crate::rest::endpoints::{V2, path};
use crate::rest::params::{FundsRequest, ListParams, TradeRequest, Validate};
use crate::rest::CoinbaseClient;

impl CoinbaseClient {
    async fn list_transfers(
        &self,
        account_id: &str,
        collection: &str,
        kind: ObjectKind,
        params: Option<&ListParams>,
    ) -> Result<ApiObject, CoinbaseError> {
        self.get_with_params(
            &[V2, path::ACCOUNTS, account_id, collection],
            params,
            kind,
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    async fn get_transfer<T: ApiModel>(
        &self,
        account_id: &str,
        collection: &str,
        id: &str,
    ) -> Result<T, CoinbaseError> {
        self.get_as(
            &[V2, path::ACCOUNTS, account_id, collection, id],
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    async fn commit_transfer<T: ApiModel>(
        &self,
        account_id: &str,
        collection: &str,
        id: &str,
    ) -> Result<T, CoinbaseError> {
        self.post_empty_as(
            &[V2, path::ACCOUNTS, account_id, collection, id, path::COMMIT],
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    // ========== Buys ==========

    pub async fn get_buys(
        &self,
        account_id: &str,
        params: Option<&ListParams>,
    ) -> Result<ApiObject, CoinbaseError> {
        self.list_transfers(account_id, path::BUYS, ObjectKind::Buy, params)
            .await
    }

    pub async fn get_buy(&self, account_id: &str, buy_id: &str) -> Result<Buy, CoinbaseError> {
        self.get_transfer(account_id, path::BUYS, buy_id).await
    }

    /// Buy into an account. A payment method is required.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinbase_api_client::rest::{CoinbaseClient, TradeRequest};
    /// use rust_decimal::Decimal;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = CoinbaseClient::with_api_key("key", "secret")?;
    ///     let request = TradeRequest::new("BTC")
    ///         .amount(Decimal::new(1, 1))
    ///         .payment_method("pm-1")
    ///         .commit(false);
    ///     let mut buy = client.buy("primary", &request).await?;
    ///     buy.commit().await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn buy(&self, account_id: &str, request: &TradeRequest) -> Result<Buy, CoinbaseError> {
        request.validate_buy()?;
        self.post_as(
            &[V2, path::ACCOUNTS, account_id, path::BUYS],
            request,
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    pub async fn commit_buy(&self, account_id: &str, buy_id: &str) -> Result<Buy, CoinbaseError> {
        self.commit_transfer(account_id, path::BUYS, buy_id).await
    }

    // ========== Sells ==========

    pub async fn get_sells(
        &self,
        account_id: &str,
        params: Option<&ListParams>,
    ) -> Result<ApiObject, CoinbaseError> {
        self.list_transfers(account_id, path::SELLS, ObjectKind::Sell, params)
            .await
    }

    pub async fn get_sell(&self, account_id: &str, sell_id: &str) -> Result<Sell, CoinbaseError> {
        self.get_transfer(account_id, path::SELLS, sell_id).await
    }

    pub async fn sell(&self, account_id: &str, request: &TradeRequest) -> Result<Sell, CoinbaseError> {
        request.validate()?;
        self.post_as(
            &[V2, path::ACCOUNTS, account_id, path::SELLS],
            request,
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    pub async fn commit_sell(&self, account_id: &str, sell_id: &str) -> Result<Sell, CoinbaseError> {
        self.commit_transfer(account_id, path::SELLS, sell_id).await
    }

    // ========== Deposits ==========

    pub async fn get_deposits(
        &self,
        account_id: &str,
        params: Option<&ListParams>,
    ) -> Result<ApiObject, CoinbaseError> {
        self.list_transfers(account_id, path::DEPOSITS, ObjectKind::Deposit, params)
            .await
    }

    pub async fn get_deposit(&self, account_id: &str, deposit_id: &str) -> Result<Deposit, CoinbaseError> {
        self.get_transfer(account_id, path::DEPOSITS, deposit_id)
            .await
    }

    /// Deposit fiat from a payment method into a fiat account.
    pub async fn deposit(&self, account_id: &str, request: &FundsRequest) -> Result<Deposit, CoinbaseError> {
        request.validate()?;
        self.post_as(
            &[V2, path::ACCOUNTS, account_id, path::DEPOSITS],
            request,
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    pub async fn commit_deposit(
        &self,
        account_id: &str,
        deposit_id: &str,
    ) -> Result<Deposit, CoinbaseError> {
        self.commit_transfer(account_id, path::DEPOSITS, deposit_id)
            .await
    }

    // ========== Withdrawals ==========

    pub async fn get_withdrawals(
        &self,
        account_id: &str,
        params: Option<&ListParams>,
    ) -> Result<ApiObject, CoinbaseError> {
        self.list_transfers(account_id, path::WITHDRAWALS, ObjectKind::Withdrawal, params)
            .await
    }

    pub async fn get_withdrawal(
        &self,
        account_id: &str,
        withdrawal_id: &str,
    ) -> Result<Withdrawal, CoinbaseError> {
        self.get_transfer(account_id, path::WITHDRAWALS, withdrawal_id)
            .await
    }

    /// Withdraw fiat from a fiat account to a payment method.
    pub async fn withdraw(
        &self,
        account_id: &str,
        request: &FundsRequest,
    ) -> Result<Withdrawal, CoinbaseError> {
        request.validate()?;
        self.post_as(
            &[V2, path::ACCOUNTS, account_id, path::WITHDRAWALS],
            request,
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    pub async fn commit_withdrawal(
        &self,
        account_id: &str,
        withdrawal_id: &str,
    ) -> Result<Withdrawal, CoinbaseError> {
        self.commit_transfer(account_id, path::WITHDRAWALS, withdrawal_id)
            .await
    }

    // ========== Payment methods ==========

    pub async fn get_payment_methods(
        &self,
        params: Option<&ListParams>,
    ) -> Result<ApiObject, CoinbaseError> {
        self.get_with_params(&[V2, path::PAYMENT_METHODS], params, ObjectKind::PaymentMethod, None)
            .await
    }

    pub async fn get_payment_method(&self, payment_method_id: &str) -> Result<PaymentMethod, CoinbaseError> {
        self.get_as(&[V2, path::PAYMENT_METHODS, payment_method_id], None)
            .await
    }
}
