//! Transactions of an account, and the money-moving operations that create
//! them.

use crate::error::CoinbaseError;
use crate::model::{AccountRef, ApiObject, ObjectKind, Transaction};
use crate::rest::endpoints::{V2, path};
use crate::rest::params::{ListParams, MoneyRequest, TransactionType, Validate};
use crate::rest::CoinbaseClient;

impl CoinbaseClient {
    pub async fn get_transactions(
        &self,
        account_id: &str,
        params: Option<&ListParams>,
    ) -> Result<ApiObject, CoinbaseError> {
        self.get_with_params(
            &[V2, path::ACCOUNTS, account_id, path::TRANSACTIONS],
            params,
            ObjectKind::Transaction,
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    pub async fn get_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction, CoinbaseError> {
        self.get_as(
            &[V2, path::ACCOUNTS, account_id, path::TRANSACTIONS, transaction_id],
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    async fn create_transaction(
        &self,
        account_id: &str,
        request: &MoneyRequest,
        transaction_type: TransactionType,
    ) -> Result<Transaction, CoinbaseError> {
        request.validate()?;
        let body = request.with_type(transaction_type);
        self.post_as(
            &[V2, path::ACCOUNTS, account_id, path::TRANSACTIONS],
            &body,
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    /// Send funds to an email or a network address.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinbase_api_client::rest::{CoinbaseClient, MoneyRequest};
    /// use rust_decimal::Decimal;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = CoinbaseClient::with_api_key("key", "secret")?;
    ///     let request = MoneyRequest::new("user@example.com", Decimal::new(1, 2), "BTC")
    ///         .description("lunch");
    ///     let tx = client.send_money("primary", &request).await?;
    ///     println!("{}", tx.status().unwrap_or("unknown"));
    ///     Ok(())
    /// }
    /// ```
    pub async fn send_money(
        &self,
        account_id: &str,
        request: &MoneyRequest,
    ) -> Result<Transaction, CoinbaseError> {
        self.create_transaction(account_id, request, TransactionType::Send)
            .await
    }

    /// Move funds to another account of the same user. `to` is the target
    /// account id.
    pub async fn transfer_money(
        &self,
        account_id: &str,
        request: &MoneyRequest,
    ) -> Result<Transaction, CoinbaseError> {
        self.create_transaction(account_id, request, TransactionType::Transfer)
            .await
    }

    /// Ask an email address for funds.
    pub async fn request_money(
        &self,
        account_id: &str,
        request: &MoneyRequest,
    ) -> Result<Transaction, CoinbaseError> {
        self.create_transaction(account_id, request, TransactionType::Request)
            .await
    }

    async fn request_action(
        &self,
        account_id: &str,
        transaction_id: &str,
        action: &str,
    ) -> Result<ApiObject, CoinbaseError> {
        self.post_empty(
            &[V2, path::ACCOUNTS, account_id, path::TRANSACTIONS, transaction_id, action],
            ObjectKind::Generic,
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    /// Let the recipient complete a money request.
    pub async fn complete_request(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<ApiObject, CoinbaseError> {
        self.request_action(account_id, transaction_id, path::COMPLETE)
            .await
    }

    pub async fn resend_request(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<ApiObject, CoinbaseError> {
        self.request_action(account_id, transaction_id, path::RESEND)
            .await
    }

    pub async fn cancel_request(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<ApiObject, CoinbaseError> {
        self.request_action(account_id, transaction_id, path::CANCEL)
            .await
    }
}
