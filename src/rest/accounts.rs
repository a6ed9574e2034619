//! Account and address endpoints.

use crate::error::CoinbaseError;
use crate::model::{AccountRef, Account, Address, ApiObject, ObjectKind};
use crate::rest::endpoints::{V2, path};
use crate::rest::params::{
    CreateAccountRequest, CreateAddressRequest, ListParams, UpdateAccountRequest, Validate,
};
use crate::rest::CoinbaseClient;

impl CoinbaseClient {
    // ========== Accounts ==========

    /// List the user's accounts.
    ///
    /// Each item under `data` is an [`Account`]; use
    /// [`ApiObject::page_as`] to convert them.
    pub async fn get_accounts(&self, params: Option<&ListParams>) -> Result<ApiObject, CoinbaseError> {
        self.get_with_params(&[V2, path::ACCOUNTS], params, ObjectKind::Account, None)
            .await
    }

    pub async fn get_account(&self, account_id: &str) -> Result<Account, CoinbaseError> {
        self.get_as(&[V2, path::ACCOUNTS, account_id], None).await
    }

    pub async fn get_primary_account(&self) -> Result<Account, CoinbaseError> {
        self.get_account(path::PRIMARY).await
    }

    pub async fn create_account(&self, request: &CreateAccountRequest) -> Result<Account, CoinbaseError> {
        request.validate()?;
        self.post_as(&[V2, path::ACCOUNTS], request, None).await
    }

    pub async fn set_primary_account(&self, account_id: &str) -> Result<Account, CoinbaseError> {
        self.post_empty_as(&[V2, path::ACCOUNTS, account_id, path::PRIMARY], None)
            .await
    }

    pub async fn update_account(
        &self,
        account_id: &str,
        request: &UpdateAccountRequest,
    ) -> Result<Account, CoinbaseError> {
        self.put_as(&[V2, path::ACCOUNTS, account_id], request, None)
            .await
    }

    /// Remove an account. Primary accounts and accounts with a balance
    /// cannot be deleted.
    pub async fn delete_account(&self, account_id: &str) -> Result<(), CoinbaseError> {
        self.delete(&[V2, path::ACCOUNTS, account_id]).await
    }

    // ========== Addresses ==========

    pub async fn get_addresses(
        &self,
        account_id: &str,
        params: Option<&ListParams>,
    ) -> Result<ApiObject, CoinbaseError> {
        self.get_with_params(
            &[V2, path::ACCOUNTS, account_id, path::ADDRESSES],
            params,
            ObjectKind::Address,
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    pub async fn get_address(&self, account_id: &str, address_id: &str) -> Result<Address, CoinbaseError> {
        self.get_as(
            &[V2, path::ACCOUNTS, account_id, path::ADDRESSES, address_id],
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    /// Transactions received on one address.
    pub async fn get_address_transactions(
        &self,
        account_id: &str,
        address_id: &str,
        params: Option<&ListParams>,
    ) -> Result<ApiObject, CoinbaseError> {
        self.get_with_params(
            &[
                V2,
                path::ACCOUNTS,
                account_id,
                path::ADDRESSES,
                address_id,
                path::TRANSACTIONS,
            ],
            params,
            ObjectKind::Transaction,
            Some(AccountRef::new(account_id)),
        )
        .await
    }

    pub async fn create_address(
        &self,
        account_id: &str,
        request: &CreateAddressRequest,
    ) -> Result<Address, CoinbaseError> {
        self.post_as(
            &[V2, path::ACCOUNTS, account_id, path::ADDRESSES],
            request,
            Some(AccountRef::new(account_id)),
        )
        .await
    }
}
