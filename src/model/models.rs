//! Typed views over [`ApiObject`] for the resources the API returns.
//!
//! Every model is a thin newtype. It derefs to the underlying object, so
//! mapping-style access keeps working, and adds typed accessors that read the
//! same storage. Conversion from an [`ApiObject`] checks the kind hierarchy:
//! a `Buy` converts into a `Transfer`, a `Transfer` never converts into a `Buy`.

use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::error::CoinbaseError;
use crate::model::value::SortedKeys;
use crate::model::{AccountRef, ApiObject, ApiValue, ObjectKind};
use crate::rest::{
    CoinbaseClient, CreateAddressRequest, FundsRequest, ListParams, MoneyRequest, RefundRequest,
    ReportRequest, TradeRequest, UpdateAccountRequest, UpdateUserRequest,
};

/// A typed model over an [`ApiObject`] of a known kind.
pub trait ApiModel: TryFrom<ApiObject, Error = CoinbaseError> + Into<ApiObject> {
    /// The kind this model accepts, subtypes included.
    const KIND: ObjectKind;
}

macro_rules! api_model {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq)]
        pub struct $name(ApiObject);

        impl $name {
            pub fn into_inner(self) -> ApiObject {
                self.0
            }
        }

        impl ApiModel for $name {
            const KIND: ObjectKind = ObjectKind::$kind;
        }

        impl Deref for $name {
            type Target = ApiObject;

            fn deref(&self) -> &ApiObject {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut ApiObject {
                &mut self.0
            }
        }

        impl TryFrom<ApiObject> for $name {
            type Error = CoinbaseError;

            fn try_from(obj: ApiObject) -> Result<Self, Self::Error> {
                if obj.kind().is_a(ObjectKind::$kind) {
                    Ok(Self(obj))
                } else {
                    Err(CoinbaseError::UnexpectedDataFormat {
                        expected: ObjectKind::$kind,
                        found: obj.kind(),
                    })
                }
            }
        }

        impl From<$name> for ApiObject {
            fn from(model: $name) -> ApiObject {
                model.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.0.serialize(serializer)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }
    };
}

macro_rules! display_as_object {
    ($($name:ident),* $(,)?) => {
        $(
            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    std::fmt::Display::fmt(&self.0, f)
                }
            }
        )*
    };
}

macro_rules! str_accessors {
    ($($name:ident => $key:literal),* $(,)?) => {
        $(
            pub fn $name(&self) -> Option<&str> {
                self.0.str_field($key)
            }
        )*
    };
}

macro_rules! object_accessors {
    ($($name:ident => $key:literal),* $(,)?) => {
        $(
            pub fn $name(&self) -> Option<&ApiObject> {
                self.0.get($key).and_then(ApiValue::as_object)
            }
        )*
    };
}

macro_rules! bool_accessors {
    ($($name:ident => $key:literal),* $(,)?) => {
        $(
            pub fn $name(&self) -> Option<bool> {
                self.0.get($key).and_then(ApiValue::as_bool)
            }
        )*
    };
}

api_model!(
    /// A wallet or vault holding one currency.
    Account => Account
);
api_model!(
    /// A receive address of an account.
    Address => Address
);
api_model!(
    /// An amount of a currency, such as a balance or a price.
    Money => Money
);
api_model!(Transaction => Transaction);
api_model!(
    /// A funds movement that may need a separate commit step.
    Transfer => Transfer
);
api_model!(Buy => Buy);
api_model!(Sell => Sell);
api_model!(Deposit => Deposit);
api_model!(Withdrawal => Withdrawal);
api_model!(User => User);
api_model!(
    /// The authenticated user.
    CurrentUser => CurrentUser
);
api_model!(PaymentMethod => PaymentMethod);
api_model!(Merchant => Merchant);
api_model!(
    /// A merchant order.
    Order => Order
);
api_model!(Checkout => Checkout);
api_model!(Notification => Notification);
api_model!(Report => Report);

display_as_object!(
    Account,
    Address,
    Transaction,
    Transfer,
    Buy,
    Sell,
    Deposit,
    Withdrawal,
    User,
    CurrentUser,
    PaymentMethod,
    Merchant,
    Order,
    Checkout,
    Notification,
    Report,
);

/// Client and id needed to address an object's own endpoints.
fn handle(obj: &ApiObject) -> Result<(CoinbaseClient, String), CoinbaseError> {
    let client = obj.require_client()?.clone();
    let id = obj
        .id()
        .ok_or_else(|| CoinbaseError::AttributeNotFound("id".to_string()))?
        .to_string();
    Ok((client, id))
}

fn resource_path(obj: &ApiObject) -> Result<String, CoinbaseError> {
    obj.resource_path()
        .map(str::to_string)
        .ok_or_else(|| CoinbaseError::AttributeNotFound("resource_path".to_string()))
}

impl Account {
    str_accessors! {
        name => "name",
        account_type => "type",
        currency_code => "currency",
        created_at => "created_at",
        updated_at => "updated_at",
    }
    object_accessors! {
        balance => "balance",
        native_balance => "native_balance",
    }
    bool_accessors! {
        primary => "primary",
    }

    /// Reference to this account for account-scoped endpoints.
    pub fn account_ref(&self) -> Option<AccountRef> {
        self.id().map(AccountRef::new)
    }

    /// Make this the primary account and merge the answer into `self`.
    pub async fn set_primary(&mut self) -> Result<Account, CoinbaseError> {
        let (client, id) = handle(self)?;
        let fresh = client.set_primary_account(&id).await?;
        self.update(fresh.clone().into_inner());
        Ok(fresh)
    }

    /// Update this account and merge the answer into `self`.
    pub async fn modify(&mut self, request: &UpdateAccountRequest) -> Result<Account, CoinbaseError> {
        let (client, id) = handle(self)?;
        let fresh = client.update_account(&id, request).await?;
        self.update(fresh.clone().into_inner());
        Ok(fresh)
    }

    pub async fn delete(&self) -> Result<(), CoinbaseError> {
        let (client, id) = handle(self)?;
        client.delete_account(&id).await
    }

    // Addresses

    pub async fn get_addresses(&self, params: Option<&ListParams>) -> Result<ApiObject, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_addresses(&id, params).await
    }

    pub async fn get_address(&self, address_id: &str) -> Result<Address, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_address(&id, address_id).await
    }

    pub async fn get_address_transactions(
        &self,
        address_id: &str,
        params: Option<&ListParams>,
    ) -> Result<ApiObject, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_address_transactions(&id, address_id, params).await
    }

    pub async fn create_address(&self, request: &CreateAddressRequest) -> Result<Address, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.create_address(&id, request).await
    }

    // Transactions

    pub async fn get_transactions(&self, params: Option<&ListParams>) -> Result<ApiObject, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_transactions(&id, params).await
    }

    pub async fn get_transaction(&self, transaction_id: &str) -> Result<Transaction, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_transaction(&id, transaction_id).await
    }

    pub async fn send_money(&self, request: &MoneyRequest) -> Result<Transaction, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.send_money(&id, request).await
    }

    pub async fn transfer_money(&self, request: &MoneyRequest) -> Result<Transaction, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.transfer_money(&id, request).await
    }

    pub async fn request_money(&self, request: &MoneyRequest) -> Result<Transaction, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.request_money(&id, request).await
    }

    // Reports are user-wide; these forward to the client.

    pub async fn get_reports(&self, params: Option<&ListParams>) -> Result<ApiObject, CoinbaseError> {
        self.require_client()?.get_reports(params).await
    }

    pub async fn get_report(&self, report_id: &str) -> Result<Report, CoinbaseError> {
        self.require_client()?.get_report(report_id).await
    }

    pub async fn create_report(&self, request: &ReportRequest) -> Result<Report, CoinbaseError> {
        self.require_client()?.create_report(request).await
    }

    // Buys

    pub async fn get_buys(&self, params: Option<&ListParams>) -> Result<ApiObject, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_buys(&id, params).await
    }

    pub async fn get_buy(&self, buy_id: &str) -> Result<Buy, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_buy(&id, buy_id).await
    }

    pub async fn buy(&self, request: &TradeRequest) -> Result<Buy, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.buy(&id, request).await
    }

    pub async fn commit_buy(&self, buy_id: &str) -> Result<Buy, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.commit_buy(&id, buy_id).await
    }

    // Sells

    pub async fn get_sells(&self, params: Option<&ListParams>) -> Result<ApiObject, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_sells(&id, params).await
    }

    pub async fn get_sell(&self, sell_id: &str) -> Result<Sell, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_sell(&id, sell_id).await
    }

    pub async fn sell(&self, request: &TradeRequest) -> Result<Sell, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.sell(&id, request).await
    }

    pub async fn commit_sell(&self, sell_id: &str) -> Result<Sell, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.commit_sell(&id, sell_id).await
    }

    // Deposits

    pub async fn get_deposits(&self, params: Option<&ListParams>) -> Result<ApiObject, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_deposits(&id, params).await
    }

    pub async fn get_deposit(&self, deposit_id: &str) -> Result<Deposit, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_deposit(&id, deposit_id).await
    }

    pub async fn deposit(&self, request: &FundsRequest) -> Result<Deposit, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.deposit(&id, request).await
    }

    pub async fn commit_deposit(&self, deposit_id: &str) -> Result<Deposit, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.commit_deposit(&id, deposit_id).await
    }

    // Withdrawals

    pub async fn get_withdrawals(&self, params: Option<&ListParams>) -> Result<ApiObject, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_withdrawals(&id, params).await
    }

    pub async fn get_withdrawal(&self, withdrawal_id: &str) -> Result<Withdrawal, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_withdrawal(&id, withdrawal_id).await
    }

    pub async fn withdraw(&self, request: &FundsRequest) -> Result<Withdrawal, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.withdraw(&id, request).await
    }

    pub async fn commit_withdrawal(&self, withdrawal_id: &str) -> Result<Withdrawal, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.commit_withdrawal(&id, withdrawal_id).await
    }
}

impl Address {
    str_accessors! {
        address => "address",
        name => "name",
        network => "network",
        callback_url => "callback_url",
        created_at => "created_at",
    }
}

impl Money {
    str_accessors! {
        currency => "currency",
    }

    /// The amount as sent by the server, without reformatting.
    pub fn amount(&self) -> Option<&str> {
        self.0.str_field("amount")
    }

    /// The amount parsed as an exact decimal.
    ///
    /// Accepts both string and numeric amounts. Returns `None` when the
    /// amount is absent or not a decimal number.
    pub fn amount_decimal(&self) -> Option<Decimal> {
        match self.0.get("amount")? {
            ApiValue::String(s) => Decimal::from_str(s).ok(),
            ApiValue::Number(n) => Decimal::from_str(&n.to_string()).ok(),
            _ => None,
        }
    }

    fn has_extra_keys(&self) -> bool {
        self.0.keys().any(|key| key != "amount" && key != "currency")
    }
}

fn plain_text(value: Option<&ApiValue>) -> String {
    match value {
        Some(ApiValue::String(s)) => s.clone(),
        Some(ApiValue::Null) | None => String::new(),
        Some(other) => other.to_json().to_string(),
    }
}

/// `"<currency> <amount>"`, followed by the whole object when it carries more
/// than those two keys.
impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let currency = plain_text(self.0.get("currency"));
        let amount = plain_text(self.0.get("amount"));
        if !self.has_extra_keys() {
            return write!(f, "{currency} {amount}");
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        SortedKeys(&ApiValue::Object(self.0.clone()))
            .serialize(&mut serializer)
            .map_err(|_| std::fmt::Error)?;
        let dump = String::from_utf8(buf).map_err(|_| std::fmt::Error)?;
        write!(f, "{currency} {amount} {dump}")
    }
}

impl Transaction {
    str_accessors! {
        status => "status",
        transaction_type => "type",
        description => "description",
        created_at => "created_at",
        updated_at => "updated_at",
    }
    object_accessors! {
        amount => "amount",
        native_amount => "native_amount",
        to => "to",
        from => "from",
        network => "network",
    }

    async fn request_action(&self, action: &str) -> Result<ApiObject, CoinbaseError> {
        let client = self.require_client()?.clone();
        let path = format!("{}/{action}", resource_path(self)?);
        client
            .post_at_path(&path, ObjectKind::Generic, self.account())
            .await
    }

    /// Complete a money request.
    pub async fn complete(&self) -> Result<ApiObject, CoinbaseError> {
        self.request_action("complete").await
    }

    /// Re-send the email of a money request.
    pub async fn resend(&self) -> Result<ApiObject, CoinbaseError> {
        self.request_action("resend").await
    }

    /// Cancel a money request.
    pub async fn cancel(&self) -> Result<ApiObject, CoinbaseError> {
        self.request_action("cancel").await
    }
}

/// POST `<resource_path>/commit` and merge the answer into `obj`.
async fn commit_object(obj: &mut ApiObject) -> Result<ApiObject, CoinbaseError> {
    let client = obj.require_client()?.clone();
    let path = format!("{}/commit", resource_path(obj)?);
    let fresh = client.post_at_path(&path, obj.kind(), obj.account()).await?;
    obj.update(fresh.clone());
    Ok(fresh)
}

macro_rules! transfer_like {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                str_accessors! {
                    status => "status",
                    payout_at => "payout_at",
                    created_at => "created_at",
                }
                object_accessors! {
                    amount => "amount",
                    total => "total",
                    subtotal => "subtotal",
                    fee => "fee",
                    payment_method => "payment_method",
                    transaction => "transaction",
                }
                bool_accessors! {
                    committed => "committed",
                    instant => "instant",
                }

                /// Commit this pending transfer and merge the answer into `self`.
                pub async fn commit(&mut self) -> Result<$name, CoinbaseError> {
                    let fresh = commit_object(&mut self.0).await?;
                    $name::try_from(fresh)
                }
            }
        )*
    };
}

transfer_like!(Transfer, Buy, Sell, Deposit, Withdrawal);

macro_rules! user_like {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                str_accessors! {
                    name => "name",
                    username => "username",
                    profile_location => "profile_location",
                    profile_bio => "profile_bio",
                    profile_url => "profile_url",
                    avatar_url => "avatar_url",
                }
            }
        )*
    };
}

user_like!(User, CurrentUser);

impl CurrentUser {
    str_accessors! {
        email => "email",
        time_zone => "time_zone",
        native_currency => "native_currency",
        country_code => "country",
    }

    /// Update the authenticated user and merge the answer into `self`.
    pub async fn modify(&mut self, request: &UpdateUserRequest) -> Result<CurrentUser, CoinbaseError> {
        let client = self.require_client()?.clone();
        let fresh = client.update_current_user(request).await?;
        self.update(fresh.clone().into_inner());
        Ok(fresh)
    }
}

impl PaymentMethod {
    str_accessors! {
        name => "name",
        method_type => "type",
        currency => "currency",
    }
    bool_accessors! {
        primary_buy => "primary_buy",
        primary_sell => "primary_sell",
        allow_buy => "allow_buy",
        allow_sell => "allow_sell",
        allow_deposit => "allow_deposit",
        allow_withdraw => "allow_withdraw",
        instant_buy => "instant_buy",
        instant_sell => "instant_sell",
    }
}

impl Merchant {
    str_accessors! {
        name => "name",
        website_url => "website_url",
        avatar_url => "avatar_url",
    }
}

impl Order {
    str_accessors! {
        code => "code",
        status => "status",
        order_type => "type",
        name => "name",
        description => "description",
        receipt_url => "receipt_url",
        bitcoin_address => "bitcoin_address",
    }
    object_accessors! {
        amount => "amount",
        bitcoin_amount => "bitcoin_amount",
        total_amount_received => "total_amount_received",
        metadata => "metadata",
    }

    /// Refund this order and merge the answer into `self`.
    pub async fn refund(&mut self, request: &RefundRequest) -> Result<Order, CoinbaseError> {
        let (client, id) = handle(self)?;
        let fresh = client.refund_order(&id, request).await?;
        self.update(fresh.clone().into_inner());
        Ok(fresh)
    }
}

impl Checkout {
    str_accessors! {
        name => "name",
        description => "description",
        embed_code => "embed_code",
        checkout_type => "type",
        style => "style",
    }
    object_accessors! {
        amount => "amount",
        metadata => "metadata",
    }

    pub async fn get_orders(&self, params: Option<&ListParams>) -> Result<ApiObject, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.get_checkout_orders(&id, params).await
    }

    /// Create a new order from this checkout.
    pub async fn create_order(&self) -> Result<Order, CoinbaseError> {
        let (client, id) = handle(self)?;
        client.create_checkout_order(&id).await
    }
}

impl Notification {
    str_accessors! {
        notification_type => "type",
        created_at => "created_at",
    }
    object_accessors! {
        data => "data",
        additional_data => "additional_data",
        user => "user",
        account_info => "account",
    }
}

impl Report {
    str_accessors! {
        status => "status",
        report_type => "type",
        email => "email",
        file_url => "file_url",
        start_date => "start_date",
        end_date => "end_date",
    }
}
