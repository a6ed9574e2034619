//! Coinbase REST API endpoint constants.

/// Base URL for the Coinbase REST API.
pub const COINBASE_BASE_URL: &str = "https://api.coinbase.com/";

/// Value of the `CB-VERSION` header sent when none is configured.
pub const DEFAULT_API_VERSION: &str = "2016-02-18";

/// API version prefix of every resource path.
pub const V2: &str = "v2";

/// Path segments below [`V2`].
pub mod path {
    // Data
    pub const CURRENCIES: &str = "currencies";
    pub const EXCHANGE_RATES: &str = "exchange-rates";
    pub const PRICES: &str = "prices";
    pub const TIME: &str = "time";

    // Users
    pub const USERS: &str = "users";
    pub const USER: &str = "user";
    pub const AUTH: &str = "auth";

    // Accounts
    pub const ACCOUNTS: &str = "accounts";
    pub const PRIMARY: &str = "primary";
    pub const ADDRESSES: &str = "addresses";
    pub const TRANSACTIONS: &str = "transactions";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const REPORTS: &str = "reports";

    // Transfers
    pub const BUYS: &str = "buys";
    pub const SELLS: &str = "sells";
    pub const DEPOSITS: &str = "deposits";
    pub const WITHDRAWALS: &str = "withdrawals";
    pub const COMMIT: &str = "commit";
    pub const PAYMENT_METHODS: &str = "payment-methods";

    // Merchant
    pub const MERCHANTS: &str = "merchants";
    pub const ORDERS: &str = "orders";
    pub const REFUND: &str = "refund";
    pub const CHECKOUTS: &str = "checkouts";

    // Money requests
    pub const COMPLETE: &str = "complete";
    pub const RESEND: &str = "resend";
    pub const CANCEL: &str = "cancel";
}

/// OAuth endpoints. These live outside the [`V2`] prefix.
pub mod oauth_path {
    pub const OAUTH: &str = "oauth";
    pub const TOKEN: &str = "token";
    pub const REVOKE: &str = "revoke";
}
