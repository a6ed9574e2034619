//! Request parameter types.
//!
//! Query parameters are URL-encoded onto GET requests, everything else is
//! sent as a JSON body. Optional fields that are `None` are left out of the
//! encoding entirely.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoinbaseError;

/// Currency pair used by the price endpoints when none is given.
pub const DEFAULT_CURRENCY_PAIR: &str = "BTC-USD";

/// Client-side checks run before a request is sent.
pub trait Validate {
    fn validate(&self) -> Result<(), CoinbaseError>;
}

fn require(name: &str, value: &str) -> Result<(), CoinbaseError> {
    if value.trim().is_empty() {
        return Err(CoinbaseError::MissingParameter(name.to_string()));
    }
    Ok(())
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

// ========== Queries ==========

/// Sort order of list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Cursor pagination parameters shared by every list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListParams {
    /// Number of results per page (server default 25, maximum 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    /// Return results after this resource id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<String>,
    /// Return results before this resource id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending_before: Option<String>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn starting_after(mut self, id: impl Into<String>) -> Self {
        self.starting_after = Some(id.into());
        self
    }

    pub fn ending_before(mut self, id: impl Into<String>) -> Self {
        self.ending_before = Some(id.into());
        self
    }
}

/// Parameters of the buy, sell, spot and historic price endpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceQuery {
    /// Pair in the URL path, such as `BTC-USD`. Not part of the query string.
    #[serde(skip)]
    pub currency_pair: Option<String>,
    /// Day of a spot price, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Range of historic prices, such as `day` or `week`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl PriceQuery {
    pub fn new(currency_pair: impl Into<String>) -> Self {
        Self {
            currency_pair: Some(currency_pair.into()),
            ..Self::default()
        }
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub(crate) fn pair(&self) -> &str {
        self.currency_pair
            .as_deref()
            .unwrap_or(DEFAULT_CURRENCY_PAIR)
    }
}

/// Base currency of the exchange-rates endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CurrencyQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl CurrencyQuery {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: Some(currency.into()),
        }
    }
}

// ========== Users & accounts ==========

/// Fields of the current user that can be changed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_currency: Option<String>,
}

impl UpdateUserRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    pub fn native_currency(mut self, currency: impl Into<String>) -> Self {
        self.native_currency = Some(currency.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAccountRequest {
    pub name: String,
}

impl CreateAccountRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Validate for CreateAccountRequest {
    fn validate(&self) -> Result<(), CoinbaseError> {
        require("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAccountRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateAccountRequest {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateAddressRequest {
    /// Label of the address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// URL notified when the address receives funds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl CreateAddressRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }
}

// ========== Transactions ==========

/// Kind of money movement created through the transactions endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Send,
    Transfer,
    Request,
}

/// Parameters of send, transfer and request money.
///
/// The `type` field is filled in by the endpoint method.
#[derive(Debug, Clone, Serialize)]
pub struct MoneyRequest {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) transaction_type: Option<TransactionType>,
    /// Recipient: an email, a crypto address or an account id.
    pub to: String,
    pub amount: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_notifications: Option<bool>,
    /// Miner fee for sends to crypto addresses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
    /// Idempotency token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_financial_institution: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_institution_website: Option<String>,
}

impl MoneyRequest {
    pub fn new(to: impl Into<String>, amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            transaction_type: None,
            to: to.into(),
            amount,
            currency: currency.into(),
            description: None,
            skip_notifications: None,
            fee: None,
            idem: None,
            to_financial_institution: None,
            financial_institution_website: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn skip_notifications(mut self, skip: bool) -> Self {
        self.skip_notifications = Some(skip);
        self
    }

    pub fn fee(mut self, fee: Decimal) -> Self {
        self.fee = Some(fee);
        self
    }

    pub fn idem(mut self, token: impl Into<String>) -> Self {
        self.idem = Some(token.into());
        self
    }

    pub(crate) fn with_type(&self, transaction_type: TransactionType) -> Self {
        let mut request = self.clone();
        request.transaction_type = Some(transaction_type);
        request
    }
}

impl Validate for MoneyRequest {
    fn validate(&self) -> Result<(), CoinbaseError> {
        require("to", &self.to)?;
        require("currency", &self.currency)
    }
}

// ========== Reports ==========

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportRequest {
    /// `transactions` or `transfers`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub report_type: Option<String>,
    /// Where the finished report is sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl ReportRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_type(mut self, report_type: impl Into<String>) -> Self {
        self.report_type = Some(report_type.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    pub fn callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }
}

impl Validate for ReportRequest {
    fn validate(&self) -> Result<(), CoinbaseError> {
        if !is_present(&self.report_type) && !is_present(&self.email) {
            return Err(CoinbaseError::MissingParameter("'type' or 'email'".to_string()));
        }
        Ok(())
    }
}

// ========== Buys & sells ==========

/// Parameters of a buy or a sell.
///
/// Either `amount` (in the account currency) or `total` (including fees, in
/// the payment currency) is required.
#[derive(Debug, Clone, Serialize)]
pub struct TradeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    pub currency: String,
    /// Payment method id. Required for buys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agree_btc_amount_varies: Option<bool>,
    /// Commit right away instead of returning a pending order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<bool>,
    /// Only return a quote, nothing is created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<bool>,
}

impl TradeRequest {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            amount: None,
            total: None,
            currency: currency.into(),
            payment_method: None,
            agree_btc_amount_varies: None,
            commit: None,
            quote: None,
        }
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn total(mut self, total: Decimal) -> Self {
        self.total = Some(total);
        self
    }

    pub fn payment_method(mut self, id: impl Into<String>) -> Self {
        self.payment_method = Some(id.into());
        self
    }

    pub fn agree_btc_amount_varies(mut self, agree: bool) -> Self {
        self.agree_btc_amount_varies = Some(agree);
        self
    }

    pub fn commit(mut self, commit: bool) -> Self {
        self.commit = Some(commit);
        self
    }

    pub fn quote(mut self, quote: bool) -> Self {
        self.quote = Some(quote);
        self
    }

    /// Checks a buy additionally needs on top of [`Validate::validate`].
    pub(crate) fn validate_buy(&self) -> Result<(), CoinbaseError> {
        self.validate()?;
        if !is_present(&self.payment_method) {
            return Err(CoinbaseError::MissingParameter("payment_method".to_string()));
        }
        Ok(())
    }
}

impl Validate for TradeRequest {
    fn validate(&self) -> Result<(), CoinbaseError> {
        if self.amount.is_none() && self.total.is_none() {
            return Err(CoinbaseError::MissingParameter("'amount' or 'total'".to_string()));
        }
        require("currency", &self.currency)
    }
}

// ========== Deposits & withdrawals ==========

/// Parameters of a deposit or a withdrawal.
#[derive(Debug, Clone, Serialize)]
pub struct FundsRequest {
    pub payment_method: String,
    pub amount: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<bool>,
}

impl FundsRequest {
    pub fn new(payment_method: impl Into<String>, amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            payment_method: payment_method.into(),
            amount,
            currency: currency.into(),
            commit: None,
        }
    }

    pub fn commit(mut self, commit: bool) -> Self {
        self.commit = Some(commit);
        self
    }
}

impl Validate for FundsRequest {
    fn validate(&self) -> Result<(), CoinbaseError> {
        require("payment_method", &self.payment_method)?;
        require("currency", &self.currency)
    }
}

// ========== Merchant ==========

/// Parameters of a merchant order or a checkout.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub amount: Decimal,
    pub currency: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `order` or `donation`; checkouts only.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_defined_amount: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_url: Option<String>,
    /// Free-form key/value pairs echoed back on the order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Checkouts take the same parameters as orders.
pub type CheckoutRequest = OrderRequest;

impl OrderRequest {
    pub fn new(amount: Decimal, currency: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            name: name.into(),
            description: None,
            order_type: None,
            style: None,
            customer_defined_amount: None,
            success_url: None,
            cancel_url: None,
            notifications_url: None,
            metadata: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn order_type(mut self, order_type: impl Into<String>) -> Self {
        self.order_type = Some(order_type.into());
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn customer_defined_amount(mut self, enabled: bool) -> Self {
        self.customer_defined_amount = Some(enabled);
        self
    }

    pub fn success_url(mut self, url: impl Into<String>) -> Self {
        self.success_url = Some(url.into());
        self
    }

    pub fn cancel_url(mut self, url: impl Into<String>) -> Self {
        self.cancel_url = Some(url.into());
        self
    }

    pub fn notifications_url(mut self, url: impl Into<String>) -> Self {
        self.notifications_url = Some(url.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

impl Validate for OrderRequest {
    fn validate(&self) -> Result<(), CoinbaseError> {
        require("currency", &self.currency)?;
        require("name", &self.name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RefundRequest {
    /// Currency the refund is issued in.
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mispayment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_address: Option<String>,
}

impl RefundRequest {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            mispayment: None,
            refund_address: None,
        }
    }

    pub fn mispayment(mut self, id: impl Into<String>) -> Self {
        self.mispayment = Some(id.into());
        self
    }

    pub fn refund_address(mut self, address: impl Into<String>) -> Self {
        self.refund_address = Some(address.into());
        self
    }
}

impl Validate for RefundRequest {
    fn validate(&self) -> Result<(), CoinbaseError> {
        require("currency", &self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn missing(result: Result<(), CoinbaseError>) -> String {
        match result {
            Err(CoinbaseError::MissingParameter(name)) => name,
            other => panic!("expected a missing parameter, got {other:?}"),
        }
    }

    #[test]
    fn test_list_params_query() {
        let params = ListParams::new().limit(5).order(SortOrder::Asc).starting_after("abc");
        assert_eq!(
            serde_urlencoded::to_string(&params).unwrap(),
            "limit=5&order=asc&starting_after=abc"
        );
        assert_eq!(serde_urlencoded::to_string(ListParams::new()).unwrap(), "");
    }

    #[test]
    fn test_price_query_pair_stays_out_of_query() {
        let query = PriceQuery::new("ETH-EUR").date("2016-01-01");
        assert_eq!(query.pair(), "ETH-EUR");
        assert_eq!(serde_urlencoded::to_string(&query).unwrap(), "date=2016-01-01");
        assert_eq!(PriceQuery::default().pair(), DEFAULT_CURRENCY_PAIR);
    }

    #[test]
    fn test_money_request_body() {
        let request = MoneyRequest::new("user@example.com", dec("0.1"), "BTC")
            .description("lunch")
            .with_type(TransactionType::Send);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "type": "send",
                "to": "user@example.com",
                "amount": "0.1",
                "currency": "BTC",
                "description": "lunch",
            })
        );
    }

    #[test]
    fn test_money_request_requires_recipient() {
        let request = MoneyRequest::new("", dec("1"), "BTC");
        assert_eq!(missing(request.validate()), "to");
        let request = MoneyRequest::new("a@b.c", dec("1"), " ");
        assert_eq!(missing(request.validate()), "currency");
    }

    #[test]
    fn test_trade_request_needs_amount_or_total() {
        let request = TradeRequest::new("BTC");
        assert_eq!(missing(request.validate()), "'amount' or 'total'");

        assert!(TradeRequest::new("BTC").total(dec("10")).validate().is_ok());

        let sell = TradeRequest::new("BTC").amount(dec("1"));
        assert!(sell.validate().is_ok());
        assert_eq!(missing(sell.validate_buy()), "payment_method");
        assert!(sell.payment_method("pm1").validate_buy().is_ok());
    }

    #[test]
    fn test_report_needs_type_or_email() {
        assert_eq!(missing(ReportRequest::new().validate()), "'type' or 'email'");
        assert!(ReportRequest::new().email("a@b.c").validate().is_ok());
        assert!(ReportRequest::new().report_type("transactions").validate().is_ok());
    }

    #[test]
    fn test_order_and_refund_requirements() {
        assert_eq!(missing(OrderRequest::new(dec("1"), "USD", "").validate()), "name");
        assert!(OrderRequest::new(dec("1"), "USD", "Shirt").validate().is_ok());
        assert_eq!(missing(RefundRequest::new("").validate()), "currency");
    }

    #[test]
    fn test_order_metadata() {
        let request = OrderRequest::new(dec("10.00"), "USD", "Shirt").metadata("sku", "s-1");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["metadata"]["sku"], "s-1");
        assert_eq!(body["amount"], "10.00");
        assert!(body.get("description").is_none());
    }
}
