//! Merchant endpoints: merchant profiles, orders and checkouts.

use crate::error::CoinbaseError;
use crate::model::{ApiObject, Checkout, Merchant, ObjectKind, Order};
use crate::rest::endpoints::{V2, path};
use crate::rest::params::{CheckoutRequest, ListParams, OrderRequest, RefundRequest, Validate};
use crate::rest::CoinbaseClient;

impl CoinbaseClient {
    pub async fn get_merchant(&self, merchant_id: &str) -> Result<Merchant, CoinbaseError> {
        self.get_as(&[V2, path::MERCHANTS, merchant_id], None).await
    }

    // ========== Orders ==========

    pub async fn get_orders(&self, params: Option<&ListParams>) -> Result<ApiObject, CoinbaseError> {
        self.get_with_params(&[V2, path::ORDERS], params, ObjectKind::Order, None)
            .await
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Order, CoinbaseError> {
        self.get_as(&[V2, path::ORDERS, order_id], None).await
    }

    pub async fn create_order(&self, request: &OrderRequest) -> Result<Order, CoinbaseError> {
        request.validate()?;
        self.post_as(&[V2, path::ORDERS], request, None).await
    }

    /// Refund a paid order, in the order currency or in bitcoin.
    pub async fn refund_order(&self, order_id: &str, request: &RefundRequest) -> Result<Order, CoinbaseError> {
        request.validate()?;
        self.post_as(&[V2, path::ORDERS, order_id, path::REFUND], request, None)
            .await
    }

    // ========== Checkouts ==========

    pub async fn get_checkouts(&self, params: Option<&ListParams>) -> Result<ApiObject, CoinbaseError> {
        self.get_with_params(&[V2, path::CHECKOUTS], params, ObjectKind::Checkout, None)
            .await
    }

    pub async fn get_checkout(&self, checkout_id: &str) -> Result<Checkout, CoinbaseError> {
        self.get_as(&[V2, path::CHECKOUTS, checkout_id], None).await
    }

    pub async fn create_checkout(&self, request: &CheckoutRequest) -> Result<Checkout, CoinbaseError> {
        request.validate()?;
        self.post_as(&[V2, path::CHECKOUTS], request, None).await
    }

    /// Orders placed through one checkout.
    pub async fn get_checkout_orders(
        &self,
        checkout_id: &str,
        params: Option<&ListParams>,
    ) -> Result<ApiObject, CoinbaseError> {
        self.get_with_params(
            &[V2, path::CHECKOUTS, checkout_id, path::ORDERS],
            params,
            ObjectKind::Order,
            None,
        )
        .await
    }

    pub async fn create_checkout_order(&self, checkout_id: &str) -> Result<Order, CoinbaseError> {
        self.post_empty_as(&[V2, path::CHECKOUTS, checkout_id, path::ORDERS], None)
            .await
    }
}
