//! Coinbase wallet REST API client.
//!
//! [`CoinbaseClient`] holds the transport, the request signer and the
//! materializer. Endpoints are grouped by resource:
//!
//! - data: currencies, exchange rates, prices, server time
//! - users and accounts (with their addresses)
//! - transactions and money requests
//! - buys, sells, deposits, withdrawals, payment methods
//! - merchant orders and checkouts
//! - reports and notifications
//! - OAuth token refresh and revocation
//!
//! Every call returns an [`ApiObject`](crate::model::ApiObject) or one of the
//! typed models in [`crate::model`].

mod accounts;
mod client;
mod data;
mod endpoints;
mod envelope;
mod merchant;
mod oauth;
mod pagination;
mod params;
mod reports;
mod transactions;
mod transfers;
mod users;

pub use client::{CoinbaseClient, CoinbaseClientBuilder};
pub use endpoints::*;
pub use params::*;
