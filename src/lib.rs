//! # Coinbase Client
//!
//! An async Rust client library for the Coinbase wallet REST API (v2).
//!
//! ## Features
//!
//! - API key (HMAC-SHA256) and OAuth2 bearer authentication
//! - Responses decoded into [`ApiObject`] trees that remember their client,
//!   so objects can refresh and act on themselves
//! - Typed models (`Account`, `Buy`, `Order`, ...) over the same storage
//! - Structured API errors classified by server identifier and status
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coinbase_api_client::rest::CoinbaseClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CoinbaseClient::builder().build()?;
//!     let price = client.get_spot_price(None).await?;
//!     println!("Spot price: {price}");
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod model;
pub mod rest;

// Re-export commonly used types at crate root
pub use error::{ApiError, ApiErrorKind, CoinbaseError};
pub use model::{ApiObject, ApiValue, ObjectKind};
pub use rest::CoinbaseClient;

/// Result type alias using CoinbaseError
pub type Result<T> = std::result::Result<T, CoinbaseError>;
