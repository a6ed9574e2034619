//! Authentication module for the Coinbase API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Timestamps for signed requests
//! - HMAC-SHA256 signature generation for API-key requests
//! - OAuth2 bearer tokens
//! - The [`RequestSigner`] hook that attaches all of the above to a request

mod credentials;
mod oauth;
mod signature;
mod signer;
mod timestamp;

pub use credentials::{
    API_KEY_VAR, API_SECRET_VAR, Credentials, CredentialsProvider, EnvCredentials,
    StaticCredentials,
};
pub use oauth::OAuthTokens;
pub use signature::sign_request;
pub use signer::{
    BearerAuth, CB_ACCESS_KEY, CB_ACCESS_SIGN, CB_ACCESS_TIMESTAMP, CB_VERSION, HmacAuth, NoAuth,
    RequestSigner,
};
pub use timestamp::{FixedTimestamp, SystemTimestamp, TimestampProvider};
