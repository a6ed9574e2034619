//! Per-request authentication headers.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use secrecy::ExposeSecret;

use crate::auth::{CredentialsProvider, OAuthTokens, TimestampProvider, sign_request};
use crate::error::CoinbaseError;

pub const CB_ACCESS_KEY: HeaderName = HeaderName::from_static("cb-access-key");
pub const CB_ACCESS_SIGN: HeaderName = HeaderName::from_static("cb-access-sign");
pub const CB_ACCESS_TIMESTAMP: HeaderName = HeaderName::from_static("cb-access-timestamp");
pub const CB_VERSION: HeaderName = HeaderName::from_static("cb-version");

/// Produces the authentication headers of one request.
///
/// Called right before the request is sent, with the final path (query
/// string included) and the exact body bytes that go on the wire.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, method: &Method, path_and_query: &str, body: &str) -> Result<HeaderMap, CoinbaseError>;
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue, CoinbaseError> {
    HeaderValue::from_str(value)
        .map_err(|_| CoinbaseError::Auth(format!("{what} is not a valid header value")))
}

fn version_headers(api_version: &str) -> Result<HeaderMap, CoinbaseError> {
    let mut headers = HeaderMap::new();
    headers.insert(CB_VERSION, header_value(api_version, "API version")?);
    Ok(headers)
}

/// API key authentication with HMAC-SHA256 signatures.
pub struct HmacAuth {
    credentials: Arc<dyn CredentialsProvider>,
    timestamp: Arc<dyn TimestampProvider>,
    api_version: String,
}

impl HmacAuth {
    pub fn new(
        credentials: Arc<dyn CredentialsProvider>,
        timestamp: Arc<dyn TimestampProvider>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            timestamp,
            api_version: api_version.into(),
        }
    }
}

impl RequestSigner for HmacAuth {
    fn sign(&self, method: &Method, path_and_query: &str, body: &str) -> Result<HeaderMap, CoinbaseError> {
        let credentials = self.credentials.get_credentials();
        if !credentials.is_complete() {
            return Err(CoinbaseError::MissingCredentials);
        }

        let timestamp = self.timestamp.timestamp();
        let signature = sign_request(credentials, timestamp, method.as_str(), path_and_query, body)?;

        let mut headers = version_headers(&self.api_version)?;
        headers.insert(CB_ACCESS_KEY, header_value(&credentials.api_key, "API key")?);
        let mut signature = header_value(&signature, "signature")?;
        signature.set_sensitive(true);
        headers.insert(CB_ACCESS_SIGN, signature);
        headers.insert(CB_ACCESS_TIMESTAMP, HeaderValue::from(timestamp));
        Ok(headers)
    }
}

/// OAuth2 bearer-token authentication.
pub struct BearerAuth {
    tokens: Arc<OAuthTokens>,
    api_version: String,
}

impl BearerAuth {
    pub fn new(tokens: Arc<OAuthTokens>, api_version: impl Into<String>) -> Self {
        Self {
            tokens,
            api_version: api_version.into(),
        }
    }
}

impl RequestSigner for BearerAuth {
    fn sign(&self, _method: &Method, _path_and_query: &str, _body: &str) -> Result<HeaderMap, CoinbaseError> {
        let mut headers = version_headers(&self.api_version)?;
        let token = self.tokens.access_token();
        let mut bearer = header_value(&format!("Bearer {}", token.expose_secret()), "access token")?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }
}

/// Leaves requests unauthenticated apart from the version header.
pub struct NoAuth {
    api_version: String,
}

impl NoAuth {
    pub fn new(api_version: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
        }
    }
}

impl RequestSigner for NoAuth {
    fn sign(&self, _method: &Method, _path_and_query: &str, _body: &str) -> Result<HeaderMap, CoinbaseError> {
        version_headers(&self.api_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Credentials, FixedTimestamp, StaticCredentials};

    fn hmac_auth(key: &str, secret: &str) -> HmacAuth {
        HmacAuth::new(
            Arc::new(StaticCredentials::new(key, secret)),
            Arc::new(FixedTimestamp(1_500_000_000)),
            "2016-02-18",
        )
    }

    #[test]
    fn test_hmac_headers() {
        let headers = hmac_auth("key", "secret")
            .sign(&Method::POST, "/v2/accounts", r#"{"name":"x"}"#)
            .unwrap();

        let expected = sign_request(
            &Credentials::new("key", "secret"),
            1_500_000_000,
            "POST",
            "/v2/accounts",
            r#"{"name":"x"}"#,
        )
        .unwrap();

        assert_eq!(headers[CB_ACCESS_KEY], "key");
        assert_eq!(headers[CB_ACCESS_SIGN], expected.as_str());
        assert_eq!(headers[CB_ACCESS_TIMESTAMP], "1500000000");
        assert_eq!(headers[CB_VERSION], "2016-02-18");
        assert!(headers[CB_ACCESS_SIGN].is_sensitive());
    }

    #[test]
    fn test_hmac_requires_complete_credentials() {
        let result = hmac_auth("key", "").sign(&Method::GET, "/v2/user", "");
        assert!(matches!(result, Err(CoinbaseError::MissingCredentials)));
    }

    #[test]
    fn test_bearer_follows_token_replacement() {
        let tokens = Arc::new(OAuthTokens::new("first", "refresh").unwrap());
        let auth = BearerAuth::new(Arc::clone(&tokens), "2016-02-18");

        let headers = auth.sign(&Method::GET, "/v2/user", "").unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer first");

        tokens.replace("second", "refresh2");
        let headers = auth.sign(&Method::GET, "/v2/user", "").unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer second");
        assert_eq!(headers[CB_VERSION], "2016-02-18");
    }

    #[test]
    fn test_no_auth_only_versions() {
        let headers = NoAuth::new("2016-02-18").sign(&Method::GET, "/v2/time", "").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[CB_VERSION], "2016-02-18");
    }
}
