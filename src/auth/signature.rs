//! HMAC-SHA256 signature generation for API-key authentication.
//!
//! Requests signed with an API key carry a signature computed as:
//! ```text
//! hex(HMAC-SHA256(timestamp + METHOD + path_and_query + body, api_secret))
//! ```
//!
//! The signature is sent in the `CB-ACCESS-SIGN` header, next to
//! `CB-ACCESS-KEY` and `CB-ACCESS-TIMESTAMP`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::auth::Credentials;
use crate::error::CoinbaseError;

type HmacSha256 = Hmac<Sha256>;

/// Sign a request.
///
/// # Arguments
///
/// * `credentials` - API credentials containing the secret
/// * `timestamp` - Seconds since the UNIX epoch, sent alongside the signature
/// * `method` - Upper-case HTTP method
/// * `path` - Request path including the query string (e.g. "/v2/accounts?limit=5")
/// * `body` - The raw request body, empty for bodiless requests
///
/// # Example
///
/// ```rust
/// use coinbase_api_client::auth::{Credentials, sign_request};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("api_key", "api_secret");
/// let signature = sign_request(&credentials, 1_700_000_000, "GET", "/v2/accounts", "")?;
/// assert_eq!(signature.len(), 64);
/// # Ok(())
/// # }
/// ```
pub fn sign_request(
    credentials: &Credentials,
    timestamp: u64,
    method: &str,
    path: &str,
    body: &str,
) -> Result<String, CoinbaseError> {
    let mut hmac = HmacSha256::new_from_slice(credentials.expose_secret().as_bytes())
        .map_err(|e| CoinbaseError::Auth(format!("Invalid HMAC key: {e}")))?;
    hmac.update(timestamp.to_string().as_bytes());
    hmac.update(method.as_bytes());
    hmac.update(path.as_bytes());
    hmac.update(body.as_bytes());

    Ok(hex::encode(hmac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_known_vector() {
        // hmac.new(b"secret", b"1GET/v2/user", hashlib.sha256).hexdigest()
        let credentials = Credentials::new("key", "secret");
        let signature = sign_request(&credentials, 1, "GET", "/v2/user", "").unwrap();

        let mut expected = HmacSha256::new_from_slice(b"secret").unwrap();
        expected.update(b"1GET/v2/user");
        assert_eq!(signature, hex::encode(expected.finalize().into_bytes()));
    }

    #[test]
    fn test_signature_is_hex_sha256() {
        let credentials = Credentials::new("key", "secret");
        let signature = sign_request(&credentials, 1_616_492_376, "POST", "/v2/accounts", "{}").unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_consistency() {
        let credentials = Credentials::new("key", "my_secret");
        let sig1 = sign_request(&credentials, 12345, "GET", "/v2/accounts?limit=5", "").unwrap();
        let sig2 = sign_request(&credentials, 12345, "GET", "/v2/accounts?limit=5", "").unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn test_signature_covers_every_part() {
        let credentials = Credentials::new("key", "my_secret");
        let base = sign_request(&credentials, 12345, "POST", "/v2/accounts", "{}").unwrap();

        assert_ne!(base, sign_request(&credentials, 12346, "POST", "/v2/accounts", "{}").unwrap());
        assert_ne!(base, sign_request(&credentials, 12345, "PUT", "/v2/accounts", "{}").unwrap());
        assert_ne!(base, sign_request(&credentials, 12345, "POST", "/v2/user", "{}").unwrap());
        assert_ne!(base, sign_request(&credentials, 12345, "POST", "/v2/accounts", "").unwrap());
    }
}
