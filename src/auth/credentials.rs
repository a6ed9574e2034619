//! API key and secret used by HMAC request signing.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::error::CoinbaseError;

pub const API_KEY_VAR: &str = "COINBASE_API_KEY";
pub const API_SECRET_VAR: &str = "COINBASE_API_SECRET";

/// An API key and its secret.
///
/// The key travels in `CB-ACCESS-KEY` on every signed request. The secret
/// never leaves the process; it only keys the `CB-ACCESS-SIGN` HMAC.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    api_secret: SecretString,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// The raw secret, for computing signatures.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }

    /// Both the key and the secret are non-empty. Signing refuses anything less.
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Source of the credentials an [`HmacAuth`](crate::auth::HmacAuth) signer
/// reads on every request.
///
/// Implement it to pull keys from a vault or to rotate them without
/// rebuilding the client.
pub trait CredentialsProvider: Send + Sync {
    fn get_credentials(&self) -> &Credentials;
}

impl<P: CredentialsProvider + ?Sized> CredentialsProvider for Arc<P> {
    fn get_credentials(&self) -> &Credentials {
        (**self).get_credentials()
    }
}

/// A fixed key pair.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(api_key, api_secret),
        }
    }
}

impl From<Credentials> for StaticCredentials {
    fn from(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// A key pair read once from the environment.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    credentials: Credentials,
}

impl EnvCredentials {
    /// Read [`API_KEY_VAR`] and [`API_SECRET_VAR`].
    pub fn from_env() -> Result<Self, CoinbaseError> {
        Self::from_env_vars(API_KEY_VAR, API_SECRET_VAR)
    }

    /// Read the key and secret from the given variables.
    ///
    /// A variable that is unset, empty or not valid unicode yields
    /// [`CoinbaseError::MissingParameter`] naming that variable.
    pub fn from_env_vars(key_var: &str, secret_var: &str) -> Result<Self, CoinbaseError> {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|value| !value.is_empty())
                .ok_or_else(|| CoinbaseError::MissingParameter(name.to_string()))
        };
        let credentials = Credentials::new(read(key_var)?, read(secret_var)?);
        Ok(Self { credentials })
    }
}

impl CredentialsProvider for EnvCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::new("my_key", "super_secret");
        let debug_str = format!("{:?}", StaticCredentials::from(creds));
        assert!(debug_str.contains("my_key"));
        assert!(!debug_str.contains("super_secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_static_credentials() {
        let provider = StaticCredentials::new("key", "secret");
        let creds = provider.get_credentials();
        assert_eq!(creds.api_key, "key");
        assert_eq!(creds.expose_secret(), "secret");
        assert!(creds.is_complete());
        assert!(!Credentials::new("key", "").is_complete());
        assert!(!Credentials::new("", "secret").is_complete());
    }

    #[test]
    fn test_provider_behind_arc() {
        let provider: Arc<dyn CredentialsProvider> = Arc::new(StaticCredentials::new("key", "secret"));
        let shared = Arc::new(provider);
        assert_eq!(shared.get_credentials().api_key, "key");
    }

    #[test]
    fn test_env_credentials_name_missing_variable() {
        match EnvCredentials::from_env_vars(
            "COINBASE_TEST_UNSET_KEY_VAR",
            "COINBASE_TEST_UNSET_SECRET_VAR",
        ) {
            Err(CoinbaseError::MissingParameter(name)) => {
                assert_eq!(name, "COINBASE_TEST_UNSET_KEY_VAR");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
