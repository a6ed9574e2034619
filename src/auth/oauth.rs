//! OAuth2 bearer-token storage.

use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};

use crate::error::CoinbaseError;

/// An access/refresh token pair shared by every clone of a client.
///
/// A successful refresh replaces both tokens. Locks are never held across an
/// await point.
pub struct OAuthTokens {
    access_token: RwLock<SecretString>,
    refresh_token: RwLock<SecretString>,
}

impl OAuthTokens {
    /// Create a token pair. Both tokens must be non-empty.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<Self, CoinbaseError> {
        let access_token = access_token.into();
        let refresh_token = refresh_token.into();
        if access_token.is_empty() {
            return Err(CoinbaseError::MissingParameter("access_token".to_string()));
        }
        if refresh_token.is_empty() {
            return Err(CoinbaseError::MissingParameter("refresh_token".to_string()));
        }

        Ok(Self {
            access_token: RwLock::new(SecretString::from(access_token)),
            refresh_token: RwLock::new(SecretString::from(refresh_token)),
        })
    }

    pub fn access_token(&self) -> SecretString {
        let guard = self.access_token.read().unwrap_or_else(|e| e.into_inner());
        SecretString::from(guard.expose_secret().to_string())
    }

    pub fn refresh_token(&self) -> SecretString {
        let guard = self.refresh_token.read().unwrap_or_else(|e| e.into_inner());
        SecretString::from(guard.expose_secret().to_string())
    }

    /// Swap in a freshly issued pair.
    pub fn replace(&self, access_token: impl Into<String>, refresh_token: impl Into<String>) {
        let mut access = self.access_token.write().unwrap_or_else(|e| e.into_inner());
        *access = SecretString::from(access_token.into());
        drop(access);

        let mut refresh = self.refresh_token.write().unwrap_or_else(|e| e.into_inner());
        *refresh = SecretString::from(refresh_token.into());
    }
}

impl std::fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_tokens() {
        assert!(matches!(
            OAuthTokens::new("", "refresh"),
            Err(CoinbaseError::MissingParameter(name)) if name == "access_token"
        ));
        assert!(matches!(
            OAuthTokens::new("access", ""),
            Err(CoinbaseError::MissingParameter(name)) if name == "refresh_token"
        ));
    }

    #[test]
    fn test_replace() {
        let tokens = OAuthTokens::new("a1", "r1").unwrap();
        tokens.replace("a2", "r2");
        assert_eq!(tokens.access_token().expose_secret(), "a2");
        assert_eq!(tokens.refresh_token().expose_secret(), "r2");
    }

    #[test]
    fn test_debug_redacted() {
        let tokens = OAuthTokens::new("access_secret", "refresh_secret").unwrap();
        let debug_str = format!("{tokens:?}");
        assert!(!debug_str.contains("access_secret"));
        assert!(!debug_str.contains("refresh_secret"));
    }
}
