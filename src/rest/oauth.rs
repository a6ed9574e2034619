//! OAuth2 token maintenance for clients built with [`OAuthTokens`].
//!
//! [`OAuthTokens`]: crate::auth::OAuthTokens

use reqwest::Method;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;

use crate::error::CoinbaseError;
use crate::model::{ApiObject, MaterializeOptions, ObjectKind};
use crate::rest::endpoints::oauth_path;
use crate::rest::CoinbaseClient;

#[derive(Serialize)]
struct RevokeBody<'a> {
    token: &'a str,
}

fn token_field<'a>(blob: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    blob.get(key)
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
}

impl CoinbaseClient {
    /// Exchange the refresh token for a new token pair.
    ///
    /// Both tokens are replaced in the store shared by every clone of this
    /// client. The full token answer (`expires_in`, `scope`, ...) is returned.
    pub async fn refresh(&self) -> Result<ApiObject, CoinbaseError> {
        let tokens = self.oauth_tokens().ok_or(CoinbaseError::MissingCredentials)?;

        let mut url = self.endpoint(&[oauth_path::OAUTH, oauth_path::TOKEN])?;
        url.query_pairs_mut()
            .append_pair("grant_type", "refresh_token")
            .append_pair("refresh_token", tokens.refresh_token().expose_secret());

        let raw = self.send(Method::POST, url, None).await?;
        let blob: Value = serde_json::from_str(&raw.body)?;
        let Value::Object(blob) = blob else {
            return Err(CoinbaseError::TokenRefresh(
                "token answer is not a JSON object".to_string(),
            ));
        };

        match (token_field(&blob, "access_token"), token_field(&blob, "refresh_token")) {
            (Some(access), Some(refresh)) => tokens.replace(access, refresh),
            _ => {
                return Err(CoinbaseError::TokenRefresh(
                    "answer is missing 'access_token' or 'refresh_token'".to_string(),
                ));
            }
        }
        tracing::debug!("oauth token pair refreshed");

        Ok(self.materializer().materialize_object(
            blob,
            None,
            MaterializeOptions::new().kind(ObjectKind::Generic),
        ))
    }

    /// Revoke the current access token. The client is unusable afterwards.
    pub async fn revoke(&self) -> Result<(), CoinbaseError> {
        let tokens = self.oauth_tokens().ok_or(CoinbaseError::MissingCredentials)?;
        let access = tokens.access_token();
        let body = serde_json::to_string(&RevokeBody {
            token: access.expose_secret(),
        })?;

        let url = self.endpoint(&[oauth_path::OAUTH, oauth_path::REVOKE])?;
        self.send(Method::POST, url, Some(body)).await?;
        Ok(())
    }
}
