//! Error types for the Coinbase client library.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::model::ObjectKind;

/// The main error type for all Coinbase client operations.
#[derive(Error, Debug)]
pub enum CoinbaseError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// The API answered with an error status or a malformed envelope
    #[error("Coinbase API error: {0}")]
    Api(ApiError),

    /// The response parsed, but not into the kind of object the endpoint returns
    #[error("Unexpected data format: expected {expected}, found {found}")]
    UnexpectedDataFormat {
        /// Kind the caller asked for
        expected: ObjectKind,
        /// Kind the materializer produced
        found: ObjectKind,
    },

    /// A required request parameter was not supplied
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// A request parameter could not be encoded
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Missing required credentials
    #[error("Missing credentials: an API key and secret or an OAuth token pair is required")]
    MissingCredentials,

    /// The OAuth token refresh did not yield a usable token pair
    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    /// An object method needed a client, but the object was built without one
    #[error("Object is not attached to a client")]
    DetachedObject,

    /// Mapping-style lookup of a key that is not present
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Attribute-style lookup of a field that is not present
    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),
}

impl CoinbaseError {
    /// The structured API error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            CoinbaseError::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Category of a server-reported error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    TwoFactorRequired,
    ParamRequired,
    Validation,
    InvalidRequest,
    PersonalDetailsRequired,
    Authentication,
    UnverifiedEmail,
    InvalidToken,
    RevokedToken,
    ExpiredToken,
    InvalidScope,
    NotFound,
    RateLimitExceeded,
    InternalServer,
    ServiceUnavailable,
    /// Anything neither the identifier nor the status code maps
    Generic,
}

impl ApiErrorKind {
    /// Map a server error identifier (e.g. `"expired_token"`).
    pub fn from_error_id(id: &str) -> Option<Self> {
        let kind = match id {
            error_ids::TWO_FACTOR_REQUIRED => Self::TwoFactorRequired,
            error_ids::PARAM_REQUIRED => Self::ParamRequired,
            error_ids::VALIDATION_ERROR => Self::Validation,
            error_ids::INVALID_REQUEST => Self::InvalidRequest,
            error_ids::PERSONAL_DETAILS_REQUIRED => Self::PersonalDetailsRequired,
            error_ids::AUTHENTICATION_ERROR => Self::Authentication,
            error_ids::UNVERIFIED_EMAIL => Self::UnverifiedEmail,
            error_ids::INVALID_TOKEN => Self::InvalidToken,
            error_ids::REVOKED_TOKEN => Self::RevokedToken,
            error_ids::EXPIRED_TOKEN => Self::ExpiredToken,
            error_ids::INVALID_SCOPE => Self::InvalidScope,
            error_ids::NOT_FOUND => Self::NotFound,
            error_ids::RATE_LIMIT_EXCEEDED => Self::RateLimitExceeded,
            error_ids::INTERNAL_SERVER_ERROR => Self::InternalServer,
            _ => return None,
        };
        Some(kind)
    }

    /// Map an HTTP status code.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        let kind = match status.as_u16() {
            400 => Self::InvalidRequest,
            401 => Self::Authentication,
            402 => Self::TwoFactorRequired,
            403 => Self::InvalidScope,
            404 => Self::NotFound,
            422 => Self::Validation,
            429 => Self::RateLimitExceeded,
            500 => Self::InternalServer,
            503 => Self::ServiceUnavailable,
            _ => return None,
        };
        Some(kind)
    }

    /// Classify an error. The identifier wins over the status code.
    pub fn classify(id: Option<&str>, status: StatusCode) -> Self {
        id.and_then(Self::from_error_id)
            .or_else(|| Self::from_status(status))
            .unwrap_or(Self::Generic)
    }

    /// True for the authentication family, token errors included.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            Self::Authentication | Self::InvalidToken | Self::RevokedToken | Self::ExpiredToken
        )
    }
}

/// One entry of the `errors` array in an error body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// An error reported by the Coinbase API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status of the response that carried the error
    pub status: StatusCode,
    /// Server error identifier (e.g. `"validation_error"`), empty when absent
    pub id: String,
    /// Human-readable message, empty when absent
    pub message: String,
    /// Full `errors` array as sent by the server
    pub errors: Vec<ErrorDetail>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {} (id={}): {}", self.status.as_u16(), self.id, self.message)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Option<Vec<ErrorDetail>>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ApiError {
    /// Create an API error with an explicit kind.
    pub fn new(
        kind: ApiErrorKind,
        status: StatusCode,
        id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            status,
            id: id.into(),
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Build an error from a raw response body.
    ///
    /// Regular bodies look like `{"errors": [{"id": ..., "message": ...}]}`.
    /// OAuth endpoints send `{"error": ..., "error_description": ...}` instead.
    /// Bodies that are not JSON still produce an error classified by status.
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let errors = parsed.errors.unwrap_or_default();

        let (id, message) = match errors.first() {
            Some(first) => (first.id.clone(), first.message.clone()),
            None => (parsed.error, parsed.error_description),
        };

        let kind = ApiErrorKind::classify(id.as_deref(), status);
        Self {
            kind,
            status,
            id: id.unwrap_or_default(),
            message: message.unwrap_or_default(),
            errors,
        }
    }
}

/// Known server error identifiers.
pub mod error_ids {
    pub const TWO_FACTOR_REQUIRED: &str = "two_factor_required";
    pub const PARAM_REQUIRED: &str = "param_required";
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const PERSONAL_DETAILS_REQUIRED: &str = "personal_details_required";
    pub const AUTHENTICATION_ERROR: &str = "authentication_error";
    pub const UNVERIFIED_EMAIL: &str = "unverified_email";
    pub const INVALID_TOKEN: &str = "invalid_token";
    pub const REVOKED_TOKEN: &str = "revoked_token";
    pub const EXPIRED_TOKEN: &str = "expired_token";
    pub const INVALID_SCOPE: &str = "invalid_scope";
    pub const NOT_FOUND: &str = "not_found";
    pub const RATE_LIMIT_EXCEEDED: &str = "rate_limit_exceeded";
    pub const INTERNAL_SERVER_ERROR: &str = "internal_server_error";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_id_beats_status() {
        let body = r#"{"errors": [{"id": "expired_token", "message": "The access token expired"}]}"#;
        let error = ApiError::from_body(StatusCode::UNAUTHORIZED, body);
        assert_eq!(error.kind, ApiErrorKind::ExpiredToken);
        assert_eq!(error.id, "expired_token");
        assert_eq!(error.message, "The access token expired");
        assert_eq!(error.errors.len(), 1);
        assert!(error.kind.is_authentication());
    }

    #[test]
    fn test_null_fields_keep_the_rest_of_the_body() {
        let body = r#"{"errors": [{"id": "expired_token", "message": null}]}"#;
        let error = ApiError::from_body(StatusCode::UNAUTHORIZED, body);
        assert_eq!(error.kind, ApiErrorKind::ExpiredToken);
        assert_eq!(error.id, "expired_token");
        assert!(error.message.is_empty());
        assert_eq!(error.errors.len(), 1);

        let body = r#"{"errors": [{"id": null, "message": "Something broke", "url": null}]}"#;
        let error = ApiError::from_body(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert_eq!(error.kind, ApiErrorKind::InternalServer);
        assert!(error.id.is_empty());
        assert_eq!(error.message, "Something broke");
        assert_eq!(error.errors[0].message.as_deref(), Some("Something broke"));
    }

    #[test]
    fn test_status_fallback() {
        let body = r#"{"errors": [{"id": "something_new", "message": "?"}]}"#;
        let error = ApiError::from_body(StatusCode::UNAUTHORIZED, body);
        assert_eq!(error.kind, ApiErrorKind::Authentication);

        let error = ApiError::from_body(StatusCode::IM_A_TEAPOT, body);
        assert_eq!(error.kind, ApiErrorKind::Generic);
    }

    #[test]
    fn test_oauth_error_body() {
        let body = r#"{"error": "invalid_request", "error_description": "bad grant"}"#;
        let error = ApiError::from_body(StatusCode::UNAUTHORIZED, body);
        assert_eq!(error.kind, ApiErrorKind::InvalidRequest);
        assert_eq!(error.message, "bad grant");
        assert!(error.errors.is_empty());
    }

    #[test]
    fn test_non_json_body() {
        let error = ApiError::from_body(StatusCode::SERVICE_UNAVAILABLE, "<html>down</html>");
        assert_eq!(error.kind, ApiErrorKind::ServiceUnavailable);
        assert_eq!(error.id, "");
    }

    #[test]
    fn test_api_error_display() {
        let error = ApiError::new(ApiErrorKind::NotFound, StatusCode::NOT_FOUND, "not_found", "Not found");
        assert_eq!(error.to_string(), "HTTP 404 (id=not_found): Not found");
    }
}
