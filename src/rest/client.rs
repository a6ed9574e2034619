//! Coinbase REST API client implementation.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::Serialize;
use url::Url;

use crate::auth::{
    BearerAuth, CredentialsProvider, HmacAuth, NoAuth, OAuthTokens, RequestSigner,
    StaticCredentials, SystemTimestamp, TimestampProvider,
};
use crate::error::{ApiError, CoinbaseError};
use crate::model::{
    AccountRef, ApiModel, ApiObject, Materializer, ObjectKind, TypeRegistry, UnnestRules,
};
use crate::rest::endpoints::{COINBASE_BASE_URL, DEFAULT_API_VERSION};
use crate::rest::envelope::RawResponse;

/// The Coinbase REST API client.
///
/// Every response is decoded into [`ApiObject`] trees that keep a handle to
/// the client, so objects can issue their own follow-up requests
/// (`account.get_transactions(..)`, `buy.commit()`, `obj.refresh()`).
///
/// # Example
///
/// ```rust,no_run
/// use coinbase_api_client::rest::CoinbaseClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CoinbaseClient::with_api_key("api_key", "api_secret")?;
///
///     let user = client.get_current_user().await?;
///     println!("Hello {}", user.name().unwrap_or("?"));
///
///     let accounts = client.get_accounts(None).await?;
///     for account in accounts.page().unwrap_or_default() {
///         println!("{:?}", account);
///     }
///     Ok(())
/// }
/// ```
///
/// OAuth2 tokens work the same way:
///
/// ```rust,no_run
/// use coinbase_api_client::auth::OAuthTokens;
/// use coinbase_api_client::rest::CoinbaseClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CoinbaseClient::builder()
///         .oauth(OAuthTokens::new("access_token", "refresh_token")?)
///         .build()?;
///
///     client.refresh().await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CoinbaseClient {
    inner: Arc<ClientInner>,
}

// Shared by every clone and by every object materialized through the client.
struct ClientInner {
    http_client: ClientWithMiddleware,
    base_url: Url,
    api_version: String,
    signer: Arc<dyn RequestSigner>,
    oauth: Option<Arc<OAuthTokens>>,
    materializer: Materializer,
}

impl CoinbaseClient {
    /// Create a new client builder.
    pub fn builder() -> CoinbaseClientBuilder {
        CoinbaseClientBuilder::new()
    }

    /// Create a client that signs requests with an API key and secret.
    pub fn with_api_key(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, CoinbaseError> {
        Self::builder()
            .credentials(Arc::new(StaticCredentials::new(api_key, api_secret)))
            .build()
    }

    /// Create a client that authenticates with OAuth2 bearer tokens.
    pub fn with_oauth(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<Self, CoinbaseError> {
        Self::builder()
            .oauth(OAuthTokens::new(access_token, refresh_token)?)
            .build()
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.inner.api_version
    }

    /// The materializer used for every response of this client.
    pub fn materializer(&self) -> &Materializer {
        &self.inner.materializer
    }

    /// The OAuth token pair, if the client was built with one.
    pub fn oauth_tokens(&self) -> Option<&OAuthTokens> {
        self.inner.oauth.as_deref()
    }

    // ========== URLs ==========

    /// URL of `base_url` followed by the percent-encoded `parts`.
    pub(crate) fn endpoint(&self, parts: &[&str]) -> Result<Url, CoinbaseError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CoinbaseError::InvalidParameter(format!("base URL cannot carry a path: {}", self.inner.base_url))
            })?
            .pop_if_empty()
            .extend(parts);
        Ok(url)
    }

    /// URL of a server-provided path such as `resource_path` or `next_uri`.
    pub(crate) fn resolve_path(&self, path: &str) -> Result<Url, CoinbaseError> {
        Ok(self.inner.base_url.join(path)?)
    }

    // ========== Transport ==========

    /// Sign and send a request. Non-2xx answers become [`CoinbaseError::Api`].
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<RawResponse, CoinbaseError> {
        let path_and_query = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let body = body.unwrap_or_default();

        // Sign the request.
        let auth_headers = self.inner.signer.sign(&method, &path_and_query, &body)?;

        tracing::debug!(%method, %url, "sending request");
        let mut request = self.inner.http_client.request(method, url).headers(auth_headers);
        if !body.is_empty() {
            request = request.body(body);
        }
        let response = request.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response.text().await?;
        tracing::debug!(%status, %url, "received response");

        if !status.is_success() {
            return Err(CoinbaseError::Api(ApiError::from_body(status, &body)));
        }

        Ok(RawResponse {
            status,
            headers,
            url,
            body,
        })
    }

    fn encode_body<B>(body: &B) -> Result<Option<String>, CoinbaseError>
    where
        B: Serialize + ?Sized,
    {
        Ok(Some(serde_json::to_string(body)?))
    }

    /// GET a resource and decode its envelope.
    pub(crate) async fn get(
        &self,
        parts: &[&str],
        kind: ObjectKind,
        account: Option<AccountRef>,
    ) -> Result<ApiObject, CoinbaseError> {
        let url = self.endpoint(parts)?;
        let raw = self.send(Method::GET, url, None).await?;
        self.decode(raw, kind, account)
    }

    /// GET a resource with URL-encoded query parameters.
    pub(crate) async fn get_with_params<Q>(
        &self,
        parts: &[&str],
        params: Option<&Q>,
        kind: ObjectKind,
        account: Option<AccountRef>,
    ) -> Result<ApiObject, CoinbaseError>
    where
        Q: Serialize + ?Sized,
    {
        let mut url = self.endpoint(parts)?;
        if let Some(params) = params {
            let query_string = serde_urlencoded::to_string(params)
                .map_err(|e| CoinbaseError::InvalidParameter(e.to_string()))?;
            if !query_string.is_empty() {
                url.set_query(Some(&query_string));
            }
        }
        let raw = self.send(Method::GET, url, None).await?;
        self.decode(raw, kind, account)
    }

    /// POST a JSON body.
    pub(crate) async fn post<B>(
        &self,
        parts: &[&str],
        body: &B,
        kind: ObjectKind,
        account: Option<AccountRef>,
    ) -> Result<ApiObject, CoinbaseError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(parts)?;
        let raw = self.send(Method::POST, url, Self::encode_body(body)?).await?;
        self.decode(raw, kind, account)
    }

    /// POST without a body, for action endpoints such as `commit`.
    pub(crate) async fn post_empty(
        &self,
        parts: &[&str],
        kind: ObjectKind,
        account: Option<AccountRef>,
    ) -> Result<ApiObject, CoinbaseError> {
        let url = self.endpoint(parts)?;
        let raw = self.send(Method::POST, url, None).await?;
        self.decode(raw, kind, account)
    }

    /// PUT a JSON body.
    pub(crate) async fn put<B>(
        &self,
        parts: &[&str],
        body: &B,
        kind: ObjectKind,
        account: Option<AccountRef>,
    ) -> Result<ApiObject, CoinbaseError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(parts)?;
        let raw = self.send(Method::PUT, url, Self::encode_body(body)?).await?;
        self.decode(raw, kind, account)
    }

    /// DELETE a resource. The answer carries no data.
    pub(crate) async fn delete(&self, parts: &[&str]) -> Result<(), CoinbaseError> {
        let url = self.endpoint(parts)?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    /// GET a server-provided path.
    pub(crate) async fn get_at_path(
        &self,
        path: &str,
        kind: ObjectKind,
        account: Option<AccountRef>,
    ) -> Result<ApiObject, CoinbaseError> {
        let url = self.resolve_path(path)?;
        let raw = self.send(Method::GET, url, None).await?;
        self.decode(raw, kind, account)
    }

    /// POST to a server-provided path without a body.
    pub(crate) async fn post_at_path(
        &self,
        path: &str,
        kind: ObjectKind,
        account: Option<AccountRef>,
    ) -> Result<ApiObject, CoinbaseError> {
        let url = self.resolve_path(path)?;
        let raw = self.send(Method::POST, url, None).await?;
        self.decode(raw, kind, account)
    }
}

// Typed variants of the helpers above. The answer must materialize as `T`
// or a subtype of it, otherwise `UnexpectedDataFormat` is returned.
impl CoinbaseClient {
    pub(crate) async fn get_as<T: ApiModel>(
        &self,
        parts: &[&str],
        account: Option<AccountRef>,
    ) -> Result<T, CoinbaseError> {
        T::try_from(self.get(parts, T::KIND, account).await?)
    }

    pub(crate) async fn post_as<T, B>(
        &self,
        parts: &[&str],
        body: &B,
        account: Option<AccountRef>,
    ) -> Result<T, CoinbaseError>
    where
        T: ApiModel,
        B: Serialize + ?Sized,
    {
        T::try_from(self.post(parts, body, T::KIND, account).await?)
    }

    pub(crate) async fn post_empty_as<T: ApiModel>(
        &self,
        parts: &[&str],
        account: Option<AccountRef>,
    ) -> Result<T, CoinbaseError> {
        T::try_from(self.post_empty(parts, T::KIND, account).await?)
    }

    pub(crate) async fn put_as<T, B>(
        &self,
        parts: &[&str],
        body: &B,
        account: Option<AccountRef>,
    ) -> Result<T, CoinbaseError>
    where
        T: ApiModel,
        B: Serialize + ?Sized,
    {
        T::try_from(self.put(parts, body, T::KIND, account).await?)
    }
}

impl std::fmt::Debug for CoinbaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinbaseClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("api_version", &self.inner.api_version)
            .field("oauth", &self.inner.oauth.is_some())
            .finish()
    }
}

/// Builder for [`CoinbaseClient`].
pub struct CoinbaseClientBuilder {
    base_url: String,
    api_version: String,
    user_agent: Option<String>,
    verify_tls: bool,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    oauth: Option<Arc<OAuthTokens>>,
    signer: Option<Arc<dyn RequestSigner>>,
    timestamp_provider: Option<Arc<dyn TimestampProvider>>,
    registry: Option<Arc<TypeRegistry>>,
    unnest_rules: Option<UnnestRules>,
}

impl CoinbaseClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: COINBASE_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: None,
            verify_tls: true,
            credentials: None,
            oauth: None,
            signer: None,
            timestamp_provider: None,
            registry: None,
            unnest_rules: None,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the `CB-VERSION` sent with every request.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Turn TLS certificate verification off. Only meant for local test servers.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Set the credentials provider for API-key (HMAC) authentication.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Authenticate with OAuth2 bearer tokens. Takes precedence over credentials.
    pub fn oauth(mut self, tokens: OAuthTokens) -> Self {
        self.oauth = Some(Arc::new(tokens));
        self
    }

    /// Replace the request signer. Takes precedence over credentials and OAuth.
    pub fn signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Set a custom timestamp provider for HMAC signatures.
    pub fn timestamp_provider(mut self, provider: Arc<dyn TimestampProvider>) -> Self {
        self.timestamp_provider = Some(provider);
        self
    }

    /// Resolve object kinds with a custom registry instead of the shared one.
    pub fn registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn unnest_rules(mut self, rules: UnnestRules) -> Self {
        self.unnest_rules = Some(rules);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<CoinbaseClient, CoinbaseError> {
        let base_url = Url::parse(&self.base_url)?;
        if base_url.scheme() != "https" {
            tracing::warn!(
                base_url = %base_url,
                "sending requests to an insecure API endpoint; credentials may be exposed, \
                 consider using {COINBASE_BASE_URL}"
            );
        }

        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("coinbase-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("coinbase-api-client"));
        headers.insert(USER_AGENT, header_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // Build the HTTP client with middleware.
        let mut reqwest_builder = reqwest::Client::builder().default_headers(headers);
        if !self.verify_tls {
            reqwest_builder = reqwest_builder.danger_accept_invalid_certs(true);
        }
        let reqwest_client = reqwest_builder.build()?;

        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let signer: Arc<dyn RequestSigner> = match (self.signer, &self.oauth, self.credentials) {
            (Some(signer), _, _) => signer,
            (None, Some(tokens), _) => Arc::new(BearerAuth::new(Arc::clone(tokens), &self.api_version)),
            (None, None, Some(credentials)) => {
                let timestamp = self
                    .timestamp_provider
                    .unwrap_or_else(|| Arc::new(SystemTimestamp));
                Arc::new(HmacAuth::new(credentials, timestamp, &self.api_version))
            }
            (None, None, None) => Arc::new(NoAuth::new(&self.api_version)),
        };

        let mut materializer =
            Materializer::new(self.registry.unwrap_or_else(TypeRegistry::shared));
        if let Some(rules) = self.unnest_rules {
            materializer = materializer.with_unnest_rules(rules);
        }

        Ok(CoinbaseClient {
            inner: Arc::new(ClientInner {
                http_client: client,
                base_url,
                api_version: self.api_version,
                signer,
                oauth: self.oauth,
                materializer,
            }),
        })
    }
}

impl Default for CoinbaseClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let client = CoinbaseClient::builder().build().unwrap();
        let url = client.endpoint(&["v2", "accounts", "a b"]).unwrap();
        assert_eq!(url.as_str(), "https://api.coinbase.com/v2/accounts/a%20b");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = CoinbaseClient::builder()
            .base_url("http://localhost:8080/proxy/")
            .build()
            .unwrap();
        let url = client.endpoint(&["v2", "time"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v2/time");
    }

    #[test]
    fn test_resolve_path_keeps_query() {
        let client = CoinbaseClient::builder().build().unwrap();
        let url = client
            .resolve_path("/v2/accounts?limit=25&starting_after=abc")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.coinbase.com/v2/accounts?limit=25&starting_after=abc"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = CoinbaseClient::builder().base_url("not a url").build();
        assert!(matches!(result, Err(CoinbaseError::Url(_))));
    }

    #[test]
    fn test_defaults() {
        let client = CoinbaseClient::builder().build().unwrap();
        assert_eq!(client.api_version(), DEFAULT_API_VERSION);
        assert!(client.oauth_tokens().is_none());
        let debug_str = format!("{client:?}");
        assert!(debug_str.contains("api.coinbase.com"));
    }

    #[test]
    fn test_objects_share_client_state() {
        let client = CoinbaseClient::builder().build().unwrap();
        let obj = client.materializer().materialize_object(
            serde_json::Map::from_iter([(
                "balance".to_string(),
                serde_json::json!({"amount": "1.00", "currency": "BTC"}),
            )]),
            Some(&client),
            crate::model::MaterializeOptions::new(),
        );
        let nested = obj["balance"].as_object().unwrap();
        assert!(Arc::ptr_eq(&client.inner, &obj.client().unwrap().inner));
        assert!(Arc::ptr_eq(&client.inner, &nested.client().unwrap().inner));
        let other = CoinbaseClient::builder().build().unwrap();
        assert!(!Arc::ptr_eq(&client.inner, &other.inner));
    }

    #[test]
    fn test_with_oauth_rejects_empty_tokens() {
        assert!(matches!(
            CoinbaseClient::with_oauth("", "refresh"),
            Err(CoinbaseError::MissingParameter(_))
        ));
    }
}
