//! Foreman API client.
//!
//! Low-level HTTP client that handles authentication, transport and status
//! classification. Resource operations are implemented via traits on
//! entity types.

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;
use url::Url;

use crate::config::{ClientOptions, ConnectionConfig};
use crate::envelope;
use crate::error::{ForemanError, Result};
use crate::query::{QueryResponse, SearchQuery};
use crate::request::ForemanRequest;

/// Status line and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status received.
    pub status: StatusCode,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Numeric status code.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Body decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Low-level Foreman API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `Create`, `Get`, `Update`, `Delete` and
/// `Search` traits on model types.
///
/// This struct is cheaply cloneable; clones share the same connection
/// pool, configuration and logging span, none of which change after
/// construction.
///
/// # Example
///
/// ```no_run
/// use foremanapi::ForemanClient;
///
/// # async fn example() -> foremanapi::Result<()> {
/// // Create from environment variables
/// let client = ForemanClient::from_env()?;
///
/// // Or configure manually
/// let client = ForemanClient::new("https://foreman.example.com", "admin", "changeme")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ForemanClient {
    http: Client,
    config: Arc<ConnectionConfig>,
    options: Arc<ClientOptions>,
    span: tracing::Span,
}

impl std::fmt::Debug for ForemanClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForemanClient")
            .field("base_url", &self.config.base_url().as_str())
            .field("username", &self.config.username())
            .finish_non_exhaustive()
    }
}

impl ForemanClient {
    /// Create a client from environment variables.
    ///
    /// See [`ConnectionConfig::from_env`] and [`ClientOptions::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or invalid.
    pub fn from_env() -> Result<Self> {
        Self::with_options(ConnectionConfig::from_env()?, ClientOptions::from_env()?)
    }

    /// Create a client with default options.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Server root, e.g. `https://foreman.example.com`
    /// * `username` - Basic auth user
    /// * `password` - Basic auth password
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        Self::with_options(
            ConnectionConfig::new(base_url, username, password)?,
            ClientOptions::default(),
        )
    }

    /// Create a client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_options(config: ConnectionConfig, options: ClientOptions) -> Result<Self> {
        let insecure = config.is_tls_insecure();

        let http = Client::builder()
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(options.request_timeout)
            .danger_accept_invalid_certs(insecure)
            .danger_accept_invalid_hostnames(insecure)
            .build()
            .map_err(ForemanError::HttpError)?;

        let span = tracing::info_span!("foreman", server = %config.base_url());

        Ok(Self {
            http,
            config: Arc::new(config),
            options: Arc::new(options),
            span,
        })
    }

    /// Replace the span that request spans are attached to.
    #[must_use]
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    /// Get the server root URL.
    pub fn base_url(&self) -> &Url {
        self.config.base_url()
    }

    /// Connection settings.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Client-wide options.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Build an authenticated request for an API path.
    ///
    /// # Errors
    ///
    /// Returns [`ForemanError::InvalidMethod`] for unsupported methods.
    pub fn build_request(
        &self,
        method: &str,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ForemanRequest> {
        ForemanRequest::build(&self.config, method, path, body)
    }

    /// Execute a request and return its status and body.
    ///
    /// Non-2xx statuses are not errors at this layer.
    ///
    /// # Errors
    ///
    /// Returns [`ForemanError::HttpError`] if no response arrived and
    /// [`ForemanError::BodyRead`] if the body could not be read.
    pub async fn send(&self, request: ForemanRequest) -> Result<RawResponse> {
        let span = tracing::debug_span!(
            parent: &self.span,
            "request",
            method = %request.method(),
            path = request.path()
        );
        self.execute(request).instrument(span).await
    }

    async fn execute(&self, request: ForemanRequest) -> Result<RawResponse> {
        let (method, path, query, headers, body) = request.into_parts();
        let url = self.config.base_url().join(path.trim_start_matches('/'))?;

        let mut builder = self.http.request(method, url).headers(headers);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(ForemanError::HttpError)?;
        let status = response.status();

        // bytes() takes the response by value, so it is released on both arms
        match response.bytes().await {
            Ok(bytes) => {
                tracing::debug!(status = status.as_u16(), len = bytes.len(), "response received");
                Ok(RawResponse {
                    status,
                    body: bytes.to_vec(),
                })
            }
            Err(source) => Err(ForemanError::BodyRead {
                status_code: status.as_u16(),
                source,
            }),
        }
    }

    /// Send a request and decode a 2xx JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns transport errors unchanged, [`ForemanError::Api`] for
    /// non-2xx statuses and [`ForemanError::ParseError`] for bodies that do
    /// not decode as `T`.
    pub async fn send_and_parse<T: DeserializeOwned>(&self, request: ForemanRequest) -> Result<T> {
        let endpoint = request.path().to_string();
        let raw = Self::check_status(&endpoint, self.send(request).await?)?;
        Ok(serde_json::from_slice(&raw.body)?)
    }

    /// Send a request and only check for a 2xx status.
    ///
    /// # Errors
    ///
    /// As [`send_and_parse`](Self::send_and_parse), minus decoding.
    pub async fn send_and_check(&self, request: ForemanRequest) -> Result<()> {
        let endpoint = request.path().to_string();
        Self::check_status(&endpoint, self.send(request).await?)?;
        Ok(())
    }

    fn check_status(endpoint: &str, raw: RawResponse) -> Result<RawResponse> {
        if raw.status.is_success() {
            return Ok(raw);
        }

        Err(ForemanError::Api {
            endpoint: endpoint.to_string(),
            status_code: raw.status_code(),
            body: raw.text(),
        })
    }

    /// GET a path and decode the body.
    ///
    /// # Errors
    ///
    /// See [`send_and_parse`](Self::send_and_parse).
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.build_request("GET", path, None)?;
        self.send_and_parse(request).await
    }

    /// POST an encoded body and decode the response.
    ///
    /// # Errors
    ///
    /// See [`send_and_parse`](Self::send_and_parse).
    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Vec<u8>) -> Result<T> {
        let request = self.build_request("POST", path, Some(body))?;
        self.send_and_parse(request).await
    }

    /// PUT an encoded body and decode the response.
    ///
    /// # Errors
    ///
    /// See [`send_and_parse`](Self::send_and_parse).
    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: Vec<u8>) -> Result<T> {
        let request = self.build_request("PUT", path, Some(body))?;
        self.send_and_parse(request).await
    }

    /// DELETE a path, checking only the status.
    ///
    /// # Errors
    ///
    /// See [`send_and_check`](Self::send_and_check).
    pub async fn delete(&self, path: &str) -> Result<()> {
        let request = self.build_request("DELETE", path, None)?;
        self.send_and_check(request).await
    }

    /// Run a search and return the generic response.
    ///
    /// # Errors
    ///
    /// See [`send_and_parse`](Self::send_and_parse).
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, path: &str, query: &SearchQuery) -> Result<QueryResponse<Value>> {
        let request = query.apply(self.build_request("GET", path, None)?);
        self.send_and_parse(request).await
    }

    /// Run a search whose `results` is keyed by name.
    ///
    /// See [`QueryResponse::from_keyed`].
    ///
    /// # Errors
    ///
    /// See [`send_and_parse`](Self::send_and_parse).
    #[tracing::instrument(skip(self))]
    pub async fn search_keyed(
        &self,
        path: &str,
        query: &SearchQuery,
    ) -> Result<QueryResponse<Value>> {
        let request = query.apply(self.build_request("GET", path, None)?);
        let body: Value = self.send_and_parse(request).await?;
        QueryResponse::from_keyed(body)
    }

    /// Encode a record for create/update, applying taxonomy defaults when
    /// `scoped` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the record fails to serialize.
    pub fn encode<T: Serialize + ?Sized>(
        &self,
        key: Option<&str>,
        record: &T,
        scoped: bool,
    ) -> Result<Vec<u8>> {
        if scoped {
            envelope::wrap_with_taxonomy(key, record, &self.options.taxonomy)
        } else {
            envelope::wrap(key, record)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_debug() {
        let client = ForemanClient::new("https://foreman.example.com", "admin", "secret-pw").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("ForemanClient"));
        assert!(debug.contains("base_url"));
        // Password should not be in debug output
        assert!(!debug.contains("secret-pw"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = ForemanClient::new("https://foreman.example.com", "a", "b").unwrap();
        let client2 = ForemanClient::new("https://foreman.example.com/", "a", "b").unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<ForemanClient>();
    }

    #[test]
    fn test_encode_scoped_uses_client_taxonomy() {
        let client = ForemanClient::with_options(
            ConnectionConfig::new("https://foreman.example.com", "a", "b").unwrap(),
            ClientOptions::default().with_organization(3),
        )
        .unwrap();

        let record = json!({"name": "example.com"});
        let scoped: Value =
            serde_json::from_slice(&client.encode(Some("domain"), &record, true).unwrap()).unwrap();
        let plain: Value =
            serde_json::from_slice(&client.encode(Some("domain"), &record, false).unwrap()).unwrap();

        assert_eq!(scoped["organization_id"], json!("3"));
        assert!(plain.get("organization_id").is_none());
    }

    #[test]
    fn test_check_status_keeps_raw_body() {
        let raw = RawResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: b"boom".to_vec(),
        };
        let err = ForemanClient::check_status("/api/hosts", raw).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("boom"));

        let ok = RawResponse {
            status: StatusCode::NO_CONTENT,
            body: Vec::new(),
        };
        assert!(ForemanClient::check_status("/api/hosts", ok).is_ok());
    }
}
