//! Request construction.
//!
//! A [`ForemanRequest`] is plain data: method, API path, query, headers and
//! body. It is validated and authenticated here and executed by
//! [`ForemanClient::send`](crate::ForemanClient::send).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;

use crate::config::ConnectionConfig;
use crate::error::{ForemanError, Result};

/// Path prefix of every API endpoint.
pub const API_PREFIX: &str = "/api";

/// API version requested through the `Accept` header.
pub const API_VERSION: u32 = 2;

const USER_AGENT_VALUE: &str = concat!("foremanapi/", env!("CARGO_PKG_VERSION"));

/// A validated, authenticated request ready to be sent.
#[derive(Clone)]
pub struct ForemanRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl std::fmt::Debug for ForemanRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // HeaderMap's Debug masks values flagged sensitive
        f.debug_struct("ForemanRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("headers", &self.headers)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .finish()
    }
}

impl ForemanRequest {
    /// Build a request for `path` relative to the API prefix.
    ///
    /// The method is matched case-insensitively and stored upper case.
    ///
    /// # Errors
    ///
    /// Returns [`ForemanError::InvalidMethod`] for `CONNECT`, unknown
    /// tokens, or tokens with surrounding whitespace.
    pub fn build(
        config: &ConnectionConfig,
        method: &str,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Self> {
        let method = parse_method(method)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_str(&accept_header())?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            basic_auth(config.username(), config.password())?,
        );

        Ok(Self {
            method,
            path: api_path(path),
            query: Vec::new(),
            headers,
            body,
        })
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// The upper-case HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full API path, including the prefix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in insertion order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Encoded JSON body, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (Method, String, Vec<(String, String)>, HeaderMap, Option<Vec<u8>>) {
        (self.method, self.path, self.query, self.headers, self.body)
    }
}

/// Parse an HTTP method the API accepts.
///
/// # Errors
///
/// Returns [`ForemanError::InvalidMethod`] carrying the original input.
pub fn parse_method(method: &str) -> Result<Method> {
    let parsed = match method.to_ascii_uppercase().as_str() {
        "GET" => Method::GET,
        "HEAD" => Method::HEAD,
        "POST" => Method::POST,
        "PUT" => Method::PUT,
        "PATCH" => Method::PATCH,
        "DELETE" => Method::DELETE,
        "OPTIONS" => Method::OPTIONS,
        "TRACE" => Method::TRACE,
        _ => return Err(ForemanError::InvalidMethod(method.to_string())),
    };
    Ok(parsed)
}

/// Join a resource path onto the API prefix with exactly one separator.
pub fn api_path(path: &str) -> String {
    format!("{API_PREFIX}/{}", path.trim_start_matches('/'))
}

fn accept_header() -> String {
    format!("application/json,version={API_VERSION}")
}

fn basic_auth(username: &str, password: &str) -> Result<HeaderValue> {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))?;
    value.set_sensitive(true);
    Ok(value)
}
