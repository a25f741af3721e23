//! JSON HTTP transport
//!
//! Sends one request per call and classifies failures:
//! - network failures and timeouts become transport errors
//! - non-2xx responses become service errors with the API's error code
//!
//! There is no retry here; a failed call is reported to the caller as-is.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Method, StringMap};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base endpoint for all requests
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            default_headers: StringMap::new(),
            user_agent: format!("pagewalk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, in order (keys may repeat)
    pub query: Vec<(String, String)>,
    /// Request headers
    pub headers: StringMap,
    /// Request body (JSON)
    pub body: Option<JsonValue>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client for JSON APIs
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        if let Some(base) = &config.base_url {
            Url::parse(base)?;
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Send a request to `base_url` + path segments and parse the JSON reply.
    ///
    /// Segments are percent-encoded individually. An empty 2xx body yields
    /// an empty JSON object.
    pub async fn send_json(
        &self,
        method: Method,
        segments: &[String],
        config: RequestConfig,
    ) -> Result<JsonValue> {
        let url = self.build_url(segments, &config.query)?;
        let timeout = config.timeout.unwrap_or(self.config.timeout);

        let mut req = self.client.request(method.into(), url.clone());

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(ref body) = config.body {
            req = req.json(body);
        }
        req = req.timeout(timeout);

        debug!(%method, %url, "sending request");

        let response = req.send().await.map_err(|e| classify(e, timeout))?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(|e| classify(e, timeout))?;

        if !status.is_success() {
            return Err(service_error(status, &headers, &text));
        }

        debug!(status = status.as_u16(), bytes = text.len(), "request succeeded");

        if text.trim().is_empty() {
            return Ok(JsonValue::Object(serde_json::Map::new()));
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Build full URL from path segments and query pairs
    pub fn build_url(&self, segments: &[String], query: &[(String, String)]) -> Result<Url> {
        let base = self
            .config
            .base_url
            .as_deref()
            .ok_or_else(|| Error::missing_field("endpoint"))?;
        let mut url = Url::parse(base)?;

        url.path_segments_mut()
            .map_err(|()| Error::invalid_value("endpoint", format!("cannot be a base: {base}")))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Map a reqwest failure to a transport error
fn classify(error: reqwest::Error, timeout: Duration) -> Error {
    if error.is_timeout() {
        Error::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        Error::Transport(error)
    }
}

/// Build a service error from a non-2xx response.
///
/// The code comes from `x-amzn-ErrorType`, then `__type`/`code` in the body;
/// both may carry a namespace prefix or a trailing `:detail`.
fn service_error(status: StatusCode, headers: &HeaderMap, body: &str) -> Error {
    let parsed: Option<JsonValue> = serde_json::from_str(body).ok();

    let code = headers
        .get("x-amzn-errortype")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .or_else(|| {
            parsed.as_ref().and_then(|v| {
                ["__type", "code", "Code"]
                    .iter()
                    .find_map(|k| v.get(*k).and_then(JsonValue::as_str))
                    .map(str::to_owned)
            })
        })
        .map(|raw| clean_error_code(&raw))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("UnknownError")
                .replace(' ', "")
        });

    let message = parsed
        .as_ref()
        .and_then(|v| {
            ["message", "Message"]
                .iter()
                .find_map(|k| v.get(*k).and_then(JsonValue::as_str))
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_string());

    Error::service(status.as_u16(), code, message)
}

/// `aws.protocols#ValidationException:http://...` -> `ValidationException`
pub(super) fn clean_error_code(raw: &str) -> String {
    let without_detail = raw.split(':').next().unwrap_or(raw);
    without_detail
        .rsplit('#')
        .next()
        .unwrap_or(without_detail)
        .trim()
        .to_string()
}
