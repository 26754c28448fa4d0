//! Main CrudClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::error::ApiError;
use crate::error::Error;

/// The main client for a CRUD REST API.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tables and threads.
///
/// # Example
///
/// ```ignore
/// use crudtable_lib::CrudClient;
/// use crudtable_lib::api::ResourceApi;
/// use crudtable_lib::api::query::QueryState;
///
/// let client = CrudClient::builder()
///     .url("http://localhost:8080")
///     .build()?;
///
/// let page = client.list("contacts", &QueryState::default()).await?;
/// ```
#[derive(Clone)]
pub struct CrudClient {
    inner: Arc<CrudClientInner>,
}

struct CrudClientInner {
    base_url: String,
    api_version: String,
    http_client: Client,
    timeout: Option<Duration>,
}

impl CrudClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> CrudClientBuilder<Missing> {
        CrudClientBuilder::new()
    }

    /// Returns the base URL of the server.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the API version being used.
    pub fn api_version(&self) -> &str {
        &self.inner.api_version
    }

    /// Returns the per-request timeout, if one is set.
    pub fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }

    pub(crate) fn http(&self) -> &Client {
        &self.inner.http_client
    }

    /// Builds `{base}/api/{version}/{resource}` followed by extra path
    /// segments. Every segment is percent-encoded.
    pub(crate) fn build_url(&self, resource: &str, segments: &[&str]) -> String {
        let mut url = format!(
            "{}/api/{}/{}",
            self.inner.base_url.trim_end_matches('/'),
            self.inner.api_version,
            urlencoding::encode(resource)
        );
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }
}

impl std::fmt::Debug for CrudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudClient")
            .field("base_url", &self.inner.base_url)
            .field("api_version", &self.inner.api_version)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`CrudClient`].
///
/// Uses the typestate pattern so `build` only exists once the base URL is
/// set.
///
/// # Example
///
/// ```ignore
/// let client = CrudClient::builder()
///     .url("https://admin.example.com")
///     .api_version("v1")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct CrudClientBuilder<U> {
    url: U,
    api_version: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl CrudClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            api_version: "v1".to_string(),
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the server URL, e.g. `https://admin.example.com`.
    pub fn url(self, url: impl Into<String>) -> CrudClientBuilder<Set<String>> {
        CrudClientBuilder {
            url: Set(url.into()),
            api_version: self.api_version,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for CrudClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> CrudClientBuilder<U> {
    /// Sets the API version path segment.
    ///
    /// Defaults to `v1`.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl CrudClientBuilder<Set<String>> {
    /// Builds the [`CrudClient`].
    ///
    /// Fails if the URL is not an absolute http(s) URL or the HTTP client
    /// cannot be created.
    pub fn build(self) -> Result<CrudClient, Error> {
        let base_url = self.url.0;
        let parsed = Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!("{base_url}: unsupported scheme")).into());
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::Network)?
            }
        };

        Ok(CrudClient {
            inner: Arc::new(CrudClientInner {
                base_url,
                api_version: self.api_version,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
