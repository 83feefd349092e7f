//! HTTP client for the hosted backend.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};

use crate::config::BackendConfig;
use crate::error::{BackendError, rest_error};
use crate::query::TableQuery;

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the hosted backend's table and auth APIs.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    http: reqwest::Client,
    rest_url: String,
    auth_url: String,
    api_key: SecretString,
}

impl BackendClient {
    /// Create a client that authenticates with the public anon key.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self::with_key(config, config.anon_key.clone())
    }

    /// Create a client that authenticates with the service-role key.
    ///
    /// Row-level security is bypassed, so this is only used by operator
    /// tooling.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Config` if no service-role key is configured.
    pub fn with_service_role(config: &BackendConfig) -> Result<Self, BackendError> {
        let key = config
            .service_role_key
            .clone()
            .ok_or_else(|| BackendError::Config("BACKEND_SERVICE_ROLE_KEY is not set".into()))?;
        Ok(Self::with_key(config, key))
    }

    fn with_key(config: &BackendConfig, api_key: SecretString) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(BackendClientInner {
                http,
                rest_url: config.rest_url(),
                auth_url: config.auth_url(),
                api_key,
            }),
        }
    }

    /// Start a query against a table.
    #[must_use]
    pub fn from(&self, table: &str) -> TableQuery<'_> {
        TableQuery::new(self, table)
    }

    /// Check that the table API answers with this client's key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or refuses the key.
    pub async fn ping(&self) -> Result<(), BackendError> {
        self.from(crate::tables::CATEGORIES)
            .select("id")
            .limit(1)
            .fetch::<serde_json::Value>()
            .await
            .map(|_| ())
    }

    /// Build a table API request.
    ///
    /// The caller's access token is sent as the bearer when present so that
    /// row-level security sees the signed-in user; otherwise the client key
    /// is used.
    pub(crate) fn rest_request(
        &self,
        method: Method,
        table: &str,
        token: Option<&SecretString>,
    ) -> RequestBuilder {
        let url = format!("{}/{table}", self.inner.rest_url);
        self.authorized(self.inner.http.request(method, url), token)
    }

    /// Build an auth API request.
    pub(crate) fn auth_request(
        &self,
        method: Method,
        path: &str,
        token: Option<&SecretString>,
    ) -> RequestBuilder {
        let url = format!("{}/{path}", self.inner.auth_url);
        self.authorized(self.inner.http.request(method, url), token)
    }

    fn authorized(&self, builder: RequestBuilder, token: Option<&SecretString>) -> RequestBuilder {
        let bearer = token.unwrap_or(&self.inner.api_key);
        builder
            .header("apikey", self.inner.api_key.expose_secret())
            .header(
                "Authorization",
                format!("Bearer {}", bearer.expose_secret()),
            )
    }

    /// Send a request, mapping rate limits and error envelopes to `BackendError`.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, BackendError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(rest_error(status.as_u16(), &body));
        }

        Ok(response)
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("rest_url", &self.inner.rest_url)
            .field("auth_url", &self.inner.auth_url)
            .finish_non_exhaustive()
    }
}
