//! HTTP transport over reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use wetstock_types::{Result, WetstockError};

use crate::{ClientConfig, RawResponse, Transport};

/// HTTP transport with connection pooling, shared-secret injection, and
/// bounded retry.
///
/// One transport can be shared by several service clients; construct it
/// explicitly and hand out clones of the [`Arc`] rather than caching
/// construction behind the scenes.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Creates a transport for the given connection configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .tcp_keepalive(Duration::from_secs(60))
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(format!("wetstock/{}", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()
            .map_err(|e| WetstockError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Creates a transport from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variables are unset or the
    /// client cannot be built.
    pub fn from_env(url_var: &str) -> Result<Self> {
        Self::new(ClientConfig::from_env(url_var)?)
    }

    /// Returns the connection configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Wraps the transport for sharing across service clients.
    #[must_use]
    pub fn into_shared(self) -> Arc<dyn Transport> {
        Arc::new(self)
    }

    /// Prepends the shared-secret parameter to an endpoint's query.
    fn query_with_auth<'a>(&'a self, query: &'a [(&'a str, String)]) -> Vec<(&'a str, &'a str)> {
        let mut all = Vec::with_capacity(query.len() + 1);
        all.push(("system_psk", self.config.system_psk.as_str()));
        all.extend(query.iter().map(|(key, value)| (*key, value.as_str())));
        all
    }

    async fn send_once(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> std::result::Result<RawResponse, reqwest::Error> {
        let mut request = self.client.post(url).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        let url = format!("{}{}", self.config.base_url, path);
        let query = self.query_with_auth(query);
        tracing::debug!(%url, "dispatching request");

        self.config
            .retry
            .run(|| self.send_once(&url, &query, body))
            .await
            .map_err(|e| WetstockError::Transport(e.to_string()))
    }
}
