//! HTTP client construction and transport dispatch

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use segload_errors::{Error, NetworkError};
use segload_types::LoadContext;

use crate::load::TransportParams;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: format!("segload/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Dispatches one prepared request and resolves to the response headers.
///
/// This is the injectable request-factory capability: implementations can
/// substitute custom transport construction (instrumentation, test fakes)
/// without touching loader logic. Implementations must observe the
/// cancellation token carried in the params.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request described by `context` and `params`.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, on a malformed request, or
    /// `Error::Cancelled` when the token fires before headers arrive.
    async fn dispatch(
        &self,
        context: &LoadContext,
        params: TransportParams,
    ) -> Result<Response, Error>;
}

/// HTTP client wrapper around one shared reqwest connection pool.
///
/// Per-request timeouts are enforced by the loader's watchdog, not here, so
/// the client itself carries no overall request timeout.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to
    /// initialize.
    pub fn new(config: &HttpConfig) -> Result<Self, Error> {
        // No cookie store: requests never carry ambient credentials.
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ConnectionRefused(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default
    /// settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(&HttpConfig::default())
    }

    /// Get the underlying reqwest client for advanced usage
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }

    fn map_send_error(url: &str, error: &reqwest::Error) -> Error {
        if error.is_timeout() {
            NetworkError::Timeout {
                url: url.to_string(),
            }
            .into()
        } else if error.is_connect() {
            NetworkError::ConnectionRefused(error.to_string()).into()
        } else {
            NetworkError::TransportFailed(error.to_string()).into()
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn dispatch(
        &self,
        context: &LoadContext,
        params: TransportParams,
    ) -> Result<Response, Error> {
        let mut request = self.client.request(params.method.clone(), &context.url);
        for (name, value) in &params.headers {
            request = request.header(name, value);
        }

        tokio::select! {
            () = params.cancel.cancelled() => Err(Error::Cancelled),
            result = request.send() => {
                result.map_err(|e| Self::map_send_error(&context.url, &e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_identifies_the_crate() {
        let config = HttpConfig::default();
        assert!(config.user_agent.starts_with("segload/"));
        assert_eq!(config.pool_max_idle_per_host, 10);
    }

    #[test]
    fn client_builds_with_defaults() {
        assert!(HttpClient::with_defaults().is_ok());
    }
}
