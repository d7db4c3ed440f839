//! HTTP client with built-in retry and timeout support.
//!
//! Retries are restricted to transport faults and 5xx responses, and
//! only for requests the caller declares idempotent. Booking writes go
//! through [`HttpClient::send_once`] and are never retried server-side.

use std::time::Duration;

use matchday_domain::BookingError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client wrapper around reqwest
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute an idempotent request with retry semantics.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, BookingError> {
        let attempts = self.max_attempts.max(1);

        for attempt in 0..attempts {
            let cloned = builder.try_clone().ok_or_else(|| {
                BookingError::Internal(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            match self.execute(cloned, attempt).await {
                Ok(response) => {
                    if response.status().is_server_error() && attempt + 1 < attempts {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    if attempt + 1 < attempts && err.is_retryable() {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }
                    return Err(err);
                }
            }
        }

        Err(BookingError::Internal("http client exhausted retries without a result".into()))
    }

    /// Execute a non-idempotent request exactly once.
    pub async fn send_once(&self, builder: RequestBuilder) -> Result<Response, BookingError> {
        self.execute(builder, 0).await
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        attempt: usize,
    ) -> Result<Response, BookingError> {
        let request = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            BookingError::from(infra)
        })?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(attempt = attempt + 1, %method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(attempt = attempt + 1, %method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(attempt = attempt + 1, %method, %url, error = %err, "HTTP request failed");
                let infra: InfraError = err.into();
                Err(BookingError::from(infra))
            }
        }
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn build(self) -> Result<HttpClient, BookingError> {
        let client = ReqwestClient::builder().timeout(self.timeout).build().map_err(|err| {
            let infra: InfraError = err.into();
            BookingError::from(infra)
        })?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts,
            base_backoff: self.base_backoff,
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn retries_server_errors_until_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = HttpClient::builder()
            .max_attempts(3)
            .base_backoff(Duration::from_millis(1))
            .build()
            .unwrap();

        let response = client
            .send(client.request(Method::GET, format!("{}/flaky", server.uri())))
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn send_once_does_not_retry() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/write"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder()
            .max_attempts(3)
            .base_backoff(Duration::from_millis(1))
            .build()
            .unwrap();

        let response = client
            .send_once(client.request(Method::PUT, format!("{}/write", server.uri())))
            .await
            .unwrap();
        assert!(response.status().is_server_error());
    }

    #[tokio::test]
    async fn timeout_surfaces_as_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = HttpClient::builder()
            .timeout(Duration::from_millis(50))
            .max_attempts(1)
            .build()
            .unwrap();

        let err = client
            .send(client.request(Method::GET, format!("{}/slow", server.uri())))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Upstream(_)));
    }
}
