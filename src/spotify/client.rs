use std::time::Duration;

use reqwest::{Client, Request, Response, StatusCode, header::HeaderMap};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::{config::ClientConfig, error::ClientError, spotify::limiter::RateLimiter};

/// HTTP client for the Spotify APIs with a shared request cadence and
/// bounded retries.
///
/// Every request, whatever operation issued it, goes through the same
/// [`RateLimiter`]. A 429 is retried after the server's `Retry-After` hint,
/// transport failures are retried right away (the limiter still paces them),
/// everything else is returned to the caller unchanged.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    limiter: RateLimiter,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            limiter: RateLimiter::new(config.request_interval, config.burst),
            config,
        })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn api_url(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }

    /// Sends `request`, waiting for a limiter slot before every attempt.
    ///
    /// Cancellation only applies while waiting (for a slot or for a
    /// `Retry-After` delay). Once a request is on the wire it runs to
    /// completion.
    pub async fn execute(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Response, ClientError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut last_failure = ClientError::RateLimited;

        for attempt in 1..=max_attempts {
            let req = request.try_clone().ok_or_else(|| {
                ClientError::InvalidRequest(String::from("request body cannot be replayed"))
            })?;

            self.limiter.acquire(cancel).await?;

            tracing::debug!(
                "{} {} (attempt {}/{})",
                req.method(),
                req.url().path(),
                attempt,
                max_attempts
            );

            let response = match self.http.execute(req).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::debug!("request to {} failed: {}", request.url().path(), err);
                    last_failure = ClientError::from(err);
                    continue;
                }
            };

            match response.status() {
                status if status.is_success() => return Ok(response),
                StatusCode::TOO_MANY_REQUESTS => {
                    let wait = retry_after(response.headers())
                        .unwrap_or(self.config.default_retry_after);
                    if wait > self.config.max_retry_after {
                        tracing::warn!(
                            "retry-after has reached an abnormal high of {} seconds, giving up",
                            wait.as_secs()
                        );
                        return Err(ClientError::RateLimited);
                    }

                    last_failure = ClientError::RateLimited;
                    if attempt < max_attempts {
                        tracing::debug!("rate limited, retrying in {:?}", wait);
                        sleep_or_cancel(wait, cancel).await?;
                    }
                }
                StatusCode::UNAUTHORIZED => return Err(ClientError::Unauthorized),
                status => return Err(ClientError::ServerError(status.as_u16())),
            }
        }

        if let ClientError::Network(err) = &last_failure {
            tracing::warn!("giving up after {} attempts: {}", max_attempts, err);
        }
        Err(last_failure)
    }

    /// Bearer-authenticated GET decoded into `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        query: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<T, ClientError> {
        let request = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .build()?;

        let response = self.execute(request, cancel).await?;
        decode(response).await
    }

    /// Form-encoded POST decoded into `T`.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<T, ClientError> {
        let request = self.http.post(url).form(form).build()?;

        let response = self.execute(request, cancel).await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

async fn sleep_or_cancel(wait: Duration, cancel: &CancellationToken) -> Result<(), ClientError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        _ = tokio::time::sleep(wait) => Ok(()),
    }
}

/// Reads a `Retry-After` header given in whole seconds.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(reqwest::header::RETRY_AFTER)?;
    let secs: u64 = raw.to_str().ok()?.trim().parse().ok()?;
    Some(Duration::from_secs(secs))
}
