//! Paced, serialized HTTP transport for the Habitica API.
//!
//! Habitica enforces a global per-credential rate limit, so every outbound
//! request funnels through one FIFO-fair async mutex wrapping the pacing
//! state. The `reqwest::Client` is private to this module; there is no way
//! to reach the network around the pacer.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use url::Url;

use color_eyre::{eyre::eyre, Result};

use crate::config::ClientConfig;

use super::api_types::{ApiErrorBody, ApiResponse};
use super::error::ApiError;

/// Opaque credential pair attached as headers to every request.
/// Deliberately no Debug derive so tokens cannot leak into logs.
pub struct Credentials {
  pub user_id: String,
  pub api_token: String,
}

/// Tracks the start time of the most recent dispatch.
///
/// The timestamp is taken immediately before the request is issued (not
/// after the response) so pacing reflects request start cadence.
#[derive(Default)]
struct Pacer {
  last_request_start: Option<Instant>,
}

impl Pacer {
  async fn wait_for_slot(&mut self, interval: Duration) {
    if let Some(last) = self.last_request_start {
      let elapsed = last.elapsed();
      if elapsed < interval {
        sleep(interval - elapsed).await;
      }
    }
    self.last_request_start = Some(Instant::now());
  }
}

pub struct Transport {
  http: reqwest::Client,
  base_url: String,
  /// Credential and content-type headers, validated at construction.
  auth_headers: HeaderMap,
  min_request_interval: Duration,
  initial_retry_delay: Duration,
  max_retries: u32,
  pacer: Mutex<Pacer>,
}

impl Transport {
  pub fn new(base_url: &str, credentials: Credentials, tuning: &ClientConfig) -> Result<Self> {
    // Validate early; the path is concatenated onto this string verbatim.
    Url::parse(base_url).map_err(|e| eyre!("Invalid Habitica base URL {}: {}", base_url, e))?;

    // Error messages deliberately omit the offending value
    let mut auth_headers = HeaderMap::new();
    auth_headers.insert(
      "x-api-user",
      HeaderValue::from_str(&credentials.user_id)
        .map_err(|_| eyre!("Habitica user id is not a valid header value"))?,
    );
    auth_headers.insert(
      "x-api-key",
      HeaderValue::from_str(&credentials.api_token)
        .map_err(|_| eyre!("Habitica API token is not a valid header value"))?,
    );
    auth_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url: base_url.trim_end_matches('/').to_string(),
      auth_headers,
      min_request_interval: tuning.min_request_interval(),
      initial_retry_delay: tuning.initial_retry_delay(),
      max_retries: tuning.max_retries,
      pacer: Mutex::new(Pacer::default()),
    })
  }

  /// GET an endpoint and unwrap the `{data}` envelope.
  pub async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, ApiError> {
    self.get_json_with(path_and_query, HeaderMap::new()).await
  }

  /// Like [`get_json`](Self::get_json) with extra caller headers. Credential
  /// headers are applied last and cannot be clobbered by the caller.
  ///
  /// Callers queue on the pacer mutex in FIFO order; the lock is held for the
  /// whole retry loop, so at most one request is ever in flight and the
  /// minimum start-to-start gap holds across all callers.
  pub async fn get_json_with<T: DeserializeOwned>(
    &self,
    path_and_query: &str,
    headers: HeaderMap,
  ) -> Result<T, ApiError> {
    let mut pacer = self.pacer.lock().await;
    let mut attempt: u32 = 0;

    loop {
      pacer.wait_for_slot(self.min_request_interval).await;

      match self.dispatch(path_and_query, headers.clone()).await {
        Ok(value) => return Ok(value),
        Err(err) if err.is_retryable() && attempt < self.max_retries => {
          let delay = self.backoff_delay(&err, attempt);
          tracing::warn!(
            endpoint = path_and_query,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "request failed, retrying after backoff"
          );
          sleep(delay).await;
          attempt += 1;
        }
        Err(err) if err.is_retryable() => {
          return Err(ApiError::RetriesExhausted {
            attempts: attempt + 1,
            source: Box::new(err),
          });
        }
        Err(err) => return Err(err),
      }
    }
  }

  async fn dispatch<T: DeserializeOwned>(
    &self,
    path_and_query: &str,
    headers: HeaderMap,
  ) -> Result<T, ApiError> {
    let url = format!("{}{}", self.base_url, path_and_query);
    tracing::debug!(%url, "dispatching request");

    let response = self
      .http
      .get(&url)
      .headers(self.merge_headers(headers))
      .send()
      .await?;

    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
      let retry_after_secs = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok());
      return Err(ApiError::RateLimited { retry_after_secs });
    }

    if !status.is_success() {
      let text = response.text().await?;
      let body = serde_json::from_str::<ApiErrorBody>(&text).ok();
      if let Some(code) = body.as_ref().map(|b| b.error.as_str()).filter(|c| !c.is_empty()) {
        tracing::debug!(%status, code, "server rejected request");
      }
      let message = body
        .map(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
      return Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
      });
    }

    // Decode failures surface as reqwest errors, i.e. as retryable
    // network-class failures (truncated or malformed body).
    let envelope: ApiResponse<T> = response.json().await?;
    Ok(envelope.data)
  }

  /// Overlay the credential headers onto the caller's map. `insert` replaces
  /// any caller-supplied value outright: the wire must never carry a second
  /// `x-api-user`/`x-api-key`, or first-value-wins servers would authenticate
  /// with the caller's value.
  fn merge_headers(&self, mut headers: HeaderMap) -> HeaderMap {
    for (name, value) in &self.auth_headers {
      headers.insert(name, value.clone());
    }
    headers
  }

  /// A valid positive Retry-After hint wins; anything else falls back to
  /// exponential backoff from the configured initial delay.
  fn backoff_delay(&self, err: &ApiError, attempt: u32) -> Duration {
    if let ApiError::RateLimited {
      retry_after_secs: Some(secs),
    } = err
    {
      if *secs > 0 {
        return Duration::from_secs(*secs);
      }
    }
    self.initial_retry_delay * 2u32.saturating_pow(attempt)
  }
}
