//! Failure taxonomy for the Habitica client.
//!
//! Retryable classes (`RateLimited`, `Network`) are handled inside the
//! transport's retry loop and only escape wrapped in `RetriesExhausted`.
//! `Rejected` carries the server's structured error message and is never
//! retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  /// HTTP 429 from the server, optionally with a Retry-After hint.
  #[error("rate limited by Habitica (retry hint: {retry_after_secs:?}s)")]
  RateLimited { retry_after_secs: Option<u64> },

  /// Connection errors, timeouts, malformed responses.
  #[error("network error: {0}")]
  Network(#[from] reqwest::Error),

  /// Non-2xx response with a structured error body. Not retried.
  #[error("Habitica API error ({status}): {message}")]
  Rejected { status: u16, message: String },

  /// A retryable failure kept failing until the retry budget ran out.
  #[error("giving up after {attempts} attempts: {source}")]
  RetriesExhausted {
    attempts: u32,
    #[source]
    source: Box<ApiError>,
  },
}

impl ApiError {
  /// Whether the transport may retry this failure with backoff.
  pub fn is_retryable(&self) -> bool {
    matches!(self, Self::RateLimited { .. } | Self::Network(_))
  }
}
