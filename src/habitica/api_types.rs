//! Serde-deserializable types matching Habitica API responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

// ============================================================================
// Response envelopes
// ============================================================================

/// Every successful Habitica response wraps its payload in `{data: ...}`;
/// the envelope's other fields are irrelevant once the status is 2xx.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
  pub data: T,
}

/// Error body on non-2xx responses. `message` is human-readable and ends up
/// in the surfaced error; `error` is the machine code, logged for diagnosis.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
  #[serde(default)]
  pub message: String,
  #[serde(default)]
  pub error: String,
}

// ============================================================================
// Task types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiTask {
  #[serde(rename = "_id")]
  pub id: String,
  #[serde(default)]
  pub text: String,
  #[serde(default)]
  pub notes: String,
  #[serde(default)]
  pub completed: bool,
  /// Present on the per-task detail endpoint, absent from list responses.
  #[serde(default)]
  pub history: Vec<ApiHistoryEntry>,
  // Remaining raw fields (priority, streak, checklist, ...) are ignored.
}

#[derive(Debug, Deserialize)]
pub struct ApiHistoryEntry {
  #[serde(default)]
  pub value: f64,
  pub date: ApiDate,
}

/// History dates arrive as epoch milliseconds from the current API, but
/// older exports carry ISO-8601 strings. Accept both.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum ApiDate {
  EpochMillis(i64),
  Timestamp(DateTime<Utc>),
}

impl ApiDate {
  /// Truncate to the calendar date, in UTC.
  pub fn to_day(self) -> Option<NaiveDate> {
    match self {
      ApiDate::EpochMillis(ms) => DateTime::<Utc>::from_timestamp_millis(ms).map(|d| d.date_naive()),
      ApiDate::Timestamp(ts) => Some(ts.date_naive()),
    }
  }
}
