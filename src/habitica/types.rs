//! Domain types produced by the client.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A daily task as returned by the task-list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Daily {
  pub id: String,
  pub title: String,
  pub notes: String,
  pub completed: bool,
}

/// One completion record, normalized to a calendar day.
/// `value` is 0 for a miss, otherwise the positive completion magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
  pub day: NaiveDate,
  pub value: f64,
}

/// A daily task together with its normalized completion history.
/// This is the unit of output and the unit cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedDaily {
  pub id: String,
  pub title: String,
  pub notes: String,
  pub data: Vec<HistoryPoint>,
}

impl EnrichedDaily {
  /// Pair a daily with its history; used both for fetched histories and
  /// for the empty-history fallback when a detail fetch fails.
  pub fn new(daily: Daily, data: Vec<HistoryPoint>) -> Self {
    Self {
      id: daily.id,
      title: daily.title,
      notes: daily.notes,
      data,
    }
  }
}
