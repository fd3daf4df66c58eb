//! Batched detail fetching with partial-failure tolerance.
//!
//! Histories are fetched one task at a time through the shared transport, in
//! fixed-size groups. A group's fetches are joined settle-all style: one
//! task's failure degrades that task to an empty history instead of aborting
//! the group. True network concurrency stays at 1 because every request
//! still serializes through the transport's pacer.

use futures::future::join_all;
use tracing::{info, warn};

use super::api_types::ApiTask;
use super::transport::Transport;
use super::types::{Daily, EnrichedDaily, HistoryPoint};

pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Fetch the completion history for each task.
///
/// Groups run strictly sequentially; output order equals input order. Never
/// fails as a whole: a task whose detail fetch fails keeps its place in the
/// output with empty history data.
pub async fn fetch_histories(
  transport: &Transport,
  tasks: Vec<Daily>,
  batch_size: usize,
) -> Vec<EnrichedDaily> {
  let total = tasks.len();
  let mut enriched = Vec::with_capacity(total);

  for group in tasks.chunks(batch_size.max(1)) {
    info!(group_size = group.len(), "processing batch");

    let results = join_all(group.iter().map(|task| fetch_one(transport, task))).await;

    let fetched = results.iter().filter(|(_, ok)| *ok).count();
    info!(
      fetched,
      group_size = group.len(),
      "batch complete"
    );
    enriched.extend(results.into_iter().map(|(item, _)| item));
  }

  enriched
}

/// Fetch one task's history; failure is logged and converted into an empty
/// history so the caller always gets the task back. The boolean reports
/// whether the detail fetch actually succeeded.
async fn fetch_one(transport: &Transport, task: &Daily) -> (EnrichedDaily, bool) {
  info!(task = %task.title, id = %task.id, "fetching task history");

  match transport.get_json::<ApiTask>(&format!("/tasks/{}", task.id)).await {
    Ok(detail) => (EnrichedDaily::new(task.clone(), normalize_history(&detail)), true),
    Err(err) => {
      warn!(task = %task.title, id = %task.id, error = %err, "failed to fetch task history");
      (EnrichedDaily::new(task.clone(), Vec::new()), false)
    }
  }
}

/// Collapse raw history entries onto calendar days.
///
/// A positive value carries its magnitude through; zero or negative values
/// mean the daily was missed and normalize to 0. Entries whose date cannot
/// be interpreted are skipped.
pub fn normalize_history(detail: &ApiTask) -> Vec<HistoryPoint> {
  detail
    .history
    .iter()
    .filter_map(|entry| {
      let day = entry.date.to_day()?;
      let value = if entry.value > 0.0 { entry.value } else { 0.0 };
      Some(HistoryPoint { day, value })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::habitica::api_types::ApiDate;
  use chrono::NaiveDate;

  fn task_with_history(entries: Vec<(f64, i64)>) -> ApiTask {
    ApiTask {
      id: "t".into(),
      text: "Task".into(),
      notes: String::new(),
      completed: false,
      history: entries
        .into_iter()
        .map(|(value, ms)| crate::habitica::api_types::ApiHistoryEntry {
          value,
          date: ApiDate::EpochMillis(ms),
        })
        .collect(),
    }
  }

  #[test]
  fn test_normalize_positive_value_kept() {
    // 2024-01-01T00:00:00Z
    let task = task_with_history(vec![(1.5, 1_704_067_200_000)]);
    let points = normalize_history(&task);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].day, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(points[0].value, 1.5);
  }

  #[test]
  fn test_normalize_nonpositive_becomes_zero() {
    let task = task_with_history(vec![(0.0, 1_704_067_200_000), (-2.3, 1_704_153_600_000)]);
    let points = normalize_history(&task);
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].value, 0.0);
    assert_eq!(points[1].value, 0.0);
    assert_eq!(points[1].day, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
  }

  #[test]
  fn test_normalize_preserves_entry_order() {
    let task = task_with_history(vec![
      (1.0, 1_704_153_600_000),
      (1.0, 1_704_067_200_000), // out of order on purpose
    ]);
    let points = normalize_history(&task);
    // The server does not guarantee sorted history; pass it through as-is
    assert_eq!(points[0].day, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(points[1].day, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
  }
}
