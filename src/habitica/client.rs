//! Raw Habitica API client: list fetch, batched enrichment, normalization.

use std::sync::Arc;
use tracing::info;

use color_eyre::Result;

use crate::config::ClientConfig;

use super::api_types::ApiTask;
use super::batch::{self, DEFAULT_BATCH_SIZE};
use super::cache::TaskQuery;
use super::error::ApiError;
use super::transport::{Credentials, Transport};
use super::types::{Daily, EnrichedDaily};

/// Habitica API client. Cheap to clone; all clones share one paced transport.
#[derive(Clone)]
pub struct HabiticaClient {
  transport: Arc<Transport>,
}

impl HabiticaClient {
  pub fn new(base_url: &str, credentials: Credentials, tuning: &ClientConfig) -> Result<Self> {
    let transport = Transport::new(base_url, credentials, tuning)?;
    Ok(Self {
      transport: Arc::new(transport),
    })
  }

  /// Fetch the daily task list, then each task's completion history in
  /// batches, normalized onto calendar days.
  ///
  /// Fails only if the list fetch itself fails after retries; individual
  /// history fetches degrade to empty data instead of propagating.
  pub async fn get_dailies(&self) -> Result<Vec<EnrichedDaily>, ApiError> {
    let raw: Vec<ApiTask> = self
      .transport
      .get_json(TaskQuery::Dailies.endpoint())
      .await?;

    let dailies: Vec<Daily> = raw
      .into_iter()
      .map(|task| Daily {
        id: task.id,
        title: task.text,
        notes: task.notes,
        completed: task.completed,
      })
      .collect();
    info!(count = dailies.len(), "fetched daily task list");

    Ok(batch::fetch_histories(&self.transport, dailies, DEFAULT_BATCH_SIZE).await)
  }
}
