use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use habitfetch::cache::CacheSource;
use habitfetch::config::Config;
use habitfetch::habitica::types::EnrichedDaily;
use habitfetch::habitica::{CachedHabiticaClient, Credentials};

#[derive(Parser, Debug)]
#[command(name = "habitfetch")]
#[command(about = "Fetch Habitica dailies and export completion history as JSON")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/habitfetch/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Output directory for dailies.json and meta.json
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Habitica user id (overrides config and HABITICA_USER_ID)
  #[arg(short, long)]
  user: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;

  // Resolve credentials before any network activity
  let user_id = match args.user {
    Some(user) => user,
    None => config.resolve_user_id()?,
  };
  let api_token = Config::get_api_token()?;

  let client = CachedHabiticaClient::new(
    &config,
    Credentials { user_id, api_token },
  )?;

  info!("starting data fetch");
  let result = client.get_dailies().await?;
  if result.source == CacheSource::CacheFresh {
    info!(cached_at = ?result.cached_at, "served from cache");
  }
  info!(task_count = result.data.len(), "fetch complete");

  let output_dir = args.output.unwrap_or_else(|| config.output.dir.clone());
  write_artifacts(&output_dir, &result.data)?;

  Ok(())
}

/// Write dailies.json (the normalized task histories) and meta.json (last
/// update timestamp and task count) into the output directory.
fn write_artifacts(dir: &std::path::Path, dailies: &[EnrichedDaily]) -> Result<()> {
  std::fs::create_dir_all(dir)
    .map_err(|e| eyre!("Failed to create output directory {}: {}", dir.display(), e))?;

  let data_path = dir.join("dailies.json");
  let json = serde_json::to_string_pretty(dailies)?;
  std::fs::write(&data_path, json)
    .map_err(|e| eyre!("Failed to write {}: {}", data_path.display(), e))?;
  info!(path = %data_path.display(), "data saved");

  let meta_path = dir.join("meta.json");
  let meta = serde_json::json!({
    "lastUpdated": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    "taskCount": dailies.len(),
  });
  std::fs::write(&meta_path, serde_json::to_string_pretty(&meta)?)
    .map_err(|e| eyre!("Failed to write {}: {}", meta_path.display(), e))?;
  info!(path = %meta_path.display(), "metadata saved");

  Ok(())
}
