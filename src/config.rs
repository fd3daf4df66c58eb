use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub habitica: HabiticaConfig,
  #[serde(default)]
  pub client: ClientConfig,
  #[serde(default)]
  pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HabiticaConfig {
  /// Habitica user id. May be omitted and supplied via HABITICA_USER_ID.
  pub user_id: Option<String>,
  #[serde(default = "default_base_url")]
  pub base_url: String,
}

fn default_base_url() -> String {
  "https://habitica.com/api/v3".to_string()
}

/// Client tuning knobs. The defaults stay well inside Habitica's
/// 30-requests-per-minute limit.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  /// Minimum gap between the start times of consecutive requests (ms).
  pub min_request_interval_ms: u64,
  /// Base delay for exponential backoff (ms), doubled per attempt.
  pub initial_retry_delay_ms: u64,
  /// Retry budget for rate-limited and transient network failures.
  pub max_retries: u32,
  /// How long a cached fetch result stays valid (ms).
  pub cache_expiration_ms: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      min_request_interval_ms: 10_000,
      initial_retry_delay_ms: 10_000,
      max_retries: 5,
      cache_expiration_ms: 24 * 60 * 60 * 1000,
    }
  }
}

impl ClientConfig {
  pub fn min_request_interval(&self) -> Duration {
    Duration::from_millis(self.min_request_interval_ms)
  }

  pub fn initial_retry_delay(&self) -> Duration {
    Duration::from_millis(self.initial_retry_delay_ms)
  }

  pub fn cache_expiration(&self) -> chrono::Duration {
    chrono::Duration::milliseconds(self.cache_expiration_ms as i64)
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
  /// Directory the JSON artifacts are written into.
  pub dir: PathBuf,
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self {
      dir: PathBuf::from("public/data"),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./habitfetch.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/habitfetch/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/habitfetch/config.yaml\n\
                 See config.example.yaml for the format."
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("habitfetch.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("habitfetch").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Resolve the Habitica user id from config or environment.
  pub fn resolve_user_id(&self) -> Result<String> {
    if let Some(id) = &self.habitica.user_id {
      return Ok(id.clone());
    }
    std::env::var("HABITICA_USER_ID").map_err(|_| {
      eyre!(
        "Habitica user id not found. Set habitica.user_id in the config file \
                 or the HABITICA_USER_ID environment variable."
      )
    })
  }

  /// Get the Habitica API token from environment variables.
  ///
  /// Checks HABITFETCH_API_TOKEN first, then HABITICA_API_TOKEN as fallback.
  /// The token never lives in the config file.
  pub fn get_api_token() -> Result<String> {
    std::env::var("HABITFETCH_API_TOKEN")
      .or_else(|_| std::env::var("HABITICA_API_TOKEN"))
      .map_err(|_| {
        eyre!(
          "Habitica API token not found. Set HABITFETCH_API_TOKEN or HABITICA_API_TOKEN \
                     environment variable."
        )
      })
  }
}
