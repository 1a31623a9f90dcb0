//! Runtime configuration
//!
//! Values come from CLI flags, which fall back to environment variables and
//! then to the defaults below (resolved by clap).

use std::path::PathBuf;
use std::time::Duration;

/// Backend used when neither `--api-url` nor `NOTES_API_URL` is set
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Quiet period of the as-you-type search
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("noteseek/", env!("CARGO_PKG_VERSION"));

/// Directory name under the platform config dir
const STATE_DIR_NAME: &str = "noteseek";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub debounce: Duration,
    pub state_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            state_dir: default_state_dir(),
        }
    }
}

impl Config {
    pub fn new(api_url: impl Into<String>, timeout_secs: u64, state_dir: Option<PathBuf>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout: Duration::from_secs(timeout_secs),
            state_dir: state_dir.unwrap_or_else(default_state_dir),
            ..Default::default()
        }
    }

    pub fn with_debounce_ms(mut self, millis: u64) -> Self {
        self.debounce = Duration::from_millis(millis);
        self
    }
}

/// `<config dir>/noteseek`, or `./.noteseek` when the platform has none
pub fn default_state_dir() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join(STATE_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", STATE_DIR_NAME)))
}
