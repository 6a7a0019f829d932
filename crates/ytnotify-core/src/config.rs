use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::NotifierError;

/// Top-level ytnotify configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub youtube: YouTubeConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub poller: PollerConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Discord bot config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    /// Prefix in front of the `ytnotifier` command group (e.g. `?ytnotifier toggle`).
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// User ids treated as administrators in addition to the ADMINISTRATOR permission.
    #[serde(default)]
    pub admin_users: Vec<u64>,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bot_token: String::new(),
            prefix: default_prefix(),
            admin_users: Vec::new(),
        }
    }
}

/// YouTube Data API config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// Keys listed here are used before the ones in `YOUTUBE_KEYS`.
    #[serde(default)]
    pub api_keys: Vec<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            api_base: default_api_base(),
        }
    }
}

/// Document store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Poll loop config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

// --- Default value functions ---

fn default_name() -> String {
    "ytnotify".to_string()
}
fn default_data_dir() -> String {
    "~/.ytnotify".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_prefix() -> String {
    "?".to_string()
}
fn default_api_base() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}
fn default_db_path() -> String {
    "~/.ytnotify/ytnotify.db".to_string()
}
fn default_interval_secs() -> u64 {
    300
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. `DISCORD_TOKEN`
/// overrides the token from the file.
pub fn load(path: &str) -> Result<Config, NotifierError> {
    let path = Path::new(path);
    let mut config = if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    } else {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NotifierError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| NotifierError::Config(format!("failed to parse config: {}", e)))?
    };

    if let Ok(token) = std::env::var("DISCORD_TOKEN") {
        if !token.trim().is_empty() {
            config.discord.bot_token = token.trim().to_string();
        }
    }

    Ok(config)
}
