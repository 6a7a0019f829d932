//! API key pool.

use rand::seq::SliceRandom;
use tracing::info;

/// Environment variable holding a comma-separated key list.
pub const KEYS_ENV: &str = "YOUTUBE_KEYS";

/// Immutable set of YouTube API keys.
#[derive(Debug, Clone, Default)]
pub struct KeyPool {
    keys: Vec<String>,
}

impl KeyPool {
    pub fn new(keys: Vec<String>) -> Self {
        let keys = keys
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keys }
    }

    /// Parse a comma-separated list, ignoring whitespace and empty entries.
    pub fn parse(raw: &str) -> Self {
        Self::new(
            raw.split(',')
                .map(|k| k.chars().filter(|c| !c.is_whitespace()).collect())
                .collect(),
        )
    }

    /// Keys from config first, then `YOUTUBE_KEYS`. Duplicates are dropped.
    pub fn from_config_and_env(configured: &[String]) -> Self {
        let mut keys: Vec<String> = Self::new(configured.to_vec()).keys;
        let env = std::env::var(KEYS_ENV).unwrap_or_default();
        for key in Self::parse(&env).keys {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        info!("loaded {} YouTube API key(s)", keys.len());
        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// A random key, `None` when the pool is empty.
    pub fn pick(&self) -> Option<&str> {
        self.keys.choose(&mut rand::thread_rng()).map(String::as_str)
    }

    /// Every key exactly once, in random order.
    pub fn shuffled(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys.iter().map(String::as_str).collect();
        keys.shuffle(&mut rand::thread_rng());
        keys
    }
}
