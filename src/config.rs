use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ChirpError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token_env: Option<String>,
    pub token_command: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            token_env: Some("CHIRP_TOKEN".to_string()),
            token_command: None,
        }
    }
}

/// Resource paths for each feed. `{id}` in `profile` is replaced by the user id.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub home: String,
    pub global: String,
    pub profile: String,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            home: "/tweets".to_string(),
            global: "/tweets_all".to_string(),
            profile: "/users/{id}/tweets".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Fraction of a screenful from the end of the list at which the next
    /// page is requested
    pub threshold: f32,
    /// Delay before each load-more request is sent
    pub fetch_delay_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            fetch_delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

pub fn config_dir() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("chirp"))
}

fn config_path() -> Option<PathBuf> {
    Some(config_dir()?.join("config.toml"))
}

impl Config {
    /// Load `~/.config/chirp/config.toml`, falling back to defaults when it
    /// is missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match Self::parse(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring bad config");
                Config::default()
            }
        }
    }

    /// Load an explicitly requested file. Unlike [`Config::load`] this fails
    /// loudly.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| ChirpError::Config(e.to_string()))?;
        config.scroll.threshold = if config.scroll.threshold.is_finite() {
            config.scroll.threshold.clamp(0.0, 1.0)
        } else {
            ScrollConfig::default().threshold
        };
        config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }
}
