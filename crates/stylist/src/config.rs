//! TOML configuration parsing and validation.
//!
//! ```toml
//! [db]
//! path = "./data/stylist.sqlite"
//!
//! [chat]
//! recommendation_limit = 5
//! recommend_from = "utterance"   # or "profile"
//! history_limit = 10
//!
//! [logging]
//! filter = "stylist=info,stylist_core=info"
//! ```
//!
//! Only `[db]` is required. See [`load_config`] for validation rules.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use stylist_core::chat::{ChatOptions, RecommendFrom};
use stylist_core::recommend::DEFAULT_LIMIT;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,
    #[serde(default)]
    pub recommend_from: RecommendFrom,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            recommendation_limit: default_recommendation_limit(),
            recommend_from: RecommendFrom::default(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_recommendation_limit() -> usize {
    DEFAULT_LIMIT
}
fn default_history_limit() -> usize {
    10
}

impl ChatConfig {
    pub fn options(&self) -> ChatOptions {
        ChatOptions {
            limit: self.recommendation_limit,
            recommend_from: self.recommend_from,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "stylist=info,stylist_core=info".to_string()
}

impl Config {
    /// The defaults a config file with only `[db]` would produce, for
    /// building a config in code.
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/stylist.sqlite"),
            },
            chat: ChatConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.chat.recommendation_limit < 1 {
        anyhow::bail!("chat.recommendation_limit must be >= 1");
    }

    if config.chat.history_limit < 1 {
        anyhow::bail!("chat.history_limit must be >= 1");
    }

    if config.db.path.as_os_str().is_empty() {
        anyhow::bail!("db.path must not be empty");
    }

    Ok(config)
}
