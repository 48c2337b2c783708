//! Application configuration management.
//!
//! The only real setting is the backend base URL. It comes from the
//! `QUERYPAD_BASE_URL` environment variable when set, otherwise from
//! `~/.config/querypad/config.json`, otherwise from the compiled-in default.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config directory paths
const APP_NAME: &str = "querypad";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Session storage file name
const SESSION_FILE: &str = "session.json";

/// Default backend base URL
const DEFAULT_BASE_URL: &str = "https://10.135.8.214:443";

/// Environment variable overriding the base URL
const BASE_URL_ENV: &str = "QUERYPAD_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = {
            let path = Self::config_path()?;
            if path.exists() {
                let contents = std::fs::read_to_string(&path)?;
                serde_json::from_str(&contents)?
            } else {
                Self::default()
            }
        };

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.base_url = url;
        }

        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where the session record lives on disk.
    pub fn session_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(SESSION_FILE))
    }
}
